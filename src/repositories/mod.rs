pub mod query;
pub mod supabase_rest;
pub mod provider_repository;
pub mod category_repository;
pub mod review_repository;
pub mod settings_repository;

pub use query::Query;
pub use supabase_rest::{RepoError, SupabaseRest};
