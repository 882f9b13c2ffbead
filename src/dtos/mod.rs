pub mod api_response;
pub mod auth_dtos;
pub mod category_dtos;
pub mod geocode_dtos;
pub mod provider_dtos;
pub mod review_dtos;
pub mod settings_dtos;
pub mod upload_dtos;
// alias so it can be used as `crate::dtos::auth`
pub use auth_dtos as auth;
