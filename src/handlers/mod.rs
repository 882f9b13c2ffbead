pub mod admin_handlers;
pub mod auth_handlers;
pub mod category_handlers;
pub mod geocode_handlers;
pub mod preferences_handlers;
pub mod provider_handlers;
pub mod realtime_handlers;
