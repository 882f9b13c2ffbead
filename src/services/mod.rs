pub mod admin_gate;
pub mod auth_services;
pub mod category_services;
pub mod change_feed;
pub mod geocoding_service;
pub mod provider_services;
pub mod storage_service;
