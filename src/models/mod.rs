pub mod category;
pub mod preferences;
pub mod provider;
pub mod review;
pub mod setting;
pub mod user;
