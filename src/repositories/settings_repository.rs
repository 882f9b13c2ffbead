use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::models::setting::SystemSetting;
use super::{Query, RepoError, SupabaseRest};

pub const TABLE: &str = "system_settings";

#[derive(Clone)]
pub struct SettingsRepository {
    rest: SupabaseRest,
}

impl SettingsRepository {
    pub fn new(rest: SupabaseRest) -> Self {
        Self { rest }
    }

    pub async fn list(&self) -> Result<Vec<SystemSetting>, RepoError> {
        self.rest.select(TABLE, Query::new().order("key", false)).await
    }

    pub async fn put(&self, key: &str, value: Value) -> Result<SystemSetting, RepoError> {
        #[derive(Serialize)]
        struct Row<'a> {
            key: &'a str,
            value: Value,
            updated_at: String,
        }
        let row = Row { key, value, updated_at: Utc::now().to_rfc3339() };
        self.rest.upsert(TABLE, &row).await
    }
}
