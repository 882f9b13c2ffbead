use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
pub struct SettingIn {
    pub value: Value,
}
