use serde::Deserialize;

#[derive(Deserialize)]
pub struct CategoryIn {
    pub name: String,
}
