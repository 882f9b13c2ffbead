use serde::Deserialize;

#[derive(Deserialize)]
pub struct ForwardQuery {
    pub q: String,
}

#[derive(Deserialize)]
pub struct ReverseQuery {
    pub lat: f64,
    pub lng: f64,
}
