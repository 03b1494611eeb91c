use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub sub: Option<String>,
    pub permissions: Vec<String>,
}
