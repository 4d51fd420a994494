use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}
