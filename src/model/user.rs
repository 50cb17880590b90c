use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CountResponse {
    #[serde(default)]
    pub count: u64,
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access_token", alias = "accessToken")]
    pub token: String,
}
