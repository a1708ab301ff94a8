use serde::{Deserialize, Serialize};
use validator::Validate;

/// A credential-store user. The id is the seed for the stable pseudonym; the
/// email is never shown anywhere outside the sign-in flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone, Validate, Deserialize)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Display identity attached to an authenticated session. The anonymous name
/// is derived once from the user id at sign-in and stays stable for the
/// lifetime of that id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: String,
    pub anonymous_name: String,
}

/// Issued on successful sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
    pub expires_at: i64,
}
