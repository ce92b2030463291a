use serde::{Deserialize, Deserializer, Serialize};

use super::repo_types::{User, UserId};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name_first: String,
    pub name_last: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    #[serde(deserialize_with = "code_from_text_or_number")]
    pub reset_code: String,
    pub new_password: String,
}

// Clients may send the code as a JSON number; its digits are then checked
// like any other code.
fn code_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(u64),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Text(code) => code,
        Code::Number(code) => code.to_string(),
    })
}

/// Returned by register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponse {
    pub u_id: UserId,
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogoutResponse {
    pub is_success: bool,
}

/// Serializes to `{}`.
#[derive(Debug, Default, Serialize)]
pub struct EmptyResponse {}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub u_id: UserId,
    pub email: String,
    pub name_first: String,
    pub name_last: String,
    pub handle_str: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            u_id: user.id,
            email: user.email.clone(),
            name_first: user.name_first.clone(),
            name_last: user.name_last.clone(),
            handle_str: user.handle.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_code_accepts_text_or_number() {
        let text: PasswordResetRequest =
            serde_json::from_str(r#"{"reset_code":"012345","new_password":"abcdef"}"#).unwrap();
        assert_eq!(text.reset_code, "012345");
        let number: PasswordResetRequest =
            serde_json::from_str(r#"{"reset_code":1234,"new_password":"abcdef"}"#).unwrap();
        assert_eq!(number.reset_code, "1234");
        let bad = serde_json::from_str::<PasswordResetRequest>(
            r#"{"reset_code":[1],"new_password":"abcdef"}"#,
        );
        assert!(bad.is_err());
    }
}
