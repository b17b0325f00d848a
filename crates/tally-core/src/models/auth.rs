use crate::error::{TallyError, TallyResult};
use serde::{Deserialize, Serialize};

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LEN: usize = 6;

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> TallyResult<()> {
        if self.email.is_empty() {
            return Err(TallyError::validation_field("Email is required", "email"));
        }
        if self.password.is_empty() {
            return Err(TallyError::validation_field(
                "Password is required",
                "password",
            ));
        }
        Ok(())
    }
}

/// Body of `POST /auth/signup`
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> TallyResult<()> {
        if self.name.is_empty() {
            return Err(TallyError::validation_field("Name is required", "name"));
        }
        if !self.email.contains('@') {
            return Err(TallyError::validation_field(
                "Enter a valid email address",
                "email",
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(TallyError::validation_field(
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
                "password",
            ));
        }
        Ok(())
    }
}

/// Credential issued by login and signup
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Public view of the signed-in user (`GET /auth/me`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_validation() {
        assert!(LoginRequest::new("a@b.c", "pw").validate().is_ok());
        let err = LoginRequest::new("  ", "pw").validate().unwrap_err();
        assert!(matches!(err, TallyError::Validation { field: Some(ref f), .. } if f == "email"));
        assert!(LoginRequest::new("a@b.c", "").validate().is_err());
    }

    #[test]
    fn test_signup_validation() {
        assert!(SignupRequest::new("Asha", "asha@example.com", "secret").validate().is_ok());
        assert!(SignupRequest::new("", "asha@example.com", "secret").validate().is_err());
        assert!(SignupRequest::new("Asha", "asha.example.com", "secret").validate().is_err());
        let err = SignupRequest::new("Asha", "asha@example.com", "12345").validate().unwrap_err();
        assert!(err.to_string().contains("at least 6"));
    }

    #[test]
    fn test_token_type_defaults_to_bearer() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.token_type, "bearer");
    }
}
