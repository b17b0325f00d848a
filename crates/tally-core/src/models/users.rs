use crate::error::{TallyError, TallyResult};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\-\s()]+$").expect("valid mobile regex"));

/// Profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.mobile.is_none() && self.date_of_birth.is_none()
    }

    /// Check the fields that gate submission
    pub fn validate(&self) -> TallyResult<()> {
        if self.is_empty() {
            return Err(TallyError::validation("Nothing to update"));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(TallyError::validation_field("Name is required", "name"));
            }
        }
        if let Some(mobile) = &self.mobile {
            if !MOBILE_RE.is_match(mobile) {
                return Err(TallyError::validation_field(
                    "Invalid mobile number",
                    "mobile",
                ));
            }
        }
        if let Some(dob) = &self.date_of_birth {
            NaiveDate::parse_from_str(dob, "%Y-%m-%d").map_err(|_| {
                TallyError::validation_field("Date of birth must be YYYY-MM-DD", "date_of_birth")
            })?;
        }
        Ok(())
    }
}

/// Result of an avatar upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarUploadResponse {
    pub avatar_url: String,
}
