use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use super::{is_valid_email, violation};

pub const TABLE: &str = "users";

/// Columns the query translator may filter, sort or select on. Credential
/// and reset-token columns are deliberately absent: they are never exposed
/// to list queries.
pub const COLUMNS: &[&str] = &["id", "name", "email", "role", "created_at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    User,
    Publisher,
    Admin,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "publisher" => Some(Role::Publisher),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Publisher => write!(f, "publisher"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_password_expire: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Validated registration payload; password still plain at this point
#[derive(Debug, Clone)]
pub struct UserAttrs {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegisterUser {
    /// Self-registration: `admin` is not an assignable role
    pub fn validate(self) -> Result<UserAttrs, HashMap<String, String>> {
        validate_user_payload(self.name, self.email, self.password, self.role, false)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl CreateUser {
    /// Admin user creation: any role may be assigned
    pub fn validate(self) -> Result<UserAttrs, HashMap<String, String>> {
        validate_user_payload(self.name, self.email, self.password, self.role, true)
    }
}

fn validate_user_payload(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
    allow_admin: bool,
) -> Result<UserAttrs, HashMap<String, String>> {
    let mut errors = HashMap::new();

    let name = name.unwrap_or_default();
    if name.trim().is_empty() {
        violation(&mut errors, "name", "Please add a name");
    }
    let email = email.unwrap_or_default();
    if !is_valid_email(&email) {
        violation(&mut errors, "email", "Please add a valid email");
    }
    let password = password.unwrap_or_default();
    if password.len() < 6 {
        violation(
            &mut errors,
            "password",
            "Password must be at least 6 characters",
        );
    }
    let role = match role.as_deref() {
        None => Role::User,
        Some(raw) => match Role::parse(raw) {
            Some(Role::Admin) if !allow_admin => {
                violation(&mut errors, "role", "Role must be either user or publisher");
                Role::User
            }
            Some(role) => role,
            None => {
                violation(&mut errors, "role", "Role must be either user or publisher");
                Role::User
            }
        },
    };

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(UserAttrs {
        name,
        email,
        password,
        role,
    })
}

/// Admin update; password, when present, is re-hashed by the service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UpdateUser {
    pub fn validate(&self) -> Result<Option<Role>, HashMap<String, String>> {
        let mut errors = HashMap::new();

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                violation(&mut errors, "name", "Please add a name");
            }
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                violation(&mut errors, "email", "Please add a valid email");
            }
        }
        if let Some(password) = &self.password {
            if password.len() < 6 {
                violation(
                    &mut errors,
                    "password",
                    "Password must be at least 6 characters",
                );
            }
        }
        let role = match self.role.as_deref() {
            Some(raw) => match Role::parse(raw) {
                Some(role) => Some(role),
                None => {
                    violation(&mut errors, "role", "Unknown role");
                    None
                }
            },
            None => None,
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(role)
    }
}

/// A user may update only their own name and email through this payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetails {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateDetails {
    pub fn validate(&self) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                violation(&mut errors, "name", "Please add a name");
            }
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                violation(&mut errors, "email", "Please add a valid email");
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registration_rejects_admin_role() {
        let payload = RegisterUser {
            name: Some("John".to_string()),
            email: Some("john@gmail.com".to_string()),
            password: Some("123456".to_string()),
            role: Some("admin".to_string()),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.contains_key("role"));
    }

    #[test]
    fn admin_creation_allows_admin_role() {
        let payload = CreateUser {
            name: Some("Root".to_string()),
            email: Some("root@devworks.com".to_string()),
            password: Some("123456".to_string()),
            role: Some("admin".to_string()),
        };
        assert_eq!(payload.validate().unwrap().role, Role::Admin);
    }

    #[test]
    fn short_password_is_rejected() {
        let payload = RegisterUser {
            name: Some("John".to_string()),
            email: Some("john@gmail.com".to_string()),
            password: Some("123".to_string()),
            role: None,
        };
        assert!(payload.validate().unwrap_err().contains_key("password"));
    }

    #[test]
    fn password_never_serializes() {
        let user = User {
            id: Uuid::new_v4(),
            name: "John".to_string(),
            email: "john@gmail.com".to_string(),
            role: Role::User,
            password: "$argon2id$hash".to_string(),
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("resetPasswordToken").is_none());
        assert_eq!(value["role"], json!("user"));
    }
}
