//! Domain models for user accounts.

use serde::{Deserialize, Serialize};

/// The authenticated user's profile, as returned by the profile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Payload for creating a new account.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Response payload after account creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedUser {
    pub id: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user() {
        let json = r#"{"id": "user-1", "name": "Ada", "email": "ada@example.com"}"#;
        let user: User = serde_json::from_str(json).expect("Failed to parse user JSON");
        assert_eq!(user.id, "user-1");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn test_registration_serializes_all_fields() {
        let registration = Registration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "correct horse".to_string(),
        };
        let json = serde_json::to_value(&registration).expect("Failed to serialize");
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["password"], "correct horse");
    }
}
