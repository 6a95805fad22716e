use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::{ensure, DomainError};

string_enum! {
    pub enum UserStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        Locked => "LOCKED",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => self.username.clone(),
        }
    }
}

/// Profile fields accepted on create and update.
#[derive(Debug, Clone)]
pub struct UserInput {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub status: UserStatus,
}

impl UserInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure(!self.username.trim().is_empty(), || {
            "username must not be blank".to_string()
        })?;
        ensure(self.username.len() <= 100, || {
            "username must be at most 100 characters".to_string()
        })?;
        ensure(is_plausible_email(&self.email), || {
            format!("'{}' is not a valid email address", self.email)
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(username: &str, email: &str) -> UserInput {
        UserInput {
            username: username.to_string(),
            email: email.to_string(),
            first_name: None,
            last_name: None,
            phone_number: None,
            status: UserStatus::Active,
        }
    }

    #[test]
    fn accepts_well_formed_input() {
        assert!(input("alice", "alice@example.com").validate().is_ok());
    }

    #[test]
    fn rejects_blank_username_and_bad_email() {
        assert!(input("  ", "alice@example.com").validate().is_err());
        assert!(input("alice", "alice.example.com").validate().is_err());
        assert!(input("alice", "alice@localhost").validate().is_err());
    }

    #[test]
    fn status_codes_round_trip_through_strings() {
        assert_eq!("LOCKED".parse::<UserStatus>().unwrap(), UserStatus::Locked);
        assert!("locked".parse::<UserStatus>().is_err());
    }
}
