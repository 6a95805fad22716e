use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::ports::Store;
use crate::domain::user::{User, UserInput, UserStatus};

pub struct UserService<S> {
    store: S,
}

impl<S: Store> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create_user(&self, input: UserInput) -> Result<User, DomainError> {
        input.validate()?;
        let user = self.store.transaction(|tx| {
            if tx.find_user_by_username(&input.username)?.is_some() {
                return Err(DomainError::Conflict(format!(
                    "username '{}' is already taken",
                    input.username
                )));
            }
            tx.insert_user(&input)
        })?;
        log::info!("Created user {} ({})", user.id, user.username);
        Ok(user)
    }

    pub fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.store
            .transaction(|tx| tx.find_user(id))?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    pub fn update_user(&self, id: Uuid, input: UserInput) -> Result<User, DomainError> {
        input.validate()?;
        self.store.transaction(|tx| {
            if let Some(other) = tx.find_user_by_username(&input.username)? {
                if other.id != id {
                    return Err(DomainError::Conflict(format!(
                        "username '{}' is already taken",
                        input.username
                    )));
                }
            }
            tx.update_user(id, &input)?
                .ok_or_else(|| DomainError::not_found("User", id))
        })
    }

    pub fn change_status(&self, id: Uuid, status: UserStatus) -> Result<User, DomainError> {
        let user = self.store.transaction(|tx| {
            if !tx.set_user_status(id, status)? {
                return Err(DomainError::not_found("User", id));
            }
            tx.find_user(id)?
                .ok_or_else(|| DomainError::not_found("User", id))
        })?;
        log::info!("User {} is now {}", id, status);
        Ok(user)
    }

    pub fn delete_user(&self, id: Uuid) -> Result<(), DomainError> {
        self.store.transaction(|tx| {
            if tx.delete_user(id)? {
                Ok(())
            } else {
                Err(DomainError::not_found("User", id))
            }
        })?;
        log::info!("Deleted user {}", id);
        Ok(())
    }

    pub fn list_users(&self, page: PageRequest) -> Result<Page<User>, DomainError> {
        self.store.transaction(|tx| tx.list_users(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::user_input;
    use crate::infrastructure::memory::InMemoryStore;

    fn service() -> UserService<InMemoryStore> {
        UserService::new(InMemoryStore::new())
    }

    #[test]
    fn create_then_get() {
        let users = service();
        let created = users.create_user(user_input("alice")).unwrap();
        let fetched = users.get_user(created.id).unwrap();
        assert_eq!(fetched.username, "alice");
        assert_eq!(fetched.status, UserStatus::Active);
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let users = service();
        users.create_user(user_input("alice")).unwrap();
        let err = users.create_user(user_input("alice")).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn invalid_email_never_reaches_the_store() {
        let users = service();
        let mut input = user_input("bob");
        input.email = "not-an-email".to_string();
        assert!(matches!(
            users.create_user(input),
            Err(DomainError::InvalidInput(_))
        ));
        assert_eq!(users.list_users(PageRequest::default()).unwrap().total, 0);
    }

    #[test]
    fn update_keeps_own_username_but_not_anothers() {
        let users = service();
        let alice = users.create_user(user_input("alice")).unwrap();
        users.create_user(user_input("bob")).unwrap();

        let mut same = user_input("alice");
        same.first_name = Some("Alice".to_string());
        let updated = users.update_user(alice.id, same).unwrap();
        assert_eq!(updated.first_name.as_deref(), Some("Alice"));

        let err = users.update_user(alice.id, user_input("bob")).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn change_status_and_delete() {
        let users = service();
        let alice = users.create_user(user_input("alice")).unwrap();
        let locked = users.change_status(alice.id, UserStatus::Locked).unwrap();
        assert_eq!(locked.status, UserStatus::Locked);

        users.delete_user(alice.id).unwrap();
        assert!(matches!(
            users.get_user(alice.id),
            Err(DomainError::NotFound { entity: "User", .. })
        ));
        assert!(users.delete_user(alice.id).is_err());
    }
}
