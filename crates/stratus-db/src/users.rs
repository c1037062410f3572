use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use tracing::{info, warn};

use stratus_types::UserId;
use stratus_types::models::User;

use crate::models::{UserRow, UsersDoc};
use crate::{Database, Document, Result, StoreError};

impl Database {
    /// Register a user. Emails are not required to be unique.
    pub fn create_user(&self, username: &str, email: &str, password: &str) -> Result<User> {
        // Hash outside the document lock.
        let password_hash = hash_password(password)?;

        let user = self.update(Document::Users, |users: &mut UsersDoc| {
            let mut id = users.len() as UserId + 1;
            while users.contains_key(&id) {
                id += 1;
            }

            let row = UserRow {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                is_subscribed: false,
            };
            let user = row.to_user(id);
            users.insert(id, row);
            user
        })?;

        info!(user_id = user.id, "Registered user {}", user.username);
        Ok(user)
    }

    pub fn get_user_by_id(&self, id: UserId) -> Option<User> {
        let users: UsersDoc = self.read(Document::Users);
        users.get(&id).map(|row| row.to_user(id))
    }

    /// First user registered with this email, if any.
    pub fn get_user_by_email(&self, email: &str) -> Option<User> {
        let users: UsersDoc = self.read(Document::Users);
        users
            .iter()
            .find(|(_, row)| row.email == email)
            .map(|(id, row)| row.to_user(*id))
    }

    pub fn set_subscribed(&self, id: UserId, subscribed: bool) -> Result<()> {
        let found = self.update(Document::Users, |users: &mut UsersDoc| {
            match users.get_mut(&id) {
                Some(row) => {
                    row.is_subscribed = subscribed;
                    true
                }
                None => false,
            }
        })?;

        if !found {
            warn!(user_id = id, "set_subscribed on unknown user");
        }
        Ok(())
    }
}

/// Check a candidate password against the user's stored Argon2 hash.
pub fn verify_password(user: &User, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(&user.password_hash) else {
        warn!(user_id = user.id, "Stored password hash is unparseable");
        return false;
    };

    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn open() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        (dir, db)
    }

    #[test]
    fn create_then_lookup_by_email() {
        let (_dir, db) = open();

        let created = db.create_user("alice", "alice@example.com", "hunter22").unwrap();
        assert_eq!(created.id, 1);
        assert!(!created.is_subscribed);
        assert_ne!(created.password_hash, "hunter22");

        let found = db.get_user_by_email("alice@example.com").unwrap();
        assert_eq!(found.username, "alice");
        assert_eq!(found.id, created.id);
        assert!(verify_password(&found, "hunter22"));
        assert!(!verify_password(&found, "hunter23"));
    }

    #[test]
    fn ids_are_sequential() {
        let (_dir, db) = open();

        let a = db.create_user("a", "a@example.com", "pw").unwrap();
        let b = db.create_user("b", "b@example.com", "pw").unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(db.get_user_by_id(2).unwrap().username, "b");
        assert!(db.get_user_by_id(3).is_none());
    }

    #[test]
    fn duplicate_email_is_permitted_and_first_wins() {
        let (_dir, db) = open();

        db.create_user("first", "dup@example.com", "pw1").unwrap();
        let second = db.create_user("second", "dup@example.com", "pw2").unwrap();
        assert_eq!(second.id, 2);

        let found = db.get_user_by_email("dup@example.com").unwrap();
        assert_eq!(found.username, "first");
    }

    #[test]
    fn unknown_email_is_absent() {
        let (_dir, db) = open();
        assert!(db.get_user_by_email("nobody@example.com").is_none());
    }

    #[test]
    fn subscribe_and_unsubscribe() {
        let (_dir, db) = open();
        let user = db.create_user("bob", "bob@example.com", "pw").unwrap();

        db.set_subscribed(user.id, true).unwrap();
        assert!(db.get_user_by_id(user.id).unwrap().is_subscribed);

        db.set_subscribed(user.id, false).unwrap();
        assert!(!db.get_user_by_id(user.id).unwrap().is_subscribed);
    }

    #[test]
    fn set_subscribed_on_unknown_user_is_noop() {
        let (_dir, db) = open();
        db.set_subscribed(42, true).unwrap();
        assert!(db.get_user_by_id(42).is_none());
    }

    #[test]
    fn set_subscribed_leaves_other_users_alone() {
        let (_dir, db) = open();
        let a = db.create_user("a", "a@example.com", "pw").unwrap();
        let b = db.create_user("b", "b@example.com", "pw").unwrap();

        db.set_subscribed(b.id, true).unwrap();
        assert!(!db.get_user_by_id(a.id).unwrap().is_subscribed);
        assert!(db.get_user_by_id(b.id).unwrap().is_subscribed);
    }

    #[test]
    fn create_skips_taken_id_after_manual_edit() {
        let (_dir, db) = open();
        fs::write(
            db.path(Document::Users),
            r#"{"2": {"username": "x", "email": "x@example.com", "password_hash": "h"}}"#,
        )
        .unwrap();

        let user = db.create_user("y", "y@example.com", "pw").unwrap();
        assert_eq!(user.id, 3);
        assert_eq!(db.get_user_by_id(2).unwrap().username, "x");
    }

    #[test]
    fn garbage_hash_never_verifies() {
        let user = User {
            id: 1,
            username: "u".into(),
            email: "u@example.com".into(),
            password_hash: "not-a-phc-string".into(),
            is_subscribed: false,
        };
        assert!(!verify_password(&user, "anything"));
    }
}
