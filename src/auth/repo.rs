use std::collections::{HashMap, HashSet};

use thiserror::Error;
use crate::auth::repo_types::{NewUser, User, UserId};

pub const MAX_HANDLE_LEN: usize = 20;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user {0} not found")]
    NotFound(UserId),

    #[error("email {0} is already stored")]
    DuplicateEmail(String),

    #[error("handle {0} is already stored")]
    DuplicateHandle(String),
}

/// In-memory credential store. A user's id is its index in `users`.
#[derive(Debug, Default)]
pub struct UserStore {
    users: Vec<User>,
    by_email: HashMap<String, UserId>,
    handles: HashSet<String>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Id the next inserted user will receive.
    pub fn next_id(&self) -> UserId {
        self.users.len() as UserId
    }

    /// Find a user by normalized email.
    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.by_email
            .get(email)
            .and_then(|&id| self.users.get(id as usize))
    }

    pub fn find_by_id(&self, id: UserId) -> Result<&User, StoreError> {
        self.users
            .get(id as usize)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: UserId) -> Result<&mut User, StoreError> {
        self.users
            .get_mut(id as usize)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn email_in_use(&self, email: &str) -> bool {
        self.by_email.contains_key(email)
    }

    pub fn handle_in_use(&self, handle: &str) -> bool {
        self.handles.contains(handle)
    }

    /// Find the user holding an outstanding reset code, expired or not.
    pub fn find_by_reset_code(&self, code: &str) -> Option<&User> {
        self.users.iter().find(|u| {
            u.reset_code
                .as_ref()
                .is_some_and(|reset| reset.code == code)
        })
    }

    pub fn reset_code_in_use(&self, code: &str) -> bool {
        self.find_by_reset_code(code).is_some()
    }

    /// Insert a new user with the next sequential id.
    ///
    /// Callers check email uniqueness and generate the handle beforehand, so
    /// a duplicate here is an invariant violation rather than bad input.
    pub fn insert(&mut self, new: NewUser) -> Result<&User, StoreError> {
        if self.email_in_use(&new.email) {
            return Err(StoreError::DuplicateEmail(new.email));
        }
        if self.handle_in_use(&new.handle) {
            return Err(StoreError::DuplicateHandle(new.handle));
        }

        let id = self.next_id();
        self.by_email.insert(new.email.clone(), id);
        self.handles.insert(new.handle.clone());
        self.users.push(User {
            id,
            email: new.email,
            password_hash: new.password_hash,
            name_first: new.name_first,
            name_last: new.name_last,
            handle: new.handle,
            active_session_token: None,
            reset_code: None,
        });
        Ok(&self.users[id as usize])
    }

    /// Handle for the user about to be inserted.
    ///
    /// The base handle is the lower-cased first+last name without whitespace,
    /// cut to 20 characters. On collision the upcoming id is appended, first
    /// to the first name alone (`hayden4`), then to the base handle.
    pub fn generate_unique_handle(&self, name_first: &str, name_last: &str) -> String {
        let base: String = squash(&format!("{name_first}{name_last}"))
            .chars()
            .take(MAX_HANDLE_LEN)
            .collect();
        if !self.handle_in_use(&base) {
            return base;
        }

        let id = self.next_id().to_string();
        let first_with_id = with_suffix(&squash(name_first), &id);
        if !self.handle_in_use(&first_with_id) {
            return first_with_id;
        }
        let base_with_id = with_suffix(&base, &id);
        if !self.handle_in_use(&base_with_id) {
            return base_with_id;
        }

        let mut n: u64 = 1;
        loop {
            let candidate = with_suffix(&base, &format!("{id}_{n}"));
            if !self.handle_in_use(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Append `suffix`, shortening `prefix` so the result fits the handle limit.
fn with_suffix(prefix: &str, suffix: &str) -> String {
    let keep = MAX_HANDLE_LEN.saturating_sub(suffix.chars().count());
    prefix.chars().take(keep).chain(suffix.chars()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    use crate::auth::repo_types::ResetCode;

    fn new_user(store: &UserStore, email: &str, first: &str, last: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password_hash: "digest".into(),
            name_first: first.into(),
            name_last: last.into(),
            handle: store.generate_unique_handle(first, last),
        }
    }

    fn insert(store: &mut UserStore, email: &str, first: &str, last: &str) -> UserId {
        let new = new_user(store, email, first, last);
        store.insert(new).expect("insert").id
    }

    #[test]
    fn ids_are_sequential_from_zero() {
        let mut store = UserStore::new();
        assert_eq!(insert(&mut store, "a@b.com", "A", "B"), 0);
        assert_eq!(insert(&mut store, "c@d.com", "C", "D"), 1);
        assert_eq!(insert(&mut store, "e@f.com", "E", "F"), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn lookups_by_email_and_id() {
        let mut store = UserStore::new();
        insert(&mut store, "leonwu@gmail.com", "Yilang", "W");
        assert!(store.email_in_use("leonwu@gmail.com"));
        assert_eq!(store.find_by_email("leonwu@gmail.com").map(|u| u.id), Some(0));
        assert!(store.find_by_email("nobody@gmail.com").is_none());
        assert_eq!(store.find_by_id(0).expect("user 0").handle, "yilangw");
        assert!(matches!(store.find_by_id(9), Err(StoreError::NotFound(9))));
    }

    #[test]
    fn duplicate_email_insert_is_rejected() {
        let mut store = UserStore::new();
        insert(&mut store, "a@b.com", "A", "B");
        let mut dup = new_user(&store, "a@b.com", "Other", "Person");
        dup.handle = "otherperson".into();
        assert!(matches!(store.insert(dup), Err(StoreError::DuplicateEmail(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn colliding_handle_uses_first_name_and_id() {
        let mut store = UserStore::new();
        insert(&mut store, "leonwu@gmail.com", "Yilang", "W");
        insert(&mut store, "billgates@outlook.com", "Bill", "Gates");
        insert(&mut store, "johnson@icloud.com", "M", "Johnson");
        insert(&mut store, "uniisfun@gmail.com", "Hayden", "Smith");
        insert(&mut store, "uniisnotfunatall@gmail.com", "Hayden", "Smith");
        assert_eq!(store.find_by_id(3).expect("user 3").handle, "haydensmith");
        assert_eq!(store.find_by_id(4).expect("user 4").handle, "hayden4");
    }

    #[test]
    fn handles_are_truncated_to_twenty_chars() {
        let store = UserStore::new();
        let handle = store.generate_unique_handle("Maximilian", "Featherstonehaugh");
        assert_eq!(handle, "maximilianfeathersto");
        assert_eq!(handle.chars().count(), MAX_HANDLE_LEN);
    }

    #[test]
    fn suffixed_handles_stay_within_limit() {
        let mut store = UserStore::new();
        let long_first = "Bartholomewbartholomew";
        insert(&mut store, "a@b.com", long_first, "X");
        let handle = store.generate_unique_handle(long_first, "X");
        assert_eq!(handle, "bartholomewbartholo1");
        assert_eq!(handle.chars().count(), MAX_HANDLE_LEN);
    }

    #[test]
    fn handles_drop_whitespace_and_case() {
        let store = UserStore::new();
        assert_eq!(store.generate_unique_handle("Mary Ann", "O Neil"), "maryannoneil");
    }

    #[test]
    fn repeated_collisions_still_yield_unique_handles() {
        let mut store = UserStore::new();
        insert(&mut store, "1@x.com", "Hayden", "Smith");
        // occupies "hayden2", the first-name fallback for the next user
        insert(&mut store, "2@x.com", "Hayden", "2");
        let third = store.generate_unique_handle("Hayden", "Smith");
        assert_eq!(third, "haydensmith2");
        insert(&mut store, "3@x.com", "Hayden", "Smith");
        let handles: HashSet<_> = (0..3)
            .map(|id| store.find_by_id(id).expect("user").handle.clone())
            .collect();
        assert_eq!(handles.len(), 3);
    }

    #[test]
    fn reset_code_lookup() {
        let mut store = UserStore::new();
        insert(&mut store, "a@b.com", "A", "B");
        assert!(!store.reset_code_in_use("123456"));
        store.get_mut(0).expect("user 0").reset_code = Some(ResetCode {
            code: "123456".into(),
            expires_at: OffsetDateTime::now_utc(),
        });
        assert_eq!(store.find_by_reset_code("123456").map(|u| u.id), Some(0));
        assert!(store.find_by_reset_code("654321").is_none());
    }
}
