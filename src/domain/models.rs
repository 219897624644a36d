use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Stable identity of a record in the directory.
///
/// Assigned from a monotonic counter when the record enters the directory
/// and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The editable fields of a user, without identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
}

impl UserDraft {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.email.is_empty()
    }

    pub fn clear(&mut self) {
        self.username.clear();
        self.email.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl User {
    pub fn to_draft(&self) -> UserDraft {
        UserDraft::new(self.username.clone(), self.email.clone())
    }
}

/// Ordered collection of users; insertion order is display order.
///
/// Every mutation swaps in a freshly built snapshot, so a snapshot obtained
/// from [`Directory::snapshot`] never changes after the fact.
#[derive(Debug, Clone)]
pub struct Directory {
    users: Arc<[User]>,
    next_id: u64,
}

impl Default for Directory {
    fn default() -> Self {
        Self {
            users: Arc::from(Vec::new()),
            next_id: 1,
        }
    }
}

impl Directory {
    pub fn from_drafts(drafts: impl IntoIterator<Item = UserDraft>) -> Self {
        let mut directory = Self::default();
        directory.replace_all(drafts);
        directory
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn snapshot(&self) -> Arc<[User]> {
        Arc::clone(&self.users)
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn get_index(&self, index: usize) -> Option<&User> {
        self.users.get(index)
    }

    pub fn position(&self, id: UserId) -> Option<usize> {
        self.users.iter().position(|user| user.id == id)
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.position(id).is_some()
    }

    /// Discards every record and loads `drafts` with fresh ids.
    pub fn replace_all(&mut self, drafts: impl IntoIterator<Item = UserDraft>) {
        let users: Vec<User> = drafts
            .into_iter()
            .map(|draft| self.mint(draft))
            .collect();
        self.users = Arc::from(users);
    }

    /// Appends a record built from `draft`. Duplicates are allowed.
    pub fn append(&mut self, draft: UserDraft) -> UserId {
        let user = self.mint(draft);
        let id = user.id;
        let mut users = self.users.to_vec();
        users.push(user);
        self.users = Arc::from(users);
        id
    }

    /// Overwrites the fields of `id` in place. Returns `false` if absent.
    pub fn replace(&mut self, id: UserId, draft: UserDraft) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        let mut users = self.users.to_vec();
        users[position] = User {
            id,
            username: draft.username,
            email: draft.email,
        };
        self.users = Arc::from(users);
        true
    }

    /// Removes `id`, keeping survivors in their relative order.
    pub fn remove(&mut self, id: UserId) -> Option<User> {
        let position = self.position(id)?;
        let mut users = self.users.to_vec();
        let removed = users.remove(position);
        self.users = Arc::from(users);
        Some(removed)
    }

    fn mint(&mut self, draft: UserDraft) -> User {
        let id = UserId(self.next_id);
        self.next_id += 1;
        User {
            id,
            username: draft.username,
            email: draft.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_users() -> Directory {
        Directory::from_drafts([UserDraft::new("A", "a@x"), UserDraft::new("B", "b@x")])
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let mut directory = Directory::default();
        let first = directory.append(UserDraft::new("Ann", "ann@x.com"));
        let second = directory.append(UserDraft::new("Ann", "ann@x.com"));

        assert!(second > first);
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut directory = two_users();
        let last = directory.get_index(1).unwrap().id;
        directory.remove(last);
        let fresh = directory.append(UserDraft::new("C", "c@x"));

        assert_ne!(fresh, last);
    }

    #[test]
    fn test_replace_preserves_position() {
        let mut directory = two_users();
        let first = directory.get_index(0).unwrap().id;

        assert!(directory.replace(first, UserDraft::new("C", "c@x")));
        let names: Vec<_> = directory.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["C", "B"]);
        assert_eq!(directory.get_index(0).unwrap().id, first);
    }

    #[test]
    fn test_replace_missing_id() {
        let mut directory = two_users();
        let gone = directory.get_index(0).unwrap().id;
        directory.remove(gone);

        assert!(!directory.replace(gone, UserDraft::new("C", "c@x")));
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_snapshot_unaffected_by_later_mutation() {
        let mut directory = two_users();
        let before = directory.snapshot();
        directory.append(UserDraft::new("C", "c@x"));

        assert_eq!(before.len(), 2);
        assert_eq!(directory.len(), 3);
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut directory = Directory::from_drafts([
            UserDraft::new("A", "a@x"),
            UserDraft::new("B", "b@x"),
            UserDraft::new("C", "c@x"),
        ]);
        let middle = directory.get_index(1).unwrap().id;
        let removed = directory.remove(middle).unwrap();

        assert_eq!(removed.username, "B");
        let names: Vec<_> = directory.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
    }
}
