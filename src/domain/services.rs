//! The backend port the directory talks to.
//!
//! Requests are issued when a simulated operation completes, after the
//! service's latency has elapsed. A service that never fails reproduces the
//! plain mock behavior; real backends report [`DirectoryError::Transport`].

use super::errors::DirectoryResult;
use super::models::{UserDraft, UserId};
use std::time::Duration;

#[cfg(test)]
use super::errors::DirectoryError;
#[cfg(test)]
use std::{cell::RefCell, rc::Rc};

/// A request against the user backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Fetch,
    Create(UserDraft),
    Update(UserId, UserDraft),
    Delete(UserId),
}

impl Request {
    pub fn label(&self) -> &'static str {
        match self {
            Request::Fetch => "fetch",
            Request::Create(_) => "create",
            Request::Update(..) => "update",
            Request::Delete(_) => "delete",
        }
    }
}

pub trait UserService {
    /// How long every request takes to answer.
    fn latency(&self) -> Duration;

    /// Returns the initial records to seed the directory with.
    fn fetch_users(&mut self) -> DirectoryResult<Vec<UserDraft>>;

    fn create_user(&mut self, draft: &UserDraft) -> DirectoryResult<()>;

    fn update_user(&mut self, id: UserId, draft: &UserDraft) -> DirectoryResult<()>;

    fn delete_user(&mut self, id: UserId) -> DirectoryResult<()>;
}

/// Service answering from a fixed seed; used by unit tests.
///
/// `calls` is shared so a test can keep a handle after boxing the service.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct StubService {
    pub seed: Vec<UserDraft>,
    pub latency: Duration,
    pub fail_with: Option<String>,
    pub calls: Rc<RefCell<Vec<&'static str>>>,
}

#[cfg(test)]
impl StubService {
    fn answer(&mut self, call: &'static str) -> DirectoryResult<()> {
        self.calls.borrow_mut().push(call);
        match &self.fail_with {
            Some(message) => Err(DirectoryError::Transport(message.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
impl UserService for StubService {
    fn latency(&self) -> Duration {
        self.latency
    }

    fn fetch_users(&mut self) -> DirectoryResult<Vec<UserDraft>> {
        self.answer("fetch")?;
        Ok(self.seed.clone())
    }

    fn create_user(&mut self, _draft: &UserDraft) -> DirectoryResult<()> {
        self.answer("create")
    }

    fn update_user(&mut self, _id: UserId, _draft: &UserDraft) -> DirectoryResult<()> {
        self.answer("update")
    }

    fn delete_user(&mut self, _id: UserId) -> DirectoryResult<()> {
        self.answer("delete")
    }
}
