//! In-memory stand-in for the user backend.
//!
//! Every request "succeeds" after the configured latency unless failure
//! injection is switched on, in which case every Nth request reports a
//! transport error instead.

use crate::domain::{DirectoryError, DirectoryResult, UserDraft, UserId, UserService};
use std::time::Duration;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct MockUserService {
    latency: Duration,
    seed: Vec<UserDraft>,
    fail_every: Option<u32>,
    requests: u32,
}

impl MockUserService {
    pub fn new(latency: Duration, seed: Vec<UserDraft>) -> Self {
        Self {
            latency,
            seed,
            fail_every: None,
            requests: 0,
        }
    }

    /// Makes every `n`th request fail. `0` disables failures.
    pub fn with_failures(mut self, fail_every: Option<u32>) -> Self {
        self.fail_every = fail_every.filter(|n| *n > 0);
        self
    }

    pub fn requests(&self) -> u32 {
        self.requests
    }

    fn answer(&mut self, request: &str) -> DirectoryResult<()> {
        self.requests += 1;
        trace!(request, count = self.requests, "mock backend request");
        match self.fail_every {
            Some(n) if self.requests % n == 0 => Err(DirectoryError::Transport(format!(
                "simulated failure on {request} request"
            ))),
            _ => Ok(()),
        }
    }
}

impl UserService for MockUserService {
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
