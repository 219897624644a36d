//! The user directory state machine.
//!
//! [`DirectoryMachine`] owns the records, the form draft and the single
//! in-flight request. Every transition takes the current time explicitly;
//! completions are applied when [`DirectoryMachine::poll`] is called after
//! the request's deadline.

use super::notifications::Notifier;
use super::scheduler::{FlightSlot, InFlight};
use crate::domain::{
    Directory, DirectoryError, DirectoryResult, Request, User, UserDraft, UserId, UserService,
    validate_draft,
};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const ADDED_MESSAGE: &str = "User added successfully!";
pub const UPDATED_MESSAGE: &str = "User updated successfully!";
pub const DELETED_MESSAGE: &str = "User deleted successfully!";

/// What the open form will do on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(UserId),
}

impl FormMode {
    pub fn submit_label(self) -> &'static str {
        match self {
            FormMode::Add => "Add",
            FormMode::Edit(_) => "Edit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Initial fetch in progress
    Loading,
    Idle,
    AddFlow,
    EditFlow,
    /// Create or update waiting on the backend
    Submitting,
    Deleting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Loading => "Loading",
            Phase::Idle => "Idle",
            Phase::AddFlow => "Adding",
            Phase::EditFlow => "Editing",
            Phase::Submitting => "Submitting",
            Phase::Deleting => "Deleting",
        };
        f.write_str(name)
    }
}

/// Outcome of a request that reached its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Loaded(usize),
    Added(UserId),
    Updated(UserId),
    Deleted(UserId),
    Failed(DirectoryError),
}

pub struct DirectoryMachine {
    users: Directory,
    draft: UserDraft,
    form: Option<FormMode>,
    modal_open: bool,
    flight: FlightSlot,
    service: Box<dyn UserService>,
}

impl fmt::Debug for DirectoryMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryMachine")
            .field("users", &self.users)
            .field("draft", &self.draft)
            .field("form", &self.form)
            .field("modal_open", &self.modal_open)
            .field("flight", &self.flight)
            .finish_non_exhaustive()
    }
}

impl DirectoryMachine {
    pub fn new(service: Box<dyn UserService>) -> Self {
        Self::seeded(service, Vec::new())
    }

    /// Starts with `drafts` already loaded, skipping the initial fetch.
    pub fn seeded(service: Box<dyn UserService>, drafts: Vec<UserDraft>) -> Self {
        Self {
            users: Directory::from_drafts(drafts),
            draft: UserDraft::default(),
            form: None,
            modal_open: false,
            flight: FlightSlot::default(),
            service,
        }
    }

    pub fn users(&self) -> &Directory {
        &self.users
    }

    pub fn snapshot(&self) -> Arc<[User]> {
        self.users.snapshot()
    }

    /// Each record with its display position.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &User)> {
        self.users.iter().enumerate()
    }

    pub fn draft(&self) -> &UserDraft {
        &self.draft
    }

    /// The draft, while it may still be edited: a form is open and nothing
    /// has been submitted yet.
    pub fn draft_mut(&mut self) -> Option<&mut UserDraft> {
        if self.form.is_some() && self.modal_open && !self.flight.is_busy() {
            Some(&mut self.draft)
        } else {
            None
        }
    }

    pub fn form_mode(&self) -> Option<FormMode> {
        self.form
    }

    pub fn edit_target(&self) -> Option<UserId> {
        match self.form {
            Some(FormMode::Edit(id)) => Some(id),
            _ => None,
        }
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn is_loading(&self) -> bool {
        self.flight.is_busy()
    }

    pub fn in_flight(&self) -> Option<&InFlight> {
        self.flight.current()
    }

    pub fn phase(&self) -> Phase {
        if let Some(op) = self.flight.current() {
            return match op.request {
                Request::Fetch => Phase::Loading,
                Request::Create(_) | Request::Update(..) => Phase::Submitting,
                Request::Delete(_) => Phase::Deleting,
            };
        }
        match self.form {
            Some(FormMode::Add) => Phase::AddFlow,
            Some(FormMode::Edit(_)) => Phase::EditFlow,
            None => Phase::Idle,
        }
    }

    /// Schedules the initial fetch that replaces every record.
    pub fn begin_load(&mut self, now: Instant) -> DirectoryResult<()> {
        self.ensure_idle("cannot reload while the form is open")?;
        self.start(Request::Fetch, now)
    }

    pub fn open_add(&mut self) -> DirectoryResult<()> {
        self.ensure_idle("a form is already open")?;
        self.draft.clear();
        self.form = Some(FormMode::Add);
        self.modal_open = true;
        debug!("opened add form");
        Ok(())
    }

    pub fn open_edit(&mut self, id: UserId) -> DirectoryResult<()> {
        self.ensure_idle("a form is already open")?;
        let user = self.users.get(id).ok_or(DirectoryError::NotFound(id))?;
        self.draft = user.to_draft();
        self.form = Some(FormMode::Edit(id));
        self.modal_open = true;
        debug!(%id, "opened edit form");
        Ok(())
    }

    /// Closes the form without saving. A request already submitted still
    /// runs to completion.
    pub fn close_modal(&mut self) {
        if self.modal_open {
            debug!(phase = %self.phase(), "closed form");
        }
        self.modal_open = false;
        if !self.flight.is_busy() {
            self.form = None;
        }
    }

    pub fn submit(&mut self, now: Instant) -> DirectoryResult<()> {
        if self.flight.is_busy() {
            return Err(DirectoryError::Busy);
        }
        let Some(mode) = self.form.filter(|_| self.modal_open) else {
            return Err(DirectoryError::InvalidTransition("no form is open"));
        };
        let trimmed = self.draft.email.trim();
        if trimmed.len() != self.draft.email.len() {
            self.draft.email = trimmed.to_string();
        }
        validate_draft(&self.draft)?;
        let request = match mode {
            FormMode::Add => Request::Create(self.draft.clone()),
            FormMode::Edit(id) => {
                if !self.users.contains(id) {
                    return Err(DirectoryError::NotFound(id));
                }
                Request::Update(id, self.draft.clone())
            }
        };
        self.start(request, now)
    }

    pub fn delete(&mut self, id: UserId, now: Instant) -> DirectoryResult<()> {
        self.ensure_idle("close the form before deleting")?;
        if !self.users.contains(id) {
            return Err(DirectoryError::NotFound(id));
        }
        self.start(Request::Delete(id), now)
    }

    /// Applies the in-flight request if its deadline has passed.
    pub fn poll(&mut self, now: Instant, notifier: &mut dyn Notifier) -> Option<Completion> {
        let op = self.flight.take_due(now)?;
        let label = op.request.label();
        let completion = match self.complete(op.request) {
            Ok(completion) => {
                info!(request = label, ?completion, "request completed");
                completion
            }
            Err(err) => {
                warn!(request = label, error = %err, "request failed");
                if !self.modal_open {
                    self.form = None;
                }
                notifier.notify_error(&err.to_string());
                return Some(Completion::Failed(err));
            }
        };
        match completion {
            Completion::Added(_) => notifier.notify(ADDED_MESSAGE),
            Completion::Updated(_) => notifier.notify(UPDATED_MESSAGE),
            Completion::Deleted(_) => notifier.notify(DELETED_MESSAGE),
            Completion::Loaded(_) | Completion::Failed(_) => {}
        }
        Some(completion)
    }

    fn complete(&mut self, request: Request) -> DirectoryResult<Completion> {
        match request {
            Request::Fetch => {
                let drafts = self.service.fetch_users()?;
                let count = drafts.len();
                self.users.replace_all(drafts);
                Ok(Completion::Loaded(count))
            }
            Request::Create(draft) => {
                self.service.create_user(&draft)?;
                let id = self.users.append(draft);
                self.finish_form();
                Ok(Completion::Added(id))
            }
            Request::Update(id, draft) => {
                if !self.users.contains(id) {
                    return Err(DirectoryError::NotFound(id));
                }
                self.service.update_user(id, &draft)?;
                self.users.replace(id, draft);
                self.finish_form();
                Ok(Completion::Updated(id))
            }
            Request::Delete(id) => {
                if !self.users.contains(id) {
                    return Err(DirectoryError::NotFound(id));
                }
                self.service.delete_user(id)?;
                self.users.remove(id);
                Ok(Completion::Deleted(id))
            }
        }
    }

    fn finish_form(&mut self) {
        self.draft.clear();
        self.form = None;
        self.modal_open = false;
    }

    fn ensure_idle(&self, open_form: &'static str) -> DirectoryResult<()> {
        if self.flight.is_busy() {
            return Err(DirectoryError::Busy);
        }
        if self.form.is_some() {
            return Err(DirectoryError::InvalidTransition(open_form));
        }
        Ok(())
    }

    fn start(&mut self, request: Request, now: Instant) -> DirectoryResult<()> {
        let label = request.label();
        let latency = self.service.latency();
        if !self.flight.start(request, now, latency) {
            return Err(DirectoryError::Busy);
        }
        debug!(request = label, ?latency, "request started");
        Ok(())
    }
}
