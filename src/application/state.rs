//! Application state for the terminal user directory.
//!
//! [`App`] wraps the [`DirectoryMachine`] with everything that only the
//! terminal needs: the selected row, which form field has focus, the text
//! cursor, the help screen and the toast stack.

use super::directory::{Completion, DirectoryMachine};
use super::notifications::{Notifier, ToastQueue};
use super::scheduler::Clock;
use crate::domain::{DirectoryError, UserId};
use std::rc::Rc;
use std::time::Duration;

/// Represents the current mode of the application outside the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Table navigation; shortcuts available
    Normal,
    /// Help screen is displayed
    Help,
}

/// Focusable elements of the user form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Username,
    Email,
    Submit,
}

impl FormField {
    /// The field Tab moves to; wraps from the button back to the username.
    pub fn next(self) -> Self {
        match self {
            FormField::Username => FormField::Email,
            FormField::Email => FormField::Submit,
            FormField::Submit => FormField::Username,
        }
    }

    /// The field Shift+Tab moves to.
    pub fn previous(self) -> Self {
        match self {
            FormField::Username => FormField::Submit,
            FormField::Email => FormField::Username,
            FormField::Submit => FormField::Email,
        }
    }
}

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Records, draft and the in-flight request
    pub machine: DirectoryMachine,
    /// Notifications currently on screen
    pub toasts: ToastQueue,
    /// Normal table navigation or help screen
    pub mode: AppMode,
    /// Highlighted table row (zero-based)
    pub selected_row: usize,
    /// Form element receiving keystrokes
    pub focus: FormField,
    /// Cursor position, in characters, within the focused field
    pub cursor_position: usize,
    /// First visible line of the help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Validation problem shown inside the form
    pub form_error: Option<String>,
    clock: ClockHandle,
}

struct ClockHandle(Rc<dyn Clock>);

impl std::fmt::Debug for ClockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Clock")
    }
}

impl App {
    /// Creates the application around `machine`.
    ///
    /// `clock` drives both request completion and toast expiry; tests pass a
    /// `ManualClock` here.
    pub fn new(
        machine: DirectoryMachine,
        clock: Rc<dyn Clock>,
        toast_duration: Duration,
        max_toasts: usize,
    ) -> Self {
        Self {
            machine,
            toasts: ToastQueue::new(Rc::clone(&clock), toast_duration, max_toasts),
            mode: AppMode::Normal,
            selected_row: 0,
            focus: FormField::Username,
            cursor_position: 0,
            help_scroll: 0,
            status_message: None,
            form_error: None,
            clock: ClockHandle(clock),
        }
    }

    /// Kicks off the initial fetch of the directory.
    pub fn start(&mut self) {
        let now = self.clock.0.now();
        if let Err(err) = self.machine.begin_load(now) {
            self.report(err);
        }
    }

    /// Advances simulated requests and expires old toasts.
    pub fn tick(&mut self) {
        let now = self.clock.0.now();
        if let Some(completion) = self.machine.poll(now, &mut self.toasts) {
            self.after_completion(completion);
        }
        self.toasts.expire(now);
    }

    /// Whether the add/edit modal is showing.
    pub fn is_form_open(&self) -> bool {
        self.machine.is_modal_open()
    }

    /// True while any request is in flight.
    pub fn is_loading(&self) -> bool {
        self.machine.is_loading()
    }

    /// Time left before the in-flight request completes.
    pub fn pending_remaining(&self) -> Option<Duration> {
        let now = self.clock.0.now();
        self.machine.in_flight().map(|op| op.remaining(now))
    }

    /// Identity of the highlighted row, if the table has any rows.
    pub fn selected_user(&self) -> Option<UserId> {
        self.machine.users().get_index(self.selected_row).map(|user| user.id)
    }

    /// Moves the highlight up, stopping at the first row.
    pub fn select_previous(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    /// Moves the highlight down, stopping at the last row.
    pub fn select_next(&mut self) {
        if self.selected_row + 1 < self.machine.users().len() {
            self.selected_row += 1;
        }
    }

    /// Opens an empty form in add mode.
    pub fn open_add_form(&mut self) {
        self.status_message = None;
        match self.machine.open_add() {
            Ok(()) => self.reset_form_cursor(),
            Err(err) => self.report(err),
        }
    }

    /// Opens the form prefilled from the highlighted row. Does nothing on an
    /// empty table.
    pub fn open_edit_form(&mut self) {
        self.status_message = None;
        let Some(id) = self.selected_user() else {
            return;
        };
        match self.machine.open_edit(id) {
            Ok(()) => self.reset_form_cursor(),
            Err(err) => self.report(err),
        }
    }

    /// Schedules deletion of the highlighted row.
    pub fn delete_selected(&mut self) {
        self.status_message = None;
        let Some(id) = self.selected_user() else {
            return;
        };
        let now = self.clock.0.now();
        if let Err(err) = self.machine.delete(id, now) {
            self.report(err);
        }
    }

    /// Closes the form without saving and clears any validation message.
    pub fn close_form(&mut self) {
        self.machine.close_modal();
        self.form_error = None;
    }

    /// Validates the draft and schedules the create or update.
    ///
    /// Validation problems land in [`App::form_error`]; other refusals are
    /// reported in the status bar or as an error toast.
    pub fn submit_form(&mut self) {
        self.form_error = None;
        let now = self.clock.0.now();
        if let Err(err) = self.machine.submit(now) {
            self.report(err);
        }
    }

    /// Moves focus forward and puts the cursor at the end of the new field.
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
        self.cursor_to_end();
    }

    /// Moves focus backward.
    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
        self.cursor_to_end();
    }

    /// Inserts `c` at the cursor. Ignored on the button or while a request
    /// is running.
    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor_position;
        if let Some(field) = self.focused_field_mut() {
            let at = byte_index(field, cursor);
            field.insert(at, c);
            self.cursor_position += 1;
        }
    }

    /// Removes the character before the cursor.
    pub fn backspace(&mut self) {
        let cursor = self.cursor_position;
        if cursor == 0 {
            return;
        }
        if let Some(field) = self.focused_field_mut() {
            let at = byte_index(field, cursor - 1);
            field.remove(at);
            self.cursor_position -= 1;
        }
    }

    /// Removes the character under the cursor.
    pub fn delete_char(&mut self) {
        let cursor = self.cursor_position;
        if let Some(field) = self.focused_field_mut() {
            if cursor < field.chars().count() {
                let at = byte_index(field, cursor);
                field.remove(at);
            }
        }
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    /// Move cursor right, up to the end of the field
    pub fn cursor_right(&mut self) {
        if self.cursor_position < self.focused_len() {
            self.cursor_position += 1;
        }
    }

    /// Move cursor to start of field
    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    /// Move cursor to end of field
    pub fn cursor_to_end(&mut self) {
        self.cursor_position = self.focused_len();
    }

    fn focused_len(&self) -> usize {
        let draft = self.machine.draft();
        match self.focus {
            FormField::Username => draft.username.chars().count(),
            FormField::Email => draft.email.chars().count(),
            FormField::Submit => 0,
        }
    }

    fn focused_field_mut(&mut self) -> Option<&mut String> {
        let focus = self.focus;
        let draft = self.machine.draft_mut()?;
        match focus {
            FormField::Username => Some(&mut draft.username),
            FormField::Email => Some(&mut draft.email),
            FormField::Submit => None,
        }
    }

    fn reset_form_cursor(&mut self) {
        self.focus = FormField::Username;
        self.form_error = None;
        self.cursor_to_end();
    }

    fn after_completion(&mut self, completion: Completion) {
        let len = self.machine.users().len();
        if let Completion::Added(_) = completion {
            self.selected_row = len.saturating_sub(1);
        }
        if self.selected_row >= len {
            self.selected_row = len.saturating_sub(1);
        }
    }

    fn report(&mut self, err: DirectoryError) {
        match err {
            DirectoryError::Validation(err) => self.form_error = Some(err.to_string()),
            DirectoryError::NotFound(_) | DirectoryError::Transport(_) => {
                self.toasts.notify_error(&err.to_string());
            }
            DirectoryError::Busy | DirectoryError::InvalidTransition(_) => {
                self.status_message = Some(err.to_string());
            }
        }
    }
}

fn byte_index(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::directory::{ADDED_MESSAGE, DELETED_MESSAGE, Phase};
    use crate::application::notifications::ToastLevel;
    use crate::application::scheduler::ManualClock;
    use crate::domain::{StubService, UserDraft};

    const LATENCY: Duration = Duration::from_millis(1000);

    fn app_with(seed: Vec<UserDraft>) -> (App, ManualClock) {
        let clock = ManualClock::default();
        let service = StubService {
            seed,
            latency: LATENCY,
            ..StubService::default()
        };
        let machine = DirectoryMachine::new(Box::new(service));
        let app = App::new(machine, Rc::new(clock.clone()), Duration::from_millis(2000), 5);
        (app, clock)
    }

    fn loaded_app() -> (App, ManualClock) {
        let (mut app, clock) = app_with(vec![
            UserDraft::new("John Doe", "john@example.com"),
            UserDraft::new("Jane Doe", "jane@example.com"),
        ]);
        app.start();
        clock.advance(LATENCY);
        app.tick();
        (app, clock)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.insert_char(c);
        }
    }

    #[test]
    fn test_app_starts_loading() {
        let (mut app, clock) = app_with(vec![UserDraft::new("John Doe", "john@example.com")]);
        app.start();

        assert!(app.is_loading());
        assert_eq!(app.machine.phase(), Phase::Loading);
        assert_eq!(app.pending_remaining(), Some(LATENCY));

        clock.advance(LATENCY);
        app.tick();
        assert!(!app.is_loading());
        assert_eq!(app.machine.users().len(), 1);
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn test_add_through_form() {
        let (mut app, clock) = loaded_app();

        app.open_add_form();
        assert!(app.is_form_open());
        type_text(&mut app, "Ann");
        app.focus_next();
        type_text(&mut app, "ann@x.com");
        app.submit_form();
        assert!(app.is_loading());

        clock.advance(LATENCY);
        app.tick();

        assert!(!app.is_form_open());
        assert_eq!(app.machine.users().len(), 3);
        assert_eq!(app.selected_row, 2);
        let toast = app.toasts.visible().next().unwrap();
        assert_eq!(toast.message, ADDED_MESSAGE);
        assert_eq!(toast.level, ToastLevel::Success);
    }

    #[test]
    fn test_toast_disappears_after_duration() {
        let (mut app, clock) = loaded_app();
        app.delete_selected();
        clock.advance(LATENCY);
        app.tick();
        assert_eq!(app.toasts.visible().next().unwrap().message, DELETED_MESSAGE);

        clock.advance(Duration::from_millis(2000));
        app.tick();
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn test_edit_prefills_and_moves_cursor_to_end() {
        let (mut app, _clock) = loaded_app();
        app.select_next();
        app.open_edit_form();

        assert_eq!(app.machine.draft().username, "Jane Doe");
        assert_eq!(app.focus, FormField::Username);
        assert_eq!(app.cursor_position, "Jane Doe".len());
    }

    #[test]
    fn test_invalid_submit_shows_form_error() {
        let (mut app, _clock) = loaded_app();
        app.open_add_form();
        type_text(&mut app, "Ann");
        app.submit_form();

        assert_eq!(app.form_error.as_deref(), Some("Email is required"));
        assert!(!app.is_loading());
        assert!(app.is_form_open());
    }

    #[test]
    fn test_delete_last_row_clamps_selection() {
        let (mut app, clock) = loaded_app();
        app.select_next();
        app.delete_selected();
        clock.advance(LATENCY);
        app.tick();

        assert_eq!(app.machine.users().len(), 1);
        assert_eq!(app.selected_row, 0);
    }

    #[test]
    fn test_busy_reported_in_status() {
        let (mut app, _clock) = loaded_app();
        app.delete_selected();
        app.open_add_form();

        assert_eq!(
            app.status_message.as_deref(),
            Some("Another request is still in progress")
        );
        assert!(!app.is_form_open());
    }

    #[test]
    fn test_cursor_editing_multibyte() {
        let (mut app, _clock) = loaded_app();
        app.open_add_form();
        type_text(&mut app, "Zoë");
        app.cursor_left();
        app.insert_char('x');
        assert_eq!(app.machine.draft().username, "Zoxë");

        app.backspace();
        app.delete_char();
        assert_eq!(app.machine.draft().username, "Zo");

        app.cursor_home();
        app.delete_char();
        assert_eq!(app.machine.draft().username, "o");
    }

    #[test]
    fn test_focus_cycles() {
        assert_eq!(FormField::Submit.next(), FormField::Username);
        assert_eq!(FormField::Username.previous(), FormField::Submit);
    }

    #[test]
    fn test_typing_ignored_on_submit_button() {
        let (mut app, _clock) = loaded_app();
        app.open_add_form();
        app.focus_previous();
        type_text(&mut app, "abc");

        assert!(app.machine.draft().is_empty());
    }
}
