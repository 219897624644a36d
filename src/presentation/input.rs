use super::modal::ModalHost;
use crate::application::{App, AppMode, FormField};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if matches!(app.mode, AppMode::Help) {
            Self::handle_help_mode(app, key);
            return;
        }

        let host = ModalHost::new(app.is_form_open(), "");
        if host.intercept(key, || app.close_form()) {
            return;
        }
        if host.is_visible() {
            Self::handle_form_mode(app, key, modifiers);
        } else {
            Self::handle_normal_mode(app, key);
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode) {
        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Char('a') => app.open_add_form(),
            KeyCode::Char('e') | KeyCode::Enter => app.open_edit_form(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_form_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Enter if app.focus == FormField::Submit => app.submit_form(),
            KeyCode::Enter => app.focus_next(),
            KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => app.focus_previous(),
            KeyCode::Tab | KeyCode::Down => app.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
            KeyCode::Backspace => app.backspace(),
            KeyCode::Delete => app.delete_char(),
            KeyCode::Left => app.cursor_left(),
            KeyCode::Right => app.cursor_right(),
            KeyCode::Home => app.cursor_home(),
            KeyCode::End => app.cursor_to_end(),
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}
