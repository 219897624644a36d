use super::modal::ModalHost;
use crate::application::{App, AppMode, FormField, FormMode, ToastLevel};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
};

const TOAST_WIDTH: u16 = 40;

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    if app.is_loading() {
        render_loading(f, chunks[1]);
    } else {
        render_users(f, app, chunks[1]);
    }
    render_status_bar(f, app, chunks[2]);

    let title = match app.machine.form_mode() {
        Some(FormMode::Edit(_)) => "Edit user",
        _ => "Add user",
    };
    ModalHost::new(app.is_form_open(), title)
        .size(50, 13)
        .render(f, |f, area| render_form(f, app, area));

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
    render_toasts(f, app);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let phase = match app.pending_remaining() {
        Some(left) => format!("{} ({:.1}s)", app.machine.phase(), left.as_secs_f32()),
        None => app.machine.phase().to_string(),
    };
    let header = Paragraph::new(format!(
        "usrdir - User Directory | Users: {} | {}",
        app.machine.users().len(),
        phase
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_loading(f: &mut Frame, area: Rect) {
    let loading = Paragraph::new("Loading...")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Users"));
    f.render_widget(loading, area);
}

fn render_users(f: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["Username", "Email", "Action"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .height(1);

    let rows = app.machine.rows().map(|(index, user)| {
        let shade = if index % 2 == 0 { Color::DarkGray } else { Color::Black };
        Row::new(vec![
            Cell::from(user.username.clone()),
            Cell::from(user.email.clone()),
            Cell::from("e: edit  d: delete"),
        ])
        .style(Style::default().bg(shade))
    });

    let widths = [
        Constraint::Percentage(35),
        Constraint::Percentage(40),
        Constraint::Percentage(25),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Users"))
        .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .column_spacing(1);

    let mut state = TableState::default();
    if !app.machine.users().is_empty() {
        state.select(Some(app.selected_row));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let draft = app.machine.draft();
    render_input(f, app, chunks[0], "Username", &draft.username, FormField::Username);
    render_input(f, app, chunks[1], "Email", &draft.email, FormField::Email);

    if let Some(ref error) = app.form_error {
        let error = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(error, chunks[2]);
    }

    let label = if app.is_loading() {
        "Saving...".to_string()
    } else {
        let mode = app.machine.form_mode().unwrap_or(FormMode::Add);
        format!("[ {} ]", mode.submit_label())
    };
    let button_style = if app.focus == FormField::Submit {
        Style::default().bg(Color::LightBlue).fg(Color::Black)
    } else {
        Style::default().fg(Color::LightBlue)
    };
    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(button_style);
    f.render_widget(button, chunks[3]);
}

fn render_input(f: &mut Frame, app: &App, area: Rect, label: &str, value: &str, field: FormField) {
    let focused = app.focus == field;
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label)
            .border_style(border),
    );
    f.render_widget(input, area);

    if focused && !app.is_loading() {
        let offset = u16::try_from(app.cursor_position.min(value.chars().count()))
            .unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(offset)
            .min(area.right().saturating_sub(2));
        f.set_cursor_position((x, area.y + 1));
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = if matches!(app.mode, AppMode::Help) {
        "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string()
    } else if app.is_form_open() {
        "Tab/↑↓: change field | Enter: next field, submit on button | Esc: cancel".to_string()
    } else if let Some(ref status) = app.status_message {
        status.clone()
    } else {
        "a: add | e/Enter: edit | d/Del: delete | ↑↓/jk: move | F1/?: help | q: quit".to_string()
    };

    let style = if app.is_form_open() {
        Style::default().fg(Color::Green)
    } else if matches!(app.mode, AppMode::Help) {
        Style::default().fg(Color::Cyan)
    } else if app.status_message.is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

/// Toasts stack downward from the top-center of the screen.
fn render_toasts(f: &mut Frame, app: &App) {
    let area = f.area();
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + (area.width - width) / 2;
    let mut y = area.y + 1;

    for toast in app.toasts.visible() {
        if y + 3 > area.bottom() {
            break;
        }
        let rect = Rect { x, y, width, height: 3 };
        let (color, mark) = match toast.level {
            ToastLevel::Success => (Color::Green, "✔"),
            ToastLevel::Error => (Color::Red, "✖"),
        };
        f.render_widget(Clear, rect);
        let widget = Paragraph::new(format!("{mark} {}", toast.message))
            .alignment(Alignment::Center)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
        f.render_widget(widget, rect);
        y += 3;
    }
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("usrdir Help (Line {}/{})", start_line + 1, help_lines.len()))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

pub const HELP_TEXT: &str = r#"USRDIR KEY REFERENCE

=== USER TABLE ===
a               Add a new user
e or Enter      Edit the selected user
d or Delete     Delete the selected user
↑↓ or j/k       Move the selection
F1 or ?         Show this help
q               Quit

=== USER FORM ===
Tab / ↓         Next field
Shift+Tab / ↑   Previous field
Enter           Next field; submits on the button
Esc             Close the form without saving
←→ Home End     Move the cursor
Backspace/Del   Delete characters

=== REQUESTS ===
Every change is sent to a simulated backend and takes effect
after a short delay. While a request is running the table shows
"Loading..." and no other change can be started.
A notification appears at the top of the screen once the change
has been applied, and disappears on its own.

=== CONFIGURATION ===
usrdir.json in the working directory may set:
  latency_ms, toast_duration_ms, max_toasts, fail_every,
  log_file, seed

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#;
