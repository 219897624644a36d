//! A popup container that owns nothing but its frame.
//!
//! The caller supplies the visibility flag, the content and what to do on
//! close. When hidden the host draws nothing and lets every key through, so
//! the caller's state stays the only source of truth between openings.

use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear},
};

#[derive(Debug, Clone, Copy)]
pub struct ModalHost<'a> {
    visible: bool,
    title: &'a str,
    width: u16,
    height: u16,
}

impl<'a> ModalHost<'a> {
    pub fn new(visible: bool, title: &'a str) -> Self {
        Self {
            visible,
            title,
            width: 50,
            height: 12,
        }
    }

    /// Preferred outer size; clipped to the frame.
    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Draws the popup and hands its inner area to `content`.
    /// Returns whether anything was drawn.
    pub fn render(self, f: &mut Frame, content: impl FnOnce(&mut Frame, Rect)) -> bool {
        if !self.visible {
            return false;
        }
        let area = centered_rect(self.width, self.height, f.area());
        f.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        f.render_widget(block, area);
        content(f, inner);
        true
    }

    /// Consumes the close key while visible and runs `on_close`.
    pub fn intercept(&self, key: KeyCode, on_close: impl FnOnce()) -> bool {
        if self.visible && key == KeyCode::Esc {
            on_close();
            true
        } else {
            false
        }
    }
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
