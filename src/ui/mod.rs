//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Preview scroll position
//! - [`style`]: Palette for the light and dark themes
//! - Screen layout and the clickable toolbar

pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;

pub use overlays::{help_popup_rect, upload_popup_rect};
pub use render::{line_number_width, render};

pub const APP_TITLE: &str = "Markdown Editor";
pub const HEADER_ROWS: u16 = 1;
/// Message line plus status bar.
pub const FOOTER_ROWS: u16 = 2;
pub const EDITOR_WIDTH_PERCENT: u16 = 50;
pub const PREVIEW_WIDTH_PERCENT: u16 = 50;
pub const PREVIEW_LEFT_PADDING: u16 = 1;
const TOOLBAR_GAP: u16 = 1;

/// Screen regions, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub editor: Rect,
    pub preview: Rect,
    pub message: Rect,
    pub status: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_ROWS),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
    let panes = split_panes(rows[1]);
    ScreenLayout {
        header: rows[0],
        editor: panes[0],
        preview: panes[1],
        message: rows[2],
        status: rows[3],
    }
}

pub fn split_panes(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(EDITOR_WIDTH_PERCENT),
            Constraint::Percentage(PREVIEW_WIDTH_PERCENT),
        ])
        .split(area)
}

/// Area inside a pane's border.
pub fn pane_inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Width the preview lays its lines out to, for a terminal of the given size.
pub fn preview_content_width(width: u16, height: u16) -> u16 {
    let layout = screen_layout(Rect::new(0, 0, width, height));
    pane_inner(layout.preview)
        .width
        .saturating_sub(PREVIEW_LEFT_PADDING)
        .max(1)
}

/// Visible text rows in either pane.
pub fn pane_text_rows(width: u16, height: u16) -> u16 {
    let layout = screen_layout(Rect::new(0, 0, width, height));
    pane_inner(layout.editor).height
}

/// Visible text columns in the editor pane, after the line-number gutter.
pub fn editor_text_cols(width: u16, height: u16, total_lines: usize) -> u16 {
    let layout = screen_layout(Rect::new(0, 0, width, height));
    pane_inner(layout.editor)
        .width
        .saturating_sub(line_number_width(total_lines) + 1)
}

/// A clickable header button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Theme,
    Undo,
    Copy,
    Download,
    Upload,
}

impl ToolbarAction {
    pub const ALL: [Self; 5] = [
        Self::Theme,
        Self::Undo,
        Self::Copy,
        Self::Download,
        Self::Upload,
    ];

    /// Button caption. The theme button shows the theme it switches to.
    pub const fn label(self, theme: Theme) -> &'static str {
        match self {
            Self::Theme => match theme {
                Theme::Dark => "[☀ Theme]",
                Theme::Light => "[☾ Theme]",
            },
            Self::Undo => "[↶ Undo]",
            Self::Copy => "[⧉ Copy]",
            Self::Download => "[⤓ Download]",
            Self::Upload => "[⤒ Upload]",
        }
    }
}

/// Button positions in the header, right-aligned.
pub fn toolbar_buttons(header: Rect, theme: Theme) -> Vec<(ToolbarAction, Rect)> {
    let widths: Vec<u16> = ToolbarAction::ALL
        .iter()
        .map(|action| u16::try_from(action.label(theme).width()).unwrap_or(u16::MAX))
        .collect();
    let gaps = TOOLBAR_GAP * u16::try_from(widths.len().saturating_sub(1)).unwrap_or(0);
    let total = widths.iter().sum::<u16>() + gaps;
    let mut x = header.x + header.width.saturating_sub(total + 1);

    ToolbarAction::ALL
        .iter()
        .zip(widths)
        .map(|(action, width)| {
            let rect = Rect::new(x, header.y, width, 1).intersection(header);
            x = x.saturating_add(width + TOOLBAR_GAP);
            (*action, rect)
        })
        .collect()
}

/// The toolbar button under a screen position, if any.
pub fn toolbar_button_at(header: Rect, theme: Theme, x: u16, y: u16) -> Option<ToolbarAction> {
    toolbar_buttons(header, theme)
        .into_iter()
        .find(|(_, rect)| point_in_rect(x, y, *rect))
        .map(|(action, _)| action)
}

pub const fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}
