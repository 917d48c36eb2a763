//! TUI widget modules

pub mod bucket_tabs;
pub mod categories_popup;
pub mod header;
pub mod item_list;
pub mod popup;
pub mod shortcuts;
pub mod statistics;

pub use bucket_tabs::*;
pub use categories_popup::*;
pub use header::*;
pub use item_list::*;
pub use popup::*;
pub use shortcuts::*;
pub use statistics::*;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
