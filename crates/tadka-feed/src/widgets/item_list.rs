use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph},
    Frame,
};
use tadka_feed_core::Timestamped;

use crate::AppState;

pub struct ItemListWidget;

impl ItemListWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let items = state.visible_items();
        let title = format!("{} ({})", state.bucket.label(), items.len());

        if items.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "Nothing to show in this bucket",
                Style::default().fg(Color::Gray),
            )))
            .block(Block::bordered().title(title))
            .alignment(Alignment::Center);

            frame.render_widget(empty, area);
            return;
        }

        let rows: Vec<ListItem> = items
            .iter()
            .map(|item| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<19}", state.format_timestamp(item.published_at())),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(
                        format!("[{}] ", item.category()),
                        Style::default().fg(Color::Magenta),
                    ),
                    Span::styled(item.title().to_string(), Style::default().fg(Color::White)),
                ]))
            })
            .collect();

        let list = List::new(rows)
            .block(Block::bordered().title(title))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut list_state = ListState::default().with_selected(Some(state.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}
