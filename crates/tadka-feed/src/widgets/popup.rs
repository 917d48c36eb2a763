use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};
use tadka_feed_core::{days_diff, FeedItem, Timestamped};

use super::centered_rect;
use crate::AppState;

pub struct ItemDetailPopupWidget;

impl ItemDetailPopupWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(item) = state.selected_item() else {
            return;
        };

        let popup_area = centered_rect(60, 60, area);

        frame.render_widget(Clear, popup_area);

        let popup = Paragraph::new(Self::create_detail_text(state, &item))
            .block(
                Block::bordered()
                    .title("Item Details")
                    .title_alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Cyan)),
            )
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });

        frame.render_widget(popup, popup_area);
    }

    fn create_detail_text(state: &AppState, item: &FeedItem) -> Vec<Line<'static>> {
        let label = Style::default().fg(Color::White);

        let age = match item.published_at() {
            Some(ts) => match days_diff(ts, state.now()) {
                d if d < 0 => format!("in {} day(s)", -d),
                0 => "today".to_string(),
                d => format!("{} day(s) ago", d),
            },
            None => "unknown".to_string(),
        };

        let mut detail_text = vec![
            Line::from(vec![Span::styled(
                item.title().to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(" "),
            Line::from(vec![
                Span::styled("Category: ", label),
                Span::styled(item.category().to_string(), Style::default().fg(Color::Magenta)),
            ]),
            Line::from(vec![
                Span::styled("Published: ", label),
                Span::styled(
                    state.format_timestamp(item.published_at()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(format!(" ({})", age), Style::default().fg(Color::Gray)),
            ]),
            Line::from(vec![
                Span::styled("ID: ", label),
                Span::styled(item.id().to_string(), Style::default().fg(Color::Gray)),
            ]),
        ];

        if let Some(slug) = item.slug() {
            detail_text.push(Line::from(vec![
                Span::styled("Slug: ", label),
                Span::styled(slug.to_string(), Style::default().fg(Color::Gray)),
            ]));
        }

        if let Some(summary) = item.summary() {
            detail_text.push(Line::from(" "));
            detail_text.push(Line::from(Span::styled(
                summary.to_string(),
                Style::default().fg(Color::White),
            )));
        }

        detail_text.extend(vec![
            Line::from(" "),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to close", Style::default().fg(Color::Gray)),
            ]),
        ]);

        detail_text
    }
}
