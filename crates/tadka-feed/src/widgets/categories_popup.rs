use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::AppState;

pub struct CategoriesPopupWidget;

impl CategoriesPopupWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let popup_area = centered_rect(50, 70, area);

        frame.render_widget(Clear, popup_area);

        let popup = Paragraph::new(Self::create_breakdown_text(state))
            .block(
                Block::bordered()
                    .title("Categories")
                    .title_alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Cyan)),
            )
            .alignment(Alignment::Left);

        frame.render_widget(popup, popup_area);
    }

    fn create_breakdown_text(state: &AppState) -> Vec<Line<'static>> {
        let breakdown = state.feed_monitor.category_breakdown();
        let total = state.feed_monitor.item_count();

        let mut sorted: Vec<_> = breakdown.into_iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut breakdown_text = vec![
            Line::from(vec![
                Span::styled("Total Items: ", Style::default().fg(Color::White)),
                Span::styled(
                    format!("{}", total),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(" "),
        ];

        for (category, count) in sorted {
            let share = if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            };

            breakdown_text.push(Line::from(vec![
                Span::styled("  ", Style::default()),
                Span::styled(format!("{:<20}", category), Style::default().fg(Color::White)),
                Span::styled(
                    format!("{:>5} ({:.0}%)", count, share),
                    Style::default().fg(Color::Green),
                ),
            ]));
        }

        breakdown_text.extend(vec![
            Line::from(" "),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "c",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to close", Style::default().fg(Color::Gray)),
            ]),
        ]);

        breakdown_text
    }
}
