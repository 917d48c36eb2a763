use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};

use crate::AppState;

pub struct StatisticsWidget;

impl StatisticsWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let monitor = &state.feed_monitor;
        let visible = monitor.count_in(state.bucket, state.now());

        let mut stats_text = vec![
            Line::from(vec![
                Span::styled("Data Status: ", Style::default().fg(Color::White)),
                Span::styled(
                    if state.data_loaded {
                        format!("Loaded ({} items)", monitor.item_count())
                    } else if state.is_loading {
                        "Loading...".to_string()
                    } else {
                        "No data".to_string()
                    },
                    Style::default()
                        .fg(if state.data_loaded {
                            Color::Green
                        } else {
                            Color::Red
                        })
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("In Bucket: ", Style::default().fg(Color::White)),
                Span::styled(
                    format!("{}", visible),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Undated: ", Style::default().fg(Color::White)),
                Span::styled(
                    format!("{}", monitor.undated_count()),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            Line::from(vec![
                Span::styled("Newest: ", Style::default().fg(Color::White)),
                Span::styled(
                    match monitor.latest_published() {
                        Some(ts) => state.format_timestamp(Some(ts)),
                        None => "N/A".to_string(),
                    },
                    Style::default().fg(Color::Cyan),
                ),
            ]),
        ];

        if let Some(error) = &state.error_message {
            stats_text.push(Line::from(vec![
                Span::styled("Error: ", Style::default().fg(Color::Red)),
                Span::styled(
                    error.chars().take(80).collect::<String>()
                        + if error.chars().count() > 80 { "..." } else { "" },
                    Style::default().fg(Color::Red),
                ),
            ]));
        } else {
            stats_text.push(Line::from(vec![
                Span::styled("Last Update: ", Style::default().fg(Color::White)),
                Span::styled(
                    state
                        .last_update
                        .with_timezone(&state.timezone())
                        .format("%H:%M:%S")
                        .to_string(),
                    Style::default().fg(Color::Cyan),
                ),
            ]));
        }

        let stats = Paragraph::new(stats_text)
            .block(Block::bordered().title("Statistics"))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });

        frame.render_widget(stats, area);
    }
}
