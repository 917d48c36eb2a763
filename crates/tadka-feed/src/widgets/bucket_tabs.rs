use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Tabs},
    Frame,
};

use crate::AppState;

pub struct BucketTabsWidget;

impl BucketTabsWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let titles: Vec<Line> = state
            .feed_monitor
            .bucket_counts(state.now())
            .iter()
            .map(|count| Line::from(format!("{} ({})", count.bucket().label(), count.count())))
            .collect();

        let tabs = Tabs::new(titles)
            .block(Block::bordered().title("Buckets"))
            .select(state.bucket.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .divider("|");

        frame.render_widget(tabs, area);
    }
}
