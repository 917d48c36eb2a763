use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::AppState;

pub struct ShortcutsWidget;

impl ShortcutsWidget {
    pub fn render(frame: &mut Frame, area: Rect, _state: &AppState) {
        let key_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(Color::Gray);

        let shortcuts_text = vec![Line::from(vec![
            Span::styled("←/→", key_style),
            Span::styled(" bucket, ", text_style),
            Span::styled("↑/↓", key_style),
            Span::styled(" select, ", text_style),
            Span::styled("Enter", key_style),
            Span::styled(" details, ", text_style),
            Span::styled("c", key_style),
            Span::styled(" categories, ", text_style),
            Span::styled("r", key_style),
            Span::styled(" refresh, ", text_style),
            Span::styled("q", key_style),
            Span::styled(" quit", text_style),
        ])];

        let shortcuts = Paragraph::new(shortcuts_text).alignment(Alignment::Center);

        frame.render_widget(shortcuts, area);
    }
}
