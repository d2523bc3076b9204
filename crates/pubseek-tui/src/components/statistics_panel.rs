//! Aggregate search statistics — four summary figures for the latest
//! snapshot. Pure rendering; the data is computed by the search service.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use pubseek_core::models::Statistics;

use crate::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, stats: &Statistics) {
    let block = Block::default()
        .title(" Search Statistics ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::horizontal([
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
    ])
    .split(inner);

    figure(
        frame,
        columns[0],
        stats.total_publications.to_string(),
        "Total publications",
        Theme::accent(),
    );
    figure(
        frame,
        columns[1],
        stats.open_access_count.to_string(),
        "Open access",
        Theme::success(),
    );
    figure(
        frame,
        columns[2],
        format!("{:.1}", stats.avg_citations),
        "Avg citations",
        Theme::warning(),
    );
    figure(
        frame,
        columns[3],
        format!("{}-{}", stats.year_range.min, stats.year_range.max),
        "Year range",
        Theme::accent(),
    );
}

fn figure(frame: &mut Frame, area: Rect, value: String, label: &str, color: Color) {
    let lines = vec![
        Line::from(Span::styled(
            value,
            Style::default()
                .fg(color)
                .add_modifier(ratatui::style::Modifier::BOLD),
        )),
        Line::from(Span::styled(label, Theme::muted())),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
