//! Status bar at the bottom of the TUI — shows the current notice
//! (title + description) with right-aligned key hints.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::action::{Action, Notice, NoticeKind};
use crate::components::Component;
use crate::theme::Theme;

pub struct StatusBarComponent {
    /// Current notice, if any.
    pub notice: Option<Notice>,
}

impl StatusBarComponent {
    pub fn new() -> Self {
        Self {
            notice: Some(Notice::info(
                "Welcome",
                "Fill in the search form and press Ctrl+S to search",
            )),
        }
    }
}

impl Component for StatusBarComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::SetNotice(notice) => {
                self.notice = Some(notice.clone());
                None
            }
            Action::ClearNotice => {
                self.notice = None;
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let width = area.width as usize;

        // Right side: compact key hints.
        let hints = "q·?·/·↑↓·p·o·d";
        let hints_len = hints.chars().count() + 1; // +1 for trailing space

        let (title, description, title_style) = match &self.notice {
            Some(notice) => {
                let color = match notice.kind {
                    NoticeKind::Info => Theme::fg_muted(),
                    NoticeKind::Success => Theme::success(),
                    NoticeKind::Error => Theme::error(),
                };
                (
                    notice.title.as_str(),
                    notice.description.as_str(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )
            }
            None => ("", "", Theme::muted()),
        };

        // Truncate the description to the remaining space.
        let desc_budget = width
            .saturating_sub(title.chars().count() + 3)
            .saturating_sub(hints_len)
            .saturating_sub(2);
        let desc: String = if description.chars().count() > desc_budget {
            let cut: String = description
                .chars()
                .take(desc_budget.saturating_sub(3))
                .collect();
            format!("{}...", cut)
        } else {
            description.to_string()
        };

        // Pad to push hints to the right edge.
        let used = 1 + title.chars().count() + 2 + desc.chars().count();
        let pad = width.saturating_sub(used + hints_len);

        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(title, title_style),
            Span::raw("  "),
            Span::styled(desc, Theme::dim()),
            Span::raw(" ".repeat(pad)),
            Span::styled(hints, Theme::key_hint()),
            Span::raw(" "),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear_notice() {
        let mut bar = StatusBarComponent::new();

        bar.handle_action(&Action::SetNotice(Notice::success(
            "Search complete",
            "Found 3 publications",
        )));
        let notice = bar.notice.as_ref().unwrap();
        assert_eq!(notice.title, "Search complete");
        assert_eq!(notice.kind, NoticeKind::Success);

        bar.handle_action(&Action::ClearNotice);
        assert!(bar.notice.is_none());
    }
}
