//! Search form — keywords, result limit, minimum year, open-access filter.
//!
//! Owns the SearchParams state, validates on submit (empty keywords never
//! reach the network), and is disabled while a request is in flight so only
//! one search can be outstanding at a time.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use pubseek_core::models::{self, SearchParams};

use crate::action::{Action, Notice};
use crate::components::Component;
use crate::theme::Theme;

/// Braille spinner frames.
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Which form field is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Keywords,
    Limit,
    YearFrom,
    OpenAccess,
}

impl FormField {
    fn next(self) -> FormField {
        match self {
            FormField::Keywords => FormField::Limit,
            FormField::Limit => FormField::YearFrom,
            FormField::YearFrom => FormField::OpenAccess,
            FormField::OpenAccess => FormField::Keywords,
        }
    }

    fn prev(self) -> FormField {
        match self {
            FormField::Keywords => FormField::OpenAccess,
            FormField::Limit => FormField::Keywords,
            FormField::YearFrom => FormField::Limit,
            FormField::OpenAccess => FormField::YearFrom,
        }
    }
}

pub struct SearchFormComponent {
    /// Raw keyword input, sent to the webhook as typed.
    pub keywords_input: String,
    /// Raw limit input; parses with fallback 10, then clamps to 1..=200.
    pub limit_input: String,
    /// Raw year input; blank or unparseable means no year filter.
    pub year_input: String,
    /// Open-access filter checkbox.
    pub open_access: bool,
    /// Which field is focused.
    focused: FormField,
    /// Cursor position (byte offset) within the focused text field.
    cursor: usize,
    /// Whether the form currently has keyboard focus.
    pub active: bool,
    /// True while a request is in flight. The form is disabled and further
    /// submits are ignored until the completion action arrives.
    pub searching: bool,
    /// Spinner animation frame counter.
    spinner_tick: usize,
}

impl SearchFormComponent {
    pub fn new() -> Self {
        Self {
            keywords_input: String::new(),
            limit_input: models::DEFAULT_LIMIT.to_string(),
            year_input: String::new(),
            open_access: false,
            focused: FormField::Keywords,
            cursor: 0,
            active: true,
            searching: false,
            spinner_tick: 0,
        }
    }

    /// Pre-fill the form from CLI arguments.
    pub fn set_initial_params(&mut self, params: &SearchParams) {
        self.keywords_input = params.keywords.clone();
        self.limit_input = params.limit.to_string();
        self.year_input = if params.year_from == 0 {
            String::new()
        } else {
            params.year_from.to_string()
        };
        self.open_access = params.open_access;
        self.cursor = self.keywords_input.len();
    }

    /// Whether this component wants to capture raw key input.
    pub fn wants_input(&self) -> bool {
        self.active && !self.searching
    }

    /// Current parameters as the form would submit them: numeric fields
    /// parse with a fallback and are clamped into their accepted ranges.
    pub fn params(&self) -> SearchParams {
        let limit = self
            .limit_input
            .trim()
            .parse()
            .unwrap_or(models::DEFAULT_LIMIT);
        let year_from = self.year_input.trim().parse().unwrap_or(0);

        SearchParams {
            keywords: self.keywords_input.clone(),
            limit: models::clamp_limit(limit),
            year_from: models::clamp_year(year_from),
            open_access: self.open_access,
        }
    }

    /// Get a reference to the focused text field, if the focused field is one.
    fn focused_input(&self) -> Option<&String> {
        match self.focused {
            FormField::Keywords => Some(&self.keywords_input),
            FormField::Limit => Some(&self.limit_input),
            FormField::YearFrom => Some(&self.year_input),
            FormField::OpenAccess => None,
        }
    }

    fn focused_input_mut(&mut self) -> Option<&mut String> {
        match self.focused {
            FormField::Keywords => Some(&mut self.keywords_input),
            FormField::Limit => Some(&mut self.limit_input),
            FormField::YearFrom => Some(&mut self.year_input),
            FormField::OpenAccess => None,
        }
    }

    /// Clamp cursor to valid range for the focused field.
    fn clamp_cursor(&mut self) {
        let len = self.focused_input().map(|s| s.len()).unwrap_or(0);
        if self.cursor > len {
            self.cursor = len;
        }
    }

    /// Insert a character at the cursor position.
    fn insert_char(&mut self, c: char) {
        self.clamp_cursor();
        let cursor = self.cursor;
        if let Some(input) = self.focused_input_mut() {
            input.insert(cursor, c);
            self.cursor += c.len_utf8();
        }
    }

    /// Delete the character before the cursor.
    fn delete_char(&mut self) {
        self.clamp_cursor();
        if self.cursor == 0 {
            return;
        }
        let cursor = self.cursor;
        if let Some(input) = self.focused_input_mut() {
            let prev = input[..cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev);
            self.cursor = prev;
        }
    }

    /// Delete the word before the cursor (Ctrl+W).
    fn delete_word(&mut self) {
        self.clamp_cursor();
        if self.cursor == 0 {
            return;
        }
        let cursor = self.cursor;
        if let Some(input) = self.focused_input_mut() {
            let mut end = cursor;
            while end > 0 && input.as_bytes().get(end - 1) == Some(&b' ') {
                end -= 1;
            }
            let mut start = end;
            while start > 0 && input.as_bytes().get(start - 1) != Some(&b' ') {
                start -= 1;
            }
            input.drain(start..cursor);
            self.cursor = start;
        }
    }

    /// Insert a string at the cursor position (for paste).
    fn insert_str(&mut self, s: &str) {
        self.clamp_cursor();
        let cursor = self.cursor;
        if let Some(input) = self.focused_input_mut() {
            input.insert_str(cursor, s);
            self.cursor += s.len();
        }
    }

    fn focus_field(&mut self, field: FormField) {
        self.focused = field;
        self.cursor = self.focused_input().map(|s| s.len()).unwrap_or(0);
    }

    /// Try to submit. Validation failures produce a notice and never a
    /// network request; while a request is in flight, submits are ignored.
    fn try_submit(&mut self) -> Option<Action> {
        if self.searching {
            return None;
        }

        let params = self.params();
        if params.validate().is_err() {
            return Some(Action::SetNotice(Notice::error(
                "Invalid search",
                "Enter keywords to search",
            )));
        }

        Some(Action::SubmitSearch(params))
    }
}

impl Component for SearchFormComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::Tick => {
                if self.searching {
                    self.spinner_tick = self.spinner_tick.wrapping_add(1);
                }
                None
            }
            Action::FocusForm => {
                self.active = true;
                None
            }
            Action::LeaveForm => {
                self.active = false;
                None
            }

            // ── Text input ──────────────────────────────────────
            Action::CharInput(c) if self.wants_input() => {
                if self.focused == FormField::OpenAccess {
                    if *c == ' ' {
                        self.open_access = !self.open_access;
                    }
                } else {
                    self.insert_char(*c);
                }
                None
            }
            Action::BackspaceInput if self.wants_input() => {
                self.delete_char();
                None
            }
            Action::DeleteWord if self.wants_input() => {
                self.delete_word();
                None
            }
            Action::PasteBulk(text) if self.wants_input() => {
                // Single-line fields: only the first line of the paste.
                let line = text.lines().next().unwrap_or("").to_string();
                if !line.is_empty() {
                    self.insert_str(&line);
                }
                None
            }

            // ── Field navigation ────────────────────────────────
            Action::SwitchInputField if self.wants_input() => {
                self.focus_field(self.focused.next());
                None
            }
            Action::PrevInputField if self.wants_input() => {
                self.focus_field(self.focused.prev());
                None
            }
            Action::AdvanceField if self.wants_input() => {
                // Enter advances through the fields; from the last one it
                // submits, mirroring a web form's Enter behavior.
                if self.focused == FormField::OpenAccess {
                    self.try_submit()
                } else {
                    self.focus_field(self.focused.next());
                    None
                }
            }
            Action::SubmitForm => self.try_submit(),

            // ── Search lifecycle ────────────────────────────────
            Action::SearchCompleted(_) => {
                self.searching = false;
                None
            }
            Action::SearchFailed(_) => {
                self.searching = false;
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.active && !self.searching {
            Style::default().fg(Theme::accent())
        } else {
            Theme::border()
        };
        let block = Block::default()
            .title(" Search Parameters ")
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(3), // Keywords
            Constraint::Length(3), // Limit | Year from
            Constraint::Length(1), // Open access checkbox
            Constraint::Length(1), // Instructions / spinner
        ])
        .split(inner);

        let editing = self.wants_input();

        Self::render_text_field(
            &self.keywords_input,
            self.cursor,
            editing && self.focused == FormField::Keywords,
            "machine learning, AI, neural networks...",
            " Keywords ",
            frame,
            chunks[0],
        );

        let row = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        Self::render_text_field(
            &self.limit_input,
            self.cursor,
            editing && self.focused == FormField::Limit,
            "10",
            " Results (1-200) ",
            frame,
            row[0],
        );
        Self::render_text_field(
            &self.year_input,
            self.cursor,
            editing && self.focused == FormField::YearFrom,
            "2020 (blank = any)",
            " Year from ",
            frame,
            row[1],
        );

        // ── Open access checkbox ────────────────────────────────
        let checkbox_focused = editing && self.focused == FormField::OpenAccess;
        let mark = if self.open_access { "[x]" } else { "[ ]" };
        let checkbox = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {mark}"),
                if checkbox_focused {
                    Theme::selected()
                } else {
                    Theme::normal()
                },
            ),
            Span::styled(" Open access only", Theme::normal()),
        ]));
        frame.render_widget(checkbox, chunks[2]);

        // ── Instructions / progress ─────────────────────────────
        let footer = if self.searching {
            let spinner = SPINNER[self.spinner_tick % SPINNER.len()];
            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", spinner),
                    Style::default().fg(Theme::warning()),
                ),
                Span::styled("Searching...", Style::default().fg(Theme::warning())),
            ]))
        } else if editing {
            Paragraph::new(Line::from(vec![
                Span::styled(" tab", Theme::key_hint()),
                Span::styled(" next field  ", Theme::dim()),
                Span::styled("space", Theme::key_hint()),
                Span::styled(" toggle  ", Theme::dim()),
                Span::styled("ctrl+s", Theme::key_hint()),
                Span::styled(" search  ", Theme::dim()),
                Span::styled("esc", Theme::key_hint()),
                Span::styled(" results", Theme::dim()),
            ]))
        } else {
            Paragraph::new(Line::from(vec![
                Span::styled(" /", Theme::key_hint()),
                Span::styled(" edit form", Theme::dim()),
            ]))
        };
        frame.render_widget(footer, chunks[3]);
    }
}

impl SearchFormComponent {
    /// Render a single-line text field with an inline cursor.
    fn render_text_field(
        text: &str,
        cursor: usize,
        is_focused: bool,
        placeholder: &str,
        title: &str,
        frame: &mut Frame,
        area: Rect,
    ) {
        let border_style = if is_focused {
            Style::default().fg(Theme::accent())
        } else {
            Theme::border()
        };
        let block = Block::default()
            .title(title)
            .title_style(if is_focused {
                Theme::key_hint()
            } else {
                Theme::muted()
            })
            .borders(Borders::ALL)
            .border_style(border_style);

        let display = if text.is_empty() && !is_focused {
            Paragraph::new(Span::styled(placeholder, Theme::dim()))
        } else if is_focused {
            let pos = cursor.min(text.len());
            let (before, after) = text.split_at(pos);
            let cursor_char = if after.is_empty() {
                " ".to_string()
            } else {
                after.chars().next().unwrap().to_string()
            };
            let rest = if after.len() > cursor_char.len() {
                &after[cursor_char.len()..]
            } else {
                ""
            };
            Paragraph::new(Line::from(vec![
                Span::styled(before, Theme::normal()),
                Span::styled(
                    cursor_char,
                    Style::default().fg(Theme::bg()).bg(Theme::accent()),
                ),
                Span::styled(rest, Theme::normal()),
            ]))
        } else {
            Paragraph::new(Span::styled(text, Theme::normal()))
        };

        frame.render_widget(display.block(block), area);
    }
}
