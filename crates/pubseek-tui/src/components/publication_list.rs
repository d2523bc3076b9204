//! Found publications — a count header and one card per publication, in
//! the exact order the webhook returned them (no client-side re-sorting).

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use pubseek_core::models::{Publication, SearchResults};

use crate::action::{Action, Notice};
use crate::components::Component;
use crate::links;
use crate::theme::Theme;

/// Display cut for the author string. Longer values get an exact cut (not
/// word-boundary aware) followed by an ellipsis marker.
const AUTHOR_DISPLAY_MAX: usize = 50;

/// Rows per publication card, borders included.
const CARD_HEIGHT: u16 = 6;

/// Canonical DOI URL prefix, stripped for display only.
const DOI_PREFIX: &str = "https://doi.org/";

pub struct PublicationListComponent {
    /// Latest complete result snapshot. Absent until the first successful
    /// search; replaced wholesale on each success, untouched on failure.
    pub results: Option<SearchResults>,
    /// Currently selected card index.
    pub selected: usize,
}

impl PublicationListComponent {
    pub fn new() -> Self {
        Self {
            results: None,
            selected: 0,
        }
    }

    pub fn selected_publication(&self) -> Option<&Publication> {
        self.results
            .as_ref()
            .and_then(|r| r.publications.get(self.selected))
    }

    fn publication_count(&self) -> usize {
        self.results
            .as_ref()
            .map(|r| r.publications.len())
            .unwrap_or(0)
    }

    /// Open one of the selected publication's outbound links, or explain
    /// why nothing happened.
    fn open_link(
        &self,
        url: Option<&String>,
        missing_title: &str,
        missing_desc: &str,
    ) -> Option<Action> {
        match url {
            Some(url) => {
                links::open_in_browser(url);
                None
            }
            None => Some(Action::SetNotice(Notice::info(missing_title, missing_desc))),
        }
    }
}

impl Component for PublicationListComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::SearchCompleted(results) => {
                // Wholesale replacement of the snapshot; no merging.
                self.results = Some(*results.clone());
                self.selected = 0;
                None
            }
            // Failures leave the prior snapshot untouched.
            Action::SearchFailed(_) => None,

            Action::ScrollUp => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
                None
            }
            Action::ScrollDown => {
                if self.selected + 1 < self.publication_count() {
                    self.selected += 1;
                }
                None
            }

            Action::OpenPdf => {
                let pub_ = self.selected_publication()?;
                self.open_link(
                    pub_.pdf_url.as_ref(),
                    "No PDF",
                    "This publication has no open PDF link",
                )
            }
            Action::OpenLanding => {
                let pub_ = self.selected_publication()?;
                self.open_link(
                    pub_.landing_page_url.as_ref(),
                    "No landing page",
                    "This publication has no landing page link",
                )
            }
            Action::OpenDoi => {
                let pub_ = self.selected_publication()?;
                self.open_link(
                    pub_.doi.as_ref(),
                    "No DOI",
                    "This publication has no DOI link",
                )
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.results {
            Some(results) => format!(" Found Publications ({}) ", results.publications.len()),
            None => " Results ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(results) = &self.results else {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("No results yet.", Theme::dim())),
                Line::from(Span::styled(
                    "Fill in the search form and press Ctrl+S.",
                    Theme::dim(),
                )),
            ]);
            frame.render_widget(empty, inner);
            return;
        };

        if results.publications.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("No publications matched \"{}\".", results.search_query),
                    Theme::dim(),
                )),
            ]);
            frame.render_widget(empty, inner);
            return;
        }

        // Scroll window: keep the selected card visible.
        let visible = (inner.height / CARD_HEIGHT).max(1) as usize;
        let offset = if self.selected >= visible {
            self.selected - visible + 1
        } else {
            0
        };

        let constraints = vec![Constraint::Length(CARD_HEIGHT); visible];
        let slots = Layout::vertical(constraints).split(inner);

        for (slot, (i, publication)) in slots.iter().zip(
            results
                .publications
                .iter()
                .enumerate()
                .skip(offset)
                .take(visible),
        ) {
            self.render_card(frame, *slot, publication, i == self.selected);
        }
    }
}

impl PublicationListComponent {
    fn render_card(
        &self,
        frame: &mut Frame,
        area: Rect,
        publication: &Publication,
        is_selected: bool,
    ) {
        let border_style = if is_selected {
            Style::default().fg(Theme::accent())
        } else {
            Theme::border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = inner.width as usize;

        // Badge has exactly two label variants.
        let badge = if publication.open_access {
            "Open access"
        } else {
            "Closed access"
        };

        let mut meta = vec![
            Span::styled(year_label(publication.year), Theme::normal()),
            Span::styled(
                format!("  ·  {} citations", publication.citations),
                Theme::normal(),
            ),
            Span::styled(format!("  ·  {}", publication.source), Theme::muted()),
        ];
        if let Some(doi) = &publication.doi {
            meta.push(Span::styled(
                format!("  ·  DOI: {}", strip_doi_prefix(doi)),
                Theme::muted(),
            ));
        }

        let mut link_spans: Vec<Span> = Vec::new();
        if publication.pdf_url.is_some() {
            link_spans.push(Span::styled("[p]", Theme::key_hint()));
            link_spans.push(Span::styled(" PDF   ", Theme::dim()));
        }
        if publication.landing_page_url.is_some() {
            link_spans.push(Span::styled("[o]", Theme::key_hint()));
            link_spans.push(Span::styled(" page   ", Theme::dim()));
        }
        if publication.doi.is_some() {
            link_spans.push(Span::styled("[d]", Theme::key_hint()));
            link_spans.push(Span::styled(" DOI", Theme::dim()));
        }
        if link_spans.is_empty() {
            link_spans.push(Span::styled("no links", Theme::dim()));
        }

        let lines = vec![
            Line::from(Span::styled(
                truncate(&publication.title, width),
                Theme::header(),
            )),
            Line::from(vec![
                Span::styled(format_authors(&publication.authors), Theme::normal()),
                Span::styled("   ", Theme::dim()),
                Span::styled(badge, Theme::badge(publication.open_access)),
                Span::styled(
                    format!("   relevance {}", publication.relevance_score),
                    Theme::muted(),
                ),
            ]),
            Line::from(meta),
            Line::from(link_spans),
        ];

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

// ── Helpers ─────────────────────────────────────────────────────

/// Exact-cut author display: strings over the cap keep their first
/// `AUTHOR_DISPLAY_MAX` characters and gain an ellipsis marker.
fn format_authors(authors: &str) -> String {
    if authors.chars().count() > AUTHOR_DISPLAY_MAX {
        let cut: String = authors.chars().take(AUTHOR_DISPLAY_MAX).collect();
        format!("{}...", cut)
    } else {
        authors.to_string()
    }
}

/// Strip the canonical prefix for display; the full URL stays the link
/// target.
fn strip_doi_prefix(doi: &str) -> &str {
    doi.strip_prefix(DOI_PREFIX).unwrap_or(doi)
}

fn year_label(year: Option<u16>) -> String {
    match year {
        Some(y) => y.to_string(),
        None => "Unknown".to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubseek_core::models::{Statistics, YearRange};

    fn publication(id: &str) -> Publication {
        Publication {
            id: id.to_string(),
            title: format!("Title {id}"),
            authors: "A. Author".to_string(),
            year: Some(2021),
            doi: None,
            citations: 5,
            open_access: false,
            source: "openalex".to_string(),
            pdf_url: None,
            landing_page_url: None,
            relevance_score: 1.0,
        }
    }

    fn snapshot(query: &str, publications: Vec<Publication>) -> SearchResults {
        let total = publications.len() as u32;
        SearchResults {
            search_query: query.to_string(),
            statistics: Statistics {
                total_publications: total,
                open_access_count: 0,
                avg_citations: 0.0,
                max_citations: 0,
                year_range: YearRange { min: 2020, max: 2024 },
                top_cited: vec![],
            },
            publications,
            generated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn authors_at_or_under_fifty_chars_display_unchanged() {
        let exactly_fifty = "a".repeat(50);
        assert_eq!(format_authors(&exactly_fifty), exactly_fifty);
        assert_eq!(format_authors("short"), "short");
    }

    #[test]
    fn authors_over_fifty_chars_get_exact_cut_plus_ellipsis() {
        let long = "b".repeat(51);
        let shown = format_authors(&long);
        assert_eq!(shown, format!("{}...", "b".repeat(50)));

        // Exact cut, not word-boundary aware.
        let names = format!("{} {}", "x".repeat(49), "Lastname");
        assert_eq!(format_authors(&names), format!("{} ...", "x".repeat(49)));
    }

    #[test]
    fn doi_prefix_is_stripped_for_display_only() {
        assert_eq!(
            strip_doi_prefix("https://doi.org/10.1234/abcd"),
            "10.1234/abcd"
        );
        assert_eq!(strip_doi_prefix("10.1234/abcd"), "10.1234/abcd");
    }

    #[test]
    fn completion_replaces_the_snapshot_wholesale() {
        let mut list = PublicationListComponent::new();
        list.handle_action(&Action::SearchCompleted(Box::new(snapshot(
            "first",
            vec![publication("a"), publication("b")],
        ))));
        list.selected = 1;

        list.handle_action(&Action::SearchCompleted(Box::new(snapshot(
            "second",
            vec![publication("c")],
        ))));

        let results = list.results.as_ref().unwrap();
        assert_eq!(results.search_query, "second");
        assert_eq!(results.publications.len(), 1);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn failure_leaves_prior_results_untouched() {
        let mut list = PublicationListComponent::new();
        let before = snapshot("query", vec![publication("a")]);
        list.results = Some(before.clone());

        list.handle_action(&Action::SearchFailed("timeout".to_string()));

        assert_eq!(list.results, Some(before));
    }

    #[test]
    fn scrolling_stays_within_bounds() {
        let mut list = PublicationListComponent::new();
        list.handle_action(&Action::SearchCompleted(Box::new(snapshot(
            "q",
            vec![publication("a"), publication("b")],
        ))));

        list.handle_action(&Action::ScrollUp);
        assert_eq!(list.selected, 0);

        list.handle_action(&Action::ScrollDown);
        list.handle_action(&Action::ScrollDown);
        assert_eq!(list.selected, 1);
    }

    #[test]
    fn opening_a_missing_link_notices_instead_of_navigating() {
        let mut list = PublicationListComponent::new();
        list.handle_action(&Action::SearchCompleted(Box::new(snapshot(
            "q",
            vec![publication("a")],
        ))));

        match list.handle_action(&Action::OpenPdf) {
            Some(Action::SetNotice(notice)) => assert_eq!(notice.title, "No PDF"),
            other => panic!("expected notice, got {:?}", other),
        }
    }
}
