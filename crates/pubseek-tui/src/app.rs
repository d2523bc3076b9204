//! Main application state and render loop.

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

use pubseek_core::models::SearchParams;
use pubseek_core::PubseekConfig;
use pubseek_webhook::WebhookClient;

use crate::action::{Action, InputMode, Notice};
use crate::components::help::HelpComponent;
use crate::components::publication_list::PublicationListComponent;
use crate::components::search_form::SearchFormComponent;
use crate::components::statistics_panel;
use crate::components::status_bar::StatusBarComponent;
use crate::components::Component;
use crate::event::{self, EventHandler, InputModeFlag};

/// Main application state. All mutable state lives here or in one of the
/// components; the only writes happen through the action bus.
pub struct App {
    /// Whether the app should exit.
    should_quit: bool,
    /// Shared flag to tell the EventHandler which key-mapping to use.
    input_mode_flag: InputModeFlag,
    /// HTTP client for the search webhook. None until a URL is configured.
    client: Option<Arc<WebhookClient>>,
    /// At most one request may be outstanding; submits are ignored while
    /// this is set.
    search_in_flight: bool,

    // Components
    search_form: SearchFormComponent,
    publication_list: PublicationListComponent,
    status_bar: StatusBarComponent,
    help: HelpComponent,
}

impl App {
    pub fn new(config: &PubseekConfig) -> Self {
        let client = if config.webhook.url.is_empty() {
            None
        } else {
            Some(Arc::new(WebhookClient::new(
                config.webhook.url.clone(),
                Duration::from_secs(config.webhook.timeout_secs),
            )))
        };

        Self {
            should_quit: false,
            input_mode_flag: event::new_input_mode_flag(),
            client,
            search_in_flight: false,
            search_form: SearchFormComponent::new(),
            publication_list: PublicationListComponent::new(),
            status_bar: StatusBarComponent::new(),
            help: HelpComponent::new(),
        }
    }

    /// Pre-fill the search form from CLI args.
    pub fn set_initial_params(&mut self, params: &SearchParams) {
        self.search_form.set_initial_params(params);
    }

    /// Run the TUI application.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Set up terminal.
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Create the action channel.
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();

        // Start the event handler with the shared input mode flag.
        let event_tx = tx.clone();
        let mode_flag = self.input_mode_flag.clone();
        let event_handler = EventHandler::new(event_tx, Duration::from_millis(100), mode_flag);
        tokio::spawn(async move {
            event_handler.run().await;
        });

        // The app starts with the form focused and ready to type into.
        self.sync_input_mode();

        // Main loop.
        loop {
            terminal.draw(|frame| {
                self.render(frame);
            })?;

            if let Some(action) = rx.recv().await {
                self.handle_action(&action, &tx);

                if self.should_quit {
                    break;
                }
            }
        }

        // Restore terminal.
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Determine and set the correct input mode based on the current
    /// component state. Called after every action.
    fn sync_input_mode(&self) {
        let mode = self.current_input_mode();
        event::set_input_mode(&self.input_mode_flag, mode);
    }

    /// What input mode should be active right now?
    fn current_input_mode(&self) -> InputMode {
        // While help is visible, stay in normal mode so any key closes it.
        if self.help.visible {
            return InputMode::Normal;
        }

        if self.search_form.wants_input() {
            InputMode::Editing
        } else {
            InputMode::Normal
        }
    }

    /// Dispatch an action to all relevant components.
    fn handle_action(&mut self, action: &Action, tx: &mpsc::UnboundedSender<Action>) {
        // Global actions first.
        match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::SubmitSearch(params) => {
                self.spawn_search(params.clone(), tx.clone());
            }
            Action::SearchCompleted(_) => {
                self.search_in_flight = false;
                // Hand focus to the result list so the cards can be browsed.
                self.search_form.active = false;
            }
            Action::SearchFailed(_) => {
                self.search_in_flight = false;
            }
            _ => {}
        }

        // Forward to components; they may chain follow-up actions.
        let mut chained: Vec<Action> = Vec::new();
        if let Some(next) = self.search_form.handle_action(action) {
            chained.push(next);
        }
        if let Some(next) = self.publication_list.handle_action(action) {
            chained.push(next);
        }
        self.status_bar.handle_action(action);
        self.help.handle_action(action);

        // Sync input mode after every action (focus may have changed).
        self.sync_input_mode();

        for next in chained {
            self.handle_action(&next, tx);
        }
    }

    /// Spawn the webhook request. The spawned task sends exactly one
    /// completion action on every exit path; that action is what clears
    /// the loading state and re-enables the form.
    fn spawn_search(&mut self, params: SearchParams, tx: mpsc::UnboundedSender<Action>) {
        if self.search_in_flight {
            return;
        }

        let Some(client) = self.client.clone() else {
            let _ = tx.send(Action::SetNotice(Notice::error(
                "No webhook configured",
                "Set webhook.url in the config file or pass --webhook-url",
            )));
            return;
        };

        self.search_in_flight = true;
        self.search_form.searching = true;
        self.sync_input_mode();
        let _ = tx.send(Action::SetNotice(Notice::info(
            "Searching",
            format!("\"{}\"", params.keywords),
        )));

        tokio::spawn(async move {
            match client.search(&params).await {
                Ok(results) => {
                    let total = results.statistics.total_publications;
                    info!("Search returned {} publications", total);
                    let _ = tx.send(Action::SearchCompleted(Box::new(results)));
                    let _ = tx.send(Action::SetNotice(Notice::success(
                        "Search complete",
                        format!("Found {} publications", total),
                    )));
                }
                Err(e) => {
                    error!("Search failed: {}", e);
                    let _ = tx.send(Action::SearchFailed(format!("{}", e)));
                    let _ = tx.send(Action::SetNotice(Notice::error(
                        "Search failed",
                        "Could not complete the search. Check the webhook connection.",
                    )));
                }
            }
        });
    }

    /// Render the full UI.
    fn render(&self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let stats_height = if self.publication_list.results.is_some() {
            4
        } else {
            0
        };

        let chunks = Layout::vertical([
            Constraint::Length(10),           // Search form
            Constraint::Length(stats_height), // Statistics
            Constraint::Min(8),               // Publication cards
            Constraint::Length(1),            // Status bar
        ])
        .split(area);

        self.search_form.render(frame, chunks[0]);

        if let Some(results) = &self.publication_list.results {
            statistics_panel::render(frame, chunks[1], &results.statistics);
        }

        self.publication_list.render(frame, chunks[2]);
        self.status_bar.render(frame, chunks[3]);

        // Overlay (rendered on top).
        self.help.render(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubseek_core::models::{SearchResults, Statistics, YearRange};

    fn params() -> SearchParams {
        SearchParams {
            keywords: "neural networks".to_string(),
            limit: 10,
            year_from: 2020,
            open_access: true,
        }
    }

    fn config_with_url(url: &str) -> PubseekConfig {
        let mut config = PubseekConfig::default();
        config.webhook.url = url.to_string();
        config
    }

    fn empty_results() -> SearchResults {
        SearchResults {
            search_query: "q".to_string(),
            statistics: Statistics {
                total_publications: 0,
                open_access_count: 0,
                avg_citations: 0.0,
                max_citations: 0,
                year_range: YearRange { min: 0, max: 0 },
                top_cited: vec![],
            },
            publications: vec![],
            generated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn submit_without_configured_webhook_notices_and_stays_idle() {
        let mut app = App::new(&PubseekConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        app.handle_action(&Action::SubmitSearch(params()), &tx);

        assert!(!app.search_in_flight);
        assert!(!app.search_form.searching);
        match rx.try_recv() {
            Ok(Action::SetNotice(notice)) => assert_eq!(notice.title, "No webhook configured"),
            other => panic!("expected notice, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn loading_flag_spans_submit_to_completion() {
        // Unroutable endpoint; the spawned request fails in the background
        // and is ignored here.
        let mut app = App::new(&config_with_url("http://127.0.0.1:9/webhook"));
        let (tx, _rx) = mpsc::unbounded_channel();

        app.handle_action(&Action::SubmitSearch(params()), &tx);
        assert!(app.search_in_flight);
        assert!(app.search_form.searching);

        app.handle_action(&Action::SearchCompleted(Box::new(empty_results())), &tx);
        assert!(!app.search_in_flight);
        assert!(!app.search_form.searching);
    }

    #[test]
    fn second_submit_is_ignored_while_in_flight() {
        let mut app = App::new(&PubseekConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        // The in-flight guard is checked before anything else, so no task
        // is spawned and no notice is sent.
        app.search_in_flight = true;
        app.handle_action(&Action::SubmitSearch(params()), &tx);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn failure_clears_loading_and_keeps_prior_results() {
        let mut app = App::new(&config_with_url("http://127.0.0.1:9/webhook"));
        let (tx, _rx) = mpsc::unbounded_channel();

        app.handle_action(&Action::SearchCompleted(Box::new(empty_results())), &tx);
        let before = app.publication_list.results.clone();
        assert!(before.is_some());

        app.handle_action(&Action::SubmitSearch(params()), &tx);
        app.handle_action(&Action::SearchFailed("timeout".to_string()), &tx);

        assert!(!app.search_in_flight);
        assert!(!app.search_form.searching);
        assert_eq!(app.publication_list.results, before);
    }
}
