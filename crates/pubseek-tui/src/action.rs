//! Action enum — the central message bus for the TUI.
//! All user interactions and async results flow through here.

use pubseek_core::models::{SearchParams, SearchResults};

/// A transient user-visible notice with a title and a description,
/// shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub kind: NoticeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NoticeKind::Info,
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NoticeKind::Success,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NoticeKind::Error,
        }
    }
}

/// Every possible action that can occur in the application.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Global ──────────────────────────────────────────────
    /// Quit the application.
    Quit,
    /// Toggle help overlay.
    ToggleHelp,
    /// Show a notice in the status bar.
    SetNotice(Notice),
    /// Clear the current notice.
    ClearNotice,
    /// A tick event for animations.
    Tick,

    // ── Focus ───────────────────────────────────────────────
    /// Give keyboard focus to the search form (editing mode).
    FocusForm,
    /// Return focus to the result list (normal mode).
    LeaveForm,

    // ── Text input (editing mode) ───────────────────────────
    /// A character was typed into the focused field.
    CharInput(char),
    /// Backspace pressed.
    BackspaceInput,
    /// Delete the word before the cursor (Ctrl+W).
    DeleteWord,
    /// Move focus to the next form field (Tab / Down).
    SwitchInputField,
    /// Move focus to the previous form field (Shift+Tab / Up).
    PrevInputField,
    /// Enter: advance to the next field, or submit from the last one.
    AdvanceField,
    /// Submit the form regardless of focused field (Ctrl+S / Ctrl+Enter).
    SubmitForm,
    /// Bulk paste from bracketed paste mode.
    PasteBulk(String),

    // ── Search lifecycle ────────────────────────────────────
    /// Validated parameters ready to be sent to the webhook.
    SubmitSearch(SearchParams),
    /// The webhook returned a complete result snapshot.
    SearchCompleted(Box<SearchResults>),
    /// The request failed (transport or parse); prior results stay.
    SearchFailed(String),

    // ── Result navigation (normal mode) ─────────────────────
    ScrollUp,
    ScrollDown,
    /// Open the selected publication's PDF in the browser.
    OpenPdf,
    /// Open the selected publication's landing page in the browser.
    OpenLanding,
    /// Open the selected publication's DOI link in the browser.
    OpenDoi,
}

/// Whether the app is in a text-input mode where raw keys should be
/// forwarded to the search form instead of interpreted as global shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal mode — keys are global shortcuts.
    Normal,
    /// Text input mode — keys go to the focused form field.
    Editing,
}
