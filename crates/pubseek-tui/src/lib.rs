//! Terminal UI for pubseek — a search form, statistics header, and
//! scrollable publication cards driven by an action bus.

pub mod action;
pub mod app;
pub mod components;
pub mod event;
pub mod links;
pub mod theme;

pub use app::App;
