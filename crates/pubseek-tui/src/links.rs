//! Hands publication URLs to the system browser, detached from the TUI
//! process so the terminal session is not disturbed.

use std::process::{Command, Stdio};
use tracing::{debug, warn};

pub fn open_in_browser(url: &str) {
    let result = launcher(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match result {
        Ok(_) => debug!(url, "Opened in browser"),
        Err(e) => warn!(url, "Failed to open browser: {}", e),
    }
}

#[cfg(target_os = "macos")]
fn launcher(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn launcher(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(url);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn launcher(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}
