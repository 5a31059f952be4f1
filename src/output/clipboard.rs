// src/output/clipboard.rs
//! System clipboard access: `arboard` first, platform tools as fallback.

use crate::error::AppError;
use std::io::Write;
use std::process::{Command, Stdio};

/// Copies content to the system clipboard.
pub fn copy_to_clipboard(content: &str) -> Result<(), AppError> {
    log::debug!("Copying {} bytes to clipboard", content.len());

    match try_arboard_clipboard(content) {
        Ok(()) => {
            log::info!("Content copied to clipboard using arboard");
            return Ok(());
        }
        Err(e) => log::debug!("Arboard failed: {}, trying platform command", e),
    }

    let (program, args) = platform_command()?;
    let result = pipe_to_command(program, args, content);
    match &result {
        Ok(()) => log::info!("Content copied to clipboard using {}", program),
        Err(e) => log::error!("Failed to copy to clipboard: {}", e),
    }
    result
}

fn try_arboard_clipboard(content: &str) -> Result<(), AppError> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(content)?;
    Ok(())
}

/// The clipboard tool to fall back on for this platform and session.
#[cfg(target_os = "linux")]
fn platform_command() -> Result<(&'static str, &'static [&'static str]), AppError> {
    let is_wayland = std::env::var("WAYLAND_DISPLAY").is_ok()
        || std::env::var("XDG_SESSION_TYPE").is_ok_and(|s| s == "wayland");
    if is_wayland {
        Ok(("wl-copy", &[]))
    } else {
        Ok(("xclip", &["-selection", "clipboard"]))
    }
}

#[cfg(target_os = "macos")]
fn platform_command() -> Result<(&'static str, &'static [&'static str]), AppError> {
    Ok(("pbcopy", &[]))
}

#[cfg(target_os = "windows")]
fn platform_command() -> Result<(&'static str, &'static [&'static str]), AppError> {
    Ok(("clip", &[]))
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_command() -> Result<(&'static str, &'static [&'static str]), AppError> {
    Err(AppError::Clipboard(
        "Clipboard not supported on this platform".to_string(),
    ))
}

/// Runs `program`, feeding `content` on stdin.
fn pipe_to_command(program: &str, args: &[&str], content: &str) -> Result<(), AppError> {
    log::debug!("Attempting to copy with {}", program);

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| AppError::Clipboard(format!("Failed to spawn {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(content.as_bytes())
            .map_err(|e| AppError::Clipboard(format!("Failed to write to {}: {}", program, e)))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| AppError::Clipboard(format!("Failed to wait for {}: {}", program, e)))?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(AppError::Clipboard(format!("{} failed: {}", program, stderr)))
    }
}
