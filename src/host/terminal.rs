//! Terminal implementation of [`EditorPort`]
//!
//! Palettes read from stdin and write their prompts to stderr, so stdout only
//! carries results. Terminal editors take their starting position on the
//! command line (`+<row>`), so the editor process is launched when the
//! cursor is placed rather than when the document is opened.

use super::error::EditorError;
use super::traits::{EditorHandle, EditorPort, MessageLevel};
use crate::notes::CursorPosition;
use async_trait::async_trait;
use std::io::Write;
use std::path::Path;

/// Editor port for an interactive terminal session
#[derive(Debug, Clone, Default)]
pub struct TerminalEditor {
    /// Editor command line, e.g. `nvim` or `emacs -nw`. `None` prints locations instead.
    command: Option<String>,
}

impl TerminalEditor {
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }
}

#[async_trait]
impl EditorPort for TerminalEditor {
    async fn open_file(&self, path: &Path) -> Result<EditorHandle, EditorError> {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(EditorError::NotFound(path.to_path_buf()));
        }
        Ok(EditorHandle::new(path))
    }

    async fn set_cursor(
        &self,
        handle: &EditorHandle,
        position: CursorPosition,
    ) -> Result<(), EditorError> {
        let Some(command) = &self.command else {
            println!(
                "{}:{}:{}",
                handle.path.display(),
                position.row,
                position.column
            );
            return Ok(());
        };

        let (program, args) = split_command(command);
        tracing::debug!(editor = %command, path = %handle.path.display(), "Launching editor");

        let status = tokio::process::Command::new(program)
            .args(args)
            .arg(format!("+{}", position.row))
            .arg(&handle.path)
            .status()
            .await
            .map_err(|e| EditorError::Launch {
                command: command.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(EditorError::Exited {
                command: command.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    async fn show_input(&self, prompt: &str) -> Option<String> {
        eprint!("{}: ", prompt);
        let _ = std::io::stderr().flush();
        read_line().await
    }

    async fn show_choice(&self, items: &[String], placeholder: &str) -> Option<usize> {
        eprintln!("{}", placeholder);
        for (i, item) in items.iter().enumerate() {
            eprintln!("  {:>2}) {}", i + 1, item);
        }
        eprint!("> ");
        let _ = std::io::stderr().flush();

        let answer = read_line().await?;
        parse_choice(&answer, items.len())
    }

    async fn show_message(&self, level: MessageLevel, message: &str) {
        match level {
            MessageLevel::Info => println!("{}", message),
            MessageLevel::Error => eprintln!("{}", message),
        }
    }
}

/// Read one line from stdin; `None` on EOF or read failure
async fn read_line() -> Option<String> {
    tokio::task::spawn_blocking(|| {
        let mut buf = String::new();
        match std::io::stdin().read_line(&mut buf) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(buf.trim_end_matches(['\r', '\n']).to_string()),
        }
    })
    .await
    .ok()
    .flatten()
}

/// Split an editor command line into program and leading arguments
fn split_command(command: &str) -> (&str, Vec<&str>) {
    let mut parts = command.split_whitespace();
    let program = parts.next().unwrap_or_default();
    (program, parts.collect())
}

/// 1-based answer from the numbered picker into a 0-based index
fn parse_choice(answer: &str, len: usize) -> Option<usize> {
    match answer.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Some(n - 1),
        _ => None,
    }
}
