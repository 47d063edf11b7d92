use log::{debug, warn};
use std::io::Write;
use std::process::Command;

use crate::error::ZamError;

/// Requests an edit of a single alias command.
///
/// `Ok(None)` means no update: the user cancelled, left the text unchanged,
/// or the editor reported failure.
pub trait Editor {
    fn edit(&self, initial: &str) -> Result<Option<String>, ZamError>;
}

/// Runs an external editor on a temporary file and waits for it to exit
#[derive(Debug, Clone)]
pub struct ProcessEditor {
    command: String,
}

impl ProcessEditor {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

/// Interpret the edited buffer: one line, trailing newlines ignored
pub fn finish_edit(initial: &str, edited: &str) -> Result<Option<String>, ZamError> {
    let edited = edited.trim_end_matches(&['\n', '\r'][..]);
    if edited.contains('\n') {
        return Err(ZamError::invalid("command", edited, "alias commands must fit on one line"));
    }
    if edited.trim().is_empty() || edited == initial {
        return Ok(None);
    }
    Ok(Some(edited.to_string()))
}

impl Editor for ProcessEditor {
    fn edit(&self, initial: &str) -> Result<Option<String>, ZamError> {
        let mut file = tempfile::Builder::new()
            .prefix("zam-edit-")
            .suffix(".zsh")
            .tempfile()
            .map_err(|e| ZamError::io(std::env::temp_dir(), "create temporary file", e))?;
        writeln!(file, "{}", initial).map_err(|e| ZamError::io(file.path(), "write", e))?;
        file.flush().map_err(|e| ZamError::io(file.path(), "write", e))?;

        // Editors like "code --wait" carry their own arguments
        let mut parts = self.command.split_whitespace();
        let program = parts.next().unwrap_or("vi");
        debug!("Launching editor {:?} on {:?}", self.command, file.path());

        let status = match Command::new(program).args(parts).arg(file.path()).status() {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to launch editor {:?}: {}", self.command, e);
                return Ok(None);
            }
        };
        if !status.success() {
            warn!("Editor {:?} exited with {}", self.command, status);
            return Ok(None);
        }

        let edited = std::fs::read_to_string(file.path()).map_err(|e| ZamError::io(file.path(), "read", e))?;
        finish_edit(initial, &edited)
    }
}
