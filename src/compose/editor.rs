//! Message body round-trip through an external editor.

use std::io::Write;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, warn};

pub const DEFAULT_EDITOR: &str = "vi";

/// `$EDITOR`, or `vi` when unset
pub fn editor_command() -> String {
    std::env::var("EDITOR").unwrap_or_else(|_| DEFAULT_EDITOR.to_string())
}

/// Open `body` in `editor` and return the saved text.
///
/// Returns `Ok(None)` when the editor exits unsuccessfully. An editor that
/// cannot be started is an error; the caller keeps its draft either way.
pub fn edit_in_editor(editor: &str, body: &str) -> Result<Option<String>> {
    let mut temp_file = tempfile::Builder::new()
        .suffix(".txt")
        .tempfile()
        .context("creating draft file")?;
    write!(temp_file, "{}", body).context("writing draft file")?;
    temp_file.flush().context("writing draft file")?;

    debug!(editor, path = %temp_file.path().display(), "opening editor");
    let status = Command::new(editor)
        .arg(temp_file.path())
        .status()
        .with_context(|| format!("could not start editor {:?}", editor))?;

    if !status.success() {
        warn!(editor, %status, "editor exited unsuccessfully");
        return Ok(None);
    }

    let text = std::fs::read_to_string(temp_file.path()).context("reading draft file")?;
    Ok(Some(text))
}
