// UI layer: the numbered text menu and the four file operations behind it.
// Every call is synchronous; one prompt is fully answered before the next
// one is shown, and no two operations ever overlap.

use crate::api::{FileList, FileRecord, FileStore, ASSISTANTS_PURPOSE};
use crate::console::Console;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

const MENU: &[&str] = &[
    "",
    "== Assistants file utility ==",
    "[1] Upload file",
    "[2] List all files",
    "[3] List all and delete one of your choice",
    "[4] Delete all assistant files (confirmation required)",
    "[9] Exit",
];

const NO_FILES: &str = "No files found.";
const FIRST_PAGE_ONLY: &str = "Only the first page of files is shown; more files exist.";

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Upload,
    List,
    DeleteOne,
    DeleteAll,
    Exit,
}

impl MenuChoice {
    /// Match a trimmed menu token. Anything else is `None`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "1" => Some(MenuChoice::Upload),
            "2" => Some(MenuChoice::List),
            "3" => Some(MenuChoice::DeleteOne),
            "4" => Some(MenuChoice::DeleteAll),
            "9" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Main interactive menu. Runs until "9" is chosen or input runs out.
///
/// Upload failures are reported and the loop continues; failures while
/// listing or deleting are returned to the caller.
pub fn main_menu<S: FileStore, C: Console>(store: &S, console: &mut C) -> Result<()> {
    loop {
        for line in MENU {
            console.line(line)?;
        }
        let Some(input) = console.read_line("Enter your choice")? else {
            info!("input closed, leaving menu");
            break;
        };
        match MenuChoice::parse(&input) {
            Some(MenuChoice::Upload) => handle_upload(store, console)?,
            Some(MenuChoice::List) => handle_list(store, console)?,
            Some(MenuChoice::DeleteOne) => handle_delete_one(store, console)?,
            Some(MenuChoice::DeleteAll) => handle_delete_all(store, console)?,
            Some(MenuChoice::Exit) => break,
            None => console.line("Invalid choice. Please try again.")?,
        }
    }
    Ok(())
}

fn handle_upload<S: FileStore, C: Console>(store: &S, console: &mut C) -> Result<()> {
    let Some(path) = console.read_line("Enter the filename to upload")? else {
        return Ok(());
    };
    let path = PathBuf::from(path);

    match with_spinner("Uploading...", || store.upload(&path, ASSISTANTS_PURPOSE)) {
        Ok(file) => {
            info!(id = %file.id, "file uploaded");
            console.line(&serde_json::to_string_pretty(&file)?)?;
            console.line(&format!(
                "File uploaded successfully: {} [{}]",
                file.filename, file.id
            ))?;
        }
        Err(e) => {
            debug!(error = %e, "upload failed");
            console.error(&format!("Error uploading file: {}", e))?;
        }
    }
    Ok(())
}

fn handle_list<S: FileStore, C: Console>(store: &S, console: &mut C) -> Result<()> {
    let list = fetch_files(store)?;
    if list.data.is_empty() {
        console.line(NO_FILES)?;
        return Ok(());
    }
    for file in &list.data {
        console.line(&describe(file))?;
    }
    if list.has_more {
        console.line(FIRST_PAGE_ONLY)?;
    }
    Ok(())
}

/// Numbered listing with repeated single deletions. Returns to the main menu
/// on any token that is not a listed number, or once nothing is left.
fn handle_delete_one<S: FileStore, C: Console>(store: &S, console: &mut C) -> Result<()> {
    loop {
        let list = fetch_files(store)?;
        let files = list.data;
        if files.is_empty() {
            console.line(NO_FILES)?;
            return Ok(());
        }
        for (i, file) in files.iter().enumerate() {
            console.line(&format!("[{}] {}", i + 1, describe(file)))?;
        }
        if list.has_more {
            console.line(FIRST_PAGE_ONLY)?;
        }

        let Some(choice) = console
            .read_line("Enter a file number to delete, or any other input to return to menu")?
        else {
            return Ok(());
        };
        let Some(index) = parse_selection(&choice, files.len()) else {
            return Ok(());
        };

        // The snapshot above is not re-checked before deleting.
        let selected = &files[index];
        with_spinner("Deleting...", || store.delete(&selected.id))
            .with_context(|| format!("Deleting {} [{}]", selected.filename, selected.id))?;
        console.line(&format!("File deleted: {}", selected.filename))?;
    }
}

fn handle_delete_all<S: FileStore, C: Console>(store: &S, console: &mut C) -> Result<()> {
    console.line(&format!(
        "This will delete all OpenAI files with purpose '{}'.",
        ASSISTANTS_PURPOSE
    ))?;
    let confirmation = console.read_line("Type 'YES' to confirm")?;
    if confirmation.as_deref().map(str::trim) != Some("YES") {
        console.line("Operation cancelled.")?;
        return Ok(());
    }

    let list = fetch_files(store)?;
    info!(count = list.data.len(), "deleting all files");
    // No rollback: the first failure aborts the remaining deletions.
    for file in &list.data {
        with_spinner(&format!("Deleting {}...", file.filename), || {
            store.delete(&file.id)
        })
        .with_context(|| format!("Deleting {} [{}]", file.filename, file.id))?;
    }
    if list.has_more {
        console.line(FIRST_PAGE_ONLY)?;
    }
    console.line(&format!(
        "All files with purpose '{}' have been deleted.",
        ASSISTANTS_PURPOSE
    ))?;
    Ok(())
}

fn fetch_files<S: FileStore>(store: &S) -> Result<FileList> {
    let list = with_spinner("Fetching files...", || store.list(ASSISTANTS_PURPOSE))
        .context("Listing files")?;
    debug!(count = list.data.len(), has_more = list.has_more, "fetched files");
    Ok(list)
}

/// Validate a delete selection: one or more ASCII digits and nothing else,
/// naming a listed entry, 1-based. Returns the 0-based index.
pub fn parse_selection(token: &str, count: usize) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: usize = token.parse().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}

/// `YYYY-MM-DD` (UTC) for a vendor timestamp in seconds.
pub fn created_date(created_at: i64) -> String {
    DateTime::<Utc>::from_timestamp(created_at, 0)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| created_at.to_string())
}

fn describe(file: &FileRecord) -> String {
    format!(
        "{} [{}], Created: {}",
        file.filename,
        file.id,
        created_date(file.created_at)
    )
}

/// Run `work` while a spinner is shown on stderr. The spinner stays hidden
/// when stderr is not a terminal.
fn with_spinner<T>(message: &str, work: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = work();
    spinner.finish_and_clear();
    out
}
