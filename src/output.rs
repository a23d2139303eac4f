//! Write-if-changed output and orphan handling
use crate::cli::Message;
use inquire::Confirm;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// Skips the write when the file already holds exactly the new contents.
pub fn write_if_changed(path: &Path, contents: &str) -> std::io::Result<WriteOutcome> {
    if let Ok(current) = fs::read(path) {
        if current == contents.as_bytes() {
            return Ok(WriteOutcome::Unchanged);
        }
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(WriteOutcome::Written)
}

fn find_generated_files(root: &Path) -> std::io::Result<BTreeSet<PathBuf>> {
    let mut found = BTreeSet::new();
    let mut pending = vec![root.to_owned()];
    while let Some(directory) = pending.pop() {
        for entry in fs::read_dir(&directory)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.is_file() && path.extension().map_or(false, |ext| ext == "ts") {
                found.insert(path);
            }
        }
    }
    Ok(found)
}

/// Tracks which paths a run produced and reconciles them against the files
/// that were already present.
pub struct OutputCoordinator {
    root: PathBuf,
    quiet: bool,
    existing: BTreeSet<PathBuf>,
    written: BTreeSet<PathBuf>,
}

impl OutputCoordinator {
    pub fn new(root: &Path, quiet: bool) -> Result<Self, Message> {
        let existing = find_generated_files(root)
            .map_err(|error| Message::new_read_io_error(&error, root))?;
        Ok(OutputCoordinator {
            root: root.to_owned(),
            quiet,
            existing,
            written: BTreeSet::new(),
        })
    }

    pub fn write(&mut self, relative_path: &Path, contents: &str) -> Result<WriteOutcome, Message> {
        let path = self.root.join(relative_path);
        let outcome = write_if_changed(&path, contents)
            .map_err(|error| Message::new_write_io_error(&error, &path))?;
        self.written.insert(path);
        Ok(outcome)
    }

    /// Orphans are snapshotted files this run did not produce. Interactively
    /// they may be deleted; refused or quiet runs rename them to `.unused`.
    pub fn finish(self) -> Vec<Message> {
        let orphans: Vec<&PathBuf> = self.existing.difference(&self.written).collect();
        if orphans.is_empty() {
            return Vec::new();
        }
        let mut messages = Vec::new();
        let delete = !self.quiet && confirm_deletion(&orphans);
        for orphan in orphans {
            if delete {
                match fs::remove_file(orphan) {
                    Ok(()) => messages.push(Message::new_warning(&format!(
                        "deleted unused file `{}`",
                        orphan.display()
                    ))),
                    Err(error) => messages.push(Message::new_write_io_error(&error, orphan)),
                }
            } else {
                let mut renamed = orphan.as_os_str().to_owned();
                renamed.push(".unused");
                match fs::rename(orphan, PathBuf::from(&renamed)) {
                    Ok(()) => messages.push(Message::new_warning(&format!(
                        "renamed unused file `{}` to `{}.unused`",
                        orphan.display(),
                        orphan.display()
                    ))),
                    Err(error) => messages.push(Message::new_write_io_error(&error, orphan)),
                }
            }
        }
        messages
    }
}

fn confirm_deletion(orphans: &[&PathBuf]) -> bool {
    println!("The following generated files are no longer produced:");
    for orphan in orphans {
        println!("  {}", orphan.display());
    }
    Confirm::new("Delete these unused files?")
        .with_default(false)
        .prompt()
        .unwrap_or(false)
}
