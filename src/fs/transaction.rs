//! Manifest writes that succeed or fail as a unit.
//!
//! Rewritten manifests are staged first and only written on `commit()`.
//! A failed write restores every file already written.
//!
//! ## Phases
//!
//! 1. **Build**: Stage rewritten files via `update_file()`
//! 2. **Validate**: Check paths still exist and are writable
//! 3. **Execute**: Write files in staging order
//! 4. **Rollback** (on failure): Restore originals in reverse order
//!
//! ## Example
//!
//! ```no_run
//! # use osgi_rename::fs::Transaction;
//! # use std::path::PathBuf;
//! # fn example() -> osgi_rename::error::Result<()> {
//! let mut txn = Transaction::new(false);
//!
//! let path = PathBuf::from("META-INF/MANIFEST.MF");
//! let original = std::fs::read_to_string(&path)?;
//! txn.update_file(path, original, "Manifest-Version: 1.0\r\n".into(), 1)?;
//!
//! txn.commit()?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, TransformError};

use colored::Colorize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A staged file write.
#[derive(Debug, Clone)]
pub struct FileUpdate {
    pub path: PathBuf,
    /// Content on disk when staged; written back on rollback.
    pub original: String,
    pub new: String,
    /// Header changes that produced `new`.
    pub changes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransactionState {
    /// Staging updates.
    Building,
    /// All updates written.
    Committed,
    /// Restored after commit.
    RolledBack,
    /// Validation or a write failed.
    Failed,
}

/// Batch of manifest rewrites.
///
/// Must be explicitly committed. Dropping an uncommitted transaction only
/// logs a warning, since nothing was written.
///
/// In dry-run mode updates are staged and summarized but never written.
#[must_use = "Transaction must be committed or rolled back"]
pub struct Transaction {
    updates: Vec<FileUpdate>,
    dry_run: bool,
    state: TransactionState,
    written: usize,
}

impl Transaction {
    pub fn new(dry_run: bool) -> Self {
        Self {
            updates: Vec::new(),
            dry_run,
            state: TransactionState::Building,
            written: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn is_committed(&self) -> bool {
        self.state == TransactionState::Committed
    }

    pub fn updates(&self) -> &[FileUpdate] {
        &self.updates
    }

    /// Total header changes across all staged files.
    pub fn total_changes(&self) -> usize {
        self.updates.iter().map(|u| u.changes).sum()
    }

    /// Stages a file rewrite.
    ///
    /// `original` is the text the caller read and is what a rollback
    /// writes back. Identical content is skipped.
    pub fn update_file(
        &mut self,
        path: PathBuf,
        original: String,
        new_content: String,
        changes: usize,
    ) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(TransformError::Other(anyhow::anyhow!(
                "Cannot modify transaction after commit/rollback"
            )));
        }

        log::debug!("Staging update for: {}", path.display());

        if original == new_content {
            log::debug!("Content unchanged, skipping: {}", path.display());
            return Ok(());
        }

        if self.dry_run {
            log::info!("Would update: {}", path.display());
        }

        self.updates.push(FileUpdate {
            path,
            original,
            new: new_content,
            changes,
        });
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for update in &self.updates {
            let path = &update.path;
            if !seen.insert(path) {
                return Err(TransformError::Other(anyhow::anyhow!(
                    "Duplicate file operation: {}",
                    path.display()
                )));
            }

            let metadata = fs::metadata(path).map_err(|e| {
                TransformError::Io(std::io::Error::new(
                    e.kind(),
                    format!("File no longer exists: {}", path.display()),
                ))
            })?;

            if metadata.permissions().readonly() {
                return Err(TransformError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("File is read-only: {}", path.display()),
                )));
            }
        }

        Ok(())
    }

    /// Writes all staged updates.
    ///
    /// If a write fails, files already written are restored and the write
    /// error is returned.
    pub fn commit(&mut self) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(TransformError::Other(anyhow::anyhow!(
                "Transaction already committed/rolled back"
            )));
        }

        if self.dry_run {
            self.state = TransactionState::Committed;
            return Ok(());
        }

        if let Err(e) = self.validate() {
            self.state = TransactionState::Failed;
            return Err(e);
        }

        for idx in 0..self.updates.len() {
            let update = &self.updates[idx];
            if let Err(e) = fs::write(&update.path, &update.new) {
                let err = TransformError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to write {}: {}", update.path.display(), e),
                ));
                log::error!("{}; rolling back {} file(s)", err, self.written);
                self.state = TransactionState::Failed;
                self.restore()?;
                return Err(err);
            }
            self.written += 1;
            log::debug!("Updated: {}", update.path.display());
        }

        self.state = TransactionState::Committed;
        Ok(())
    }

    /// Restores the original content of every committed file.
    pub fn rollback(&mut self) -> Result<()> {
        match self.state {
            TransactionState::Building => Ok(()),
            TransactionState::Committed if self.dry_run => Ok(()),
            TransactionState::Committed => {
                self.restore()?;
                self.state = TransactionState::RolledBack;
                log::info!("Rollback completed");
                Ok(())
            }
            TransactionState::Failed => Err(TransformError::Other(anyhow::anyhow!(
                "Transaction failed; rollback already attempted"
            ))),
            TransactionState::RolledBack => Err(TransformError::Other(anyhow::anyhow!(
                "Transaction already rolled back"
            ))),
        }
    }

    /// Writes back originals of the first `written` updates, newest first.
    fn restore(&mut self) -> Result<()> {
        let mut errors = Vec::new();

        for update in self.updates[..self.written].iter().rev() {
            if let Err(e) = fs::write(&update.path, &update.original) {
                errors.push(format!("Failed to restore {}: {}", update.path.display(), e));
            }
        }
        self.written = 0;

        if errors.is_empty() {
            Ok(())
        } else {
            Err(TransformError::RollbackFailed(errors.join("; ")))
        }
    }

    /// Prints the staged files and their change counts.
    ///
    /// Paths are shown relative to `root` with forward slashes.
    pub fn print_summary(&self, root: &Path) {
        if self.updates.is_empty() {
            println!("\n{}", "No changes needed".yellow());
            return;
        }

        if self.dry_run {
            println!("\n{}", "DRY RUN - No changes will be made".yellow().bold());
        } else {
            println!("\n{}", "Changes applied:".green().bold());
        }

        let mut lines: Vec<_> = self
            .updates
            .iter()
            .map(|u| (display_path(&u.path, root), u.changes))
            .collect();
        lines.sort();

        println!("\n{} Manifests ({})", "📦".bold(), lines.len());
        for (path, changes) in &lines {
            let count = format!(
                "({} change{})",
                changes,
                if *changes == 1 { "" } else { "s" }
            );
            if self.dry_run {
                println!("   • {} {}", path.dimmed(), count.cyan());
            } else {
                println!("   {} {} {}", "✓".green(), path.dimmed(), count.cyan());
            }
        }

        println!();
        let files = self.updates.len();
        if self.dry_run {
            println!(
                "{} {} will be modified. Run without {} to apply.",
                files.to_string().cyan().bold(),
                if files > 1 { "files" } else { "file" },
                "--dry-run".cyan()
            );
        } else {
            println!(
                "{} Rewrote {} header value{} in {} file{}",
                "✓".green().bold(),
                self.total_changes(),
                if self.total_changes() == 1 { "" } else { "s" },
                files,
                if files == 1 { "" } else { "s" }
            );
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state == TransactionState::Building && !self.updates.is_empty() && !self.dry_run {
            log::warn!("Transaction dropped without commit");
        }
    }
}

fn display_path(path: &Path, root: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(temp: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = temp.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn stage(txn: &mut Transaction, path: &Path, new: &str, changes: usize) {
        let original = fs::read_to_string(path).unwrap();
        txn.update_file(path.to_path_buf(), original, new.to_string(), changes)
            .unwrap();
    }

    #[test]
    fn test_new_transaction() {
        let txn = Transaction::new(false);
        assert!(!txn.is_dry_run());
        assert!(txn.is_empty());
        assert_eq!(txn.len(), 0);
    }

    #[test]
    fn test_update_file_stages_operation() {
        let temp = TempDir::new().unwrap();
        let file = write(&temp, "MANIFEST.MF", "original");

        let mut txn = Transaction::new(true);
        stage(&mut txn, &file, "new", 2);

        assert_eq!(txn.len(), 1);
        assert_eq!(txn.total_changes(), 2);
        assert_eq!(txn.updates()[0].original, "original");
        assert_eq!(fs::read_to_string(&file).unwrap(), "original");
    }

    #[test]
    fn test_update_file_keeps_given_original() {
        let temp = TempDir::new().unwrap();
        let file = write(&temp, "MANIFEST.MF", "read by caller");

        let mut txn = Transaction::new(false);
        txn.update_file(file.clone(), "read by caller".to_string(), "new".to_string(), 1)
            .unwrap();
        fs::write(&file, "changed after staging").unwrap();

        txn.commit().unwrap();
        txn.rollback().unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "read by caller");
    }

    #[test]
    fn test_update_file_no_change_skips() {
        let temp = TempDir::new().unwrap();
        let file = write(&temp, "MANIFEST.MF", "same");

        let mut txn = Transaction::new(false);
        stage(&mut txn, &file, "same", 1);

        assert!(txn.is_empty());
    }

    #[test]
    fn test_commit_validates_missing_file() {
        let temp = TempDir::new().unwrap();
        let mut txn = Transaction::new(false);

        txn.update_file(
            temp.path().join("missing.MF"),
            "x".to_string(),
            "y".to_string(),
            1,
        )
        .unwrap();
        assert!(matches!(txn.commit(), Err(TransformError::Io(_))));
    }

    #[test]
    fn test_dry_run_commit_does_not_modify_files() {
        let temp = TempDir::new().unwrap();
        let file = write(&temp, "MANIFEST.MF", "original");

        let mut txn = Transaction::new(true);
        stage(&mut txn, &file, "modified", 1);
        txn.commit().unwrap();

        assert!(txn.is_committed());
        assert_eq!(fs::read_to_string(&file).unwrap(), "original");

        txn.rollback().unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "original");
    }

    #[test]
    fn test_commit_applies_updates() {
        let temp = TempDir::new().unwrap();
        let file1 = write(&temp, "a.MF", "original 1");
        let file2 = write(&temp, "b.MF", "original 2");

        let mut txn = Transaction::new(false);
        stage(&mut txn, &file1, "modified 1", 1);
        stage(&mut txn, &file2, "modified 2", 1);
        txn.commit().unwrap();

        assert_eq!(fs::read_to_string(&file1).unwrap(), "modified 1");
        assert_eq!(fs::read_to_string(&file2).unwrap(), "modified 2");
    }

    #[test]
    fn test_rollback_restores_files() {
        let temp = TempDir::new().unwrap();
        let file = write(&temp, "MANIFEST.MF", "original");

        let mut txn = Transaction::new(false);
        stage(&mut txn, &file, "modified", 1);
        txn.commit().unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "modified");

        txn.rollback().unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "original");
        assert!(txn.rollback().is_err());
    }

    #[test]
    fn test_commit_twice_fails() {
        let mut txn = Transaction::new(false);
        txn.commit().unwrap();
        assert!(txn.commit().is_err());
    }

    #[test]
    fn test_commit_fails_when_file_removed() {
        let temp = TempDir::new().unwrap();
        let kept = write(&temp, "a.MF", "a");
        let removed = write(&temp, "b.MF", "b");

        let mut txn = Transaction::new(false);
        stage(&mut txn, &kept, "A", 1);
        stage(&mut txn, &removed, "B", 1);
        fs::remove_file(&removed).unwrap();

        assert!(txn.commit().is_err());
        assert_eq!(fs::read_to_string(&kept).unwrap(), "a");
        assert!(!removed.exists());
    }

    #[test]
    fn test_commit_failure_restores_written_files() {
        let temp = TempDir::new().unwrap();
        let written = write(&temp, "a.MF", "a");
        let blocked = write(&temp, "b.MF", "b");

        let mut txn = Transaction::new(false);
        stage(&mut txn, &written, "A", 1);
        stage(&mut txn, &blocked, "B", 1);

        // Passes validation but the write itself fails.
        fs::remove_file(&blocked).unwrap();
        fs::create_dir(&blocked).unwrap();

        assert!(txn.commit().is_err());
        assert!(!txn.is_committed());
        assert_eq!(fs::read_to_string(&written).unwrap(), "a");
        assert!(blocked.is_dir());
    }

    #[test]
    fn test_update_after_commit_fails() {
        let temp = TempDir::new().unwrap();
        let file = write(&temp, "MANIFEST.MF", "x");

        let mut txn = Transaction::new(false);
        txn.commit().unwrap();
        let result = txn.update_file(file, "x".to_string(), "y".to_string(), 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_display_path_is_relative() {
        let root = Path::new("/work");
        assert_eq!(
            display_path(Path::new("/work/a/META-INF/MANIFEST.MF"), root),
            "a/META-INF/MANIFEST.MF"
        );
        assert_eq!(
            display_path(Path::new("/elsewhere/MANIFEST.MF"), root),
            "../elsewhere/MANIFEST.MF"
        );
        assert_eq!(
            display_path(Path::new("/work/a/META-INF/MANIFEST.MF"), Path::new("/work/b")),
            "../a/META-INF/MANIFEST.MF"
        );
        assert_eq!(
            display_path(Path::new("a/META-INF/MANIFEST.MF"), Path::new(".")),
            "a/META-INF/MANIFEST.MF"
        );
    }

    #[test]
    fn test_print_summary() {
        let temp = TempDir::new().unwrap();
        let file = write(&temp, "MANIFEST.MF", "original");

        let empty = Transaction::new(false);
        empty.print_summary(temp.path());

        let mut txn = Transaction::new(true);
        stage(&mut txn, &file, "modified", 3);
        txn.print_summary(temp.path());
    }
}
