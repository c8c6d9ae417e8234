//! Authenticity-check dialog for a registered document.
//!
//! A dialog starts `Idle`. Selecting a file moves it to `Verifying`, and the
//! digest comparison settles it as `Authentic` or `Tampered`. Closing the
//! dialog, by hand or by the auto-close timer, resets it to `Idle`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bson::oid::ObjectId;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::services::digest;

/// How long a verdict stays on screen before the dialog closes itself.
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Idle,
    Authentic,
    Tampered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogState {
    Idle,
    Verifying,
    Authentic,
    Tampered,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogError {
    #[error("A verification is already in progress for this document")]
    AlreadyVerifying,
    #[error("A verification result is still shown for this document")]
    ResultShown,
    #[error("No verification is in progress for this document")]
    NotVerifying,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentDialog {
    status: VerificationStatus,
    verifying: bool,
}

impl DocumentDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DialogState {
        match (self.verifying, self.status) {
            (true, _) => DialogState::Verifying,
            (false, VerificationStatus::Idle) => DialogState::Idle,
            (false, VerificationStatus::Authentic) => DialogState::Authentic,
            (false, VerificationStatus::Tampered) => DialogState::Tampered,
        }
    }

    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    /// The upload control is only live while the dialog is idle.
    pub fn select_file(&mut self) -> Result<(), DialogError> {
        match self.state() {
            DialogState::Idle => {
                self.verifying = true;
                Ok(())
            }
            DialogState::Verifying => Err(DialogError::AlreadyVerifying),
            DialogState::Authentic | DialogState::Tampered => Err(DialogError::ResultShown),
        }
    }

    /// Settles a running verification by comparing `file_digest` with the
    /// digest stored on the document record.
    pub fn complete(&mut self, stored_hash: &str, file_digest: &[u8]) -> Result<VerificationStatus, DialogError> {
        if !self.verifying {
            return Err(DialogError::NotVerifying);
        }

        self.status = if digest::matches(stored_hash, file_digest) {
            VerificationStatus::Authentic
        } else {
            VerificationStatus::Tampered
        };
        self.verifying = false;

        Ok(self.status)
    }

    pub fn close(&mut self) {
        self.status = VerificationStatus::Idle;
        self.verifying = false;
    }
}

struct Entry {
    dialog: DocumentDialog,
    // Bumped on every select so a stale auto-close timer leaves a newer run alone.
    generation: u64,
}

/// One dialog per document, shared by all requests. Keyed by the parsed id,
/// so every spelling of the same hex id lands on the same dialog.
#[derive(Clone, Default)]
pub struct VerificationRegistry {
    dialogs: Arc<Mutex<HashMap<ObjectId, Entry>>>,
    generations: Arc<AtomicU64>,
}

impl VerificationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ObjectId, Entry>> {
        // A panic while holding the lock cannot leave a dialog half-updated.
        self.dialogs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self, document_id: &ObjectId) -> DialogState {
        self.lock()
            .get(document_id)
            .map(|entry| entry.dialog.state())
            .unwrap_or(DialogState::Idle)
    }

    /// Moves the document's dialog into `Verifying`, returning the run's generation.
    pub fn begin(&self, document_id: &ObjectId) -> Result<u64, DialogError> {
        let mut dialogs = self.lock();
        let entry = dialogs.entry(*document_id).or_insert_with(|| Entry {
            dialog: DocumentDialog::new(),
            generation: 0,
        });

        entry.dialog.select_file()?;
        entry.generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(document_id = %document_id, generation = entry.generation, "verification started");

        Ok(entry.generation)
    }

    pub fn finish(
        &self,
        document_id: &ObjectId,
        stored_hash: &str,
        file_digest: &[u8],
    ) -> Result<VerificationStatus, DialogError> {
        let mut dialogs = self.lock();
        let entry = dialogs.get_mut(document_id).ok_or(DialogError::NotVerifying)?;
        let status = entry.dialog.complete(stored_hash, file_digest)?;

        info!(document_id = %document_id, ?status, "verification finished");
        Ok(status)
    }

    pub fn close(&self, document_id: &ObjectId) {
        if let Some(mut entry) = self.lock().remove(document_id) {
            entry.dialog.close();
        }
    }

    /// Closes the dialog after [`AUTO_CLOSE_DELAY`] unless a newer run has
    /// started or it was already closed.
    pub fn schedule_auto_close(&self, document_id: &ObjectId, generation: u64) {
        let registry = self.clone();
        let document_id = *document_id;

        tokio::spawn(async move {
            tokio::time::sleep(AUTO_CLOSE_DELAY).await;

            let mut dialogs = registry.lock();
            let settled = dialogs.get(&document_id).is_some_and(|entry| {
                entry.generation == generation && !matches!(entry.dialog.state(), DialogState::Verifying)
            });
            if settled {
                dialogs.remove(&document_id);
                debug!(document_id = %document_id, "verification dialog auto-closed");
            }
        });
    }
}
