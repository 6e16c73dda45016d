use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{KvStore, DRAFT_KEY};
use crate::invoice::Currency;

/// Default debounce window for draft auto-saves.
pub const SAVE_DELAY: Duration = Duration::from_millis(1000);

/// The draft subset of the invoice record. Dates, amount and invoice
/// number are deliberately excluded: those belong to a single invoice,
/// not to the reusable identity/payment fields worth restoring next
/// session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftFields {
    pub contractor_name: String,
    pub contractor_address: String,
    pub contractor_email: String,
    pub contractor_phone: String,
    pub client_name: String,
    pub client_company: String,
    pub client_email: String,
    pub service_description: String,
    pub currency: Currency,
    pub bank_details: String,
    pub notes: String,
}

/// What actually lands in the store: the fields plus a save timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    #[serde(flatten)]
    pub fields: DraftFields,
    pub last_saved: DateTime<Utc>,
}

/// Draft persistence. Every save is a wholesale replace of the stored
/// snapshot; there is no merge and no history. Storage failures are
/// logged and swallowed, never surfaced to the caller.
pub struct DraftStore<S> {
    store: S,
}

impl<S: KvStore> DraftStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save(&self, fields: &DraftFields) {
        let snapshot = DraftSnapshot {
            fields: fields.clone(),
            last_saved: Utc::now(),
        };
        let json = match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("failed to serialize draft: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(DRAFT_KEY, &json) {
            log::warn!("failed to save draft: {e}");
        }
    }

    pub fn load(&self) -> Option<DraftSnapshot> {
        let raw = match self.store.get(DRAFT_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("failed to load draft: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::warn!("ignoring corrupt draft snapshot: {e}");
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(DRAFT_KEY) {
            log::warn!("failed to clear draft: {e}");
        }
    }

    pub fn exists(&self) -> bool {
        matches!(self.store.get(DRAFT_KEY), Ok(Some(_)))
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.load().map(|s| s.last_saved)
    }
}

struct Pending {
    fields: DraftFields,
    due: Instant,
}

/// Cancellable debounced writer over a [`DraftStore`].
///
/// `schedule_save` replaces any pending save and restarts the delay
/// window, so only the last snapshot scheduled inside a window is ever
/// written. The owner drives it: `poll` on a tick, `flush` on teardown.
/// Dropping the saver discards whatever is still pending.
pub struct DebouncedSaver<S: KvStore> {
    store: DraftStore<S>,
    delay: Duration,
    pending: Option<Pending>,
}

impl<S: KvStore> DebouncedSaver<S> {
    pub fn new(store: DraftStore<S>) -> Self {
        Self {
            store,
            delay: SAVE_DELAY,
            pending: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Schedule a save of `fields`, cancelling any pending one.
    pub fn schedule_save(&mut self, fields: DraftFields) {
        self.pending = Some(Pending {
            fields,
            due: Instant::now() + self.delay,
        });
    }

    /// Write the pending snapshot if its window has elapsed.
    /// Returns true when a write happened.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.pending.as_ref().is_some_and(|p| p.due <= now) {
            return false;
        }
        self.flush()
    }

    /// Write the pending snapshot immediately, ignoring the window.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                self.store.save(&pending.fields);
                true
            }
            None => false,
        }
    }

    /// Discard the pending snapshot without writing.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
