use std::fmt;

use super::{KvStore, COUNTER_KEY};

/// Identifier shown when the backing store cannot be read at all.
const FALLBACK_IDENTIFIER: &str = "INV-001";

/// An invoice identifier together with how it was produced.
///
/// `Ephemeral` numbers were never written to the store (the store was
/// unavailable); callers may want to warn the user that numbering will
/// not survive the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuedNumber {
    Persisted(String),
    Ephemeral(String),
}

impl IssuedNumber {
    pub fn as_str(&self) -> &str {
        match self {
            IssuedNumber::Persisted(s) | IssuedNumber::Ephemeral(s) => s,
        }
    }

    pub fn into_inner(self) -> String {
        match self {
            IssuedNumber::Persisted(s) | IssuedNumber::Ephemeral(s) => s,
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        matches!(self, IssuedNumber::Ephemeral(_))
    }
}

impl fmt::Display for IssuedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted monotonic counter behind the invoice identifiers.
///
/// All operations degrade to a documented fallback instead of raising;
/// no caller ever sees a storage error from here.
pub struct SequenceCounter<S> {
    store: S,
    prefix: String,
}

impl<S: KvStore> SequenceCounter<S> {
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Format the identifier for counter value `n`.
    /// Zero-padded to 3 digits, unbounded above 999.
    fn format(&self, n: u64) -> String {
        format!("{}-{:03}", self.prefix, n)
    }

    fn read(&self) -> std::io::Result<Option<u64>> {
        let raw = self.store.get(COUNTER_KEY)?;
        Ok(raw.and_then(|s| match s.trim().parse::<u64>() {
            Ok(n) => Some(n),
            Err(_) => {
                log::warn!("ignoring corrupt invoice counter value {s:?}");
                None
            }
        }))
    }

    /// Current identifier without mutating state. A fresh install shows
    /// the number the first invoice will get; an unreadable store yields
    /// the fixed fallback, tagged `Ephemeral`.
    pub fn peek_current(&self) -> IssuedNumber {
        match self.read() {
            Ok(Some(n)) => IssuedNumber::Persisted(self.format(n)),
            Ok(None) => IssuedNumber::Persisted(self.format(1)),
            Err(e) => {
                log::warn!("counter store unavailable: {e}");
                IssuedNumber::Ephemeral(FALLBACK_IDENTIFIER.to_string())
            }
        }
    }

    /// Issue the next identifier, persisting the incremented counter.
    /// When the store cannot be read or written the identifier falls
    /// back to the last 3 digits of the current millisecond timestamp:
    /// best-effort uniqueness, explicitly not persisted.
    pub fn advance(&self) -> IssuedNumber {
        let next = match self.read() {
            Ok(n) => n.unwrap_or(0) + 1,
            Err(e) => {
                log::warn!("counter store unavailable: {e}");
                return IssuedNumber::Ephemeral(self.time_derived());
            }
        };
        match self.store.set(COUNTER_KEY, &next.to_string()) {
            Ok(()) => IssuedNumber::Persisted(self.format(next)),
            Err(e) => {
                log::warn!("failed to persist invoice counter: {e}");
                IssuedNumber::Ephemeral(self.time_derived())
            }
        }
    }

    /// Rebase the counter from a manually entered identifier. The
    /// trailing digit run wins outright (last-write-wins, backward moves
    /// included); input without a numeric suffix is a no-op.
    pub fn reconcile_from(&self, identifier: &str) {
        let Some(n) = trailing_number(identifier) else {
            return;
        };
        if let Err(e) = self.store.set(COUNTER_KEY, &n.to_string()) {
            log::warn!("failed to reconcile invoice counter: {e}");
        }
    }

    fn time_derived(&self) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        self.format((millis % 1000) as u64)
    }
}

/// Parse the trailing ASCII-digit run of a string, e.g. "INV-042" -> 42.
fn trailing_number(s: &str) -> Option<u64> {
    let digits = s.chars().rev().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    s[s.len() - digits..].parse().ok()
}
