mod counter;
mod draft;
mod fs;

pub use counter::{IssuedNumber, SequenceCounter};
pub use draft::{DebouncedSaver, DraftFields, DraftSnapshot, DraftStore, SAVE_DELAY};
pub use fs::FileStore;

use std::io;

/// Storage key for the persisted invoice counter.
pub const COUNTER_KEY: &str = "invoice_counter";
/// Storage key for the persisted draft snapshot.
pub const DRAFT_KEY: &str = "invoice_form_data";

/// Minimal key-value persistence boundary. The counter and draft layers
/// are written against this trait so they never touch the filesystem
/// directly and degrade the same way no matter what backs them.
pub trait KvStore {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        (**self).remove(key)
    }
}
