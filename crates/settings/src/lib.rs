//! Typed configuration sections backed by a single RON delta file.
//!
//! Every section is a plain struct with a `Default` impl. The store keeps the
//! defaults in memory and only writes deviations from them to disk, so a freshly
//! installed server has an empty (or missing) settings file.

mod errors;
mod store;

pub use errors::SettingsError;
pub use store::{SettingsStore, SettingsStoreBuilder};

/// A configuration section.
///
/// `SECTION` is the top-level key under which the section lives in the
/// settings file.
pub trait Settings: Send + Sync + 'static {
    const SECTION: &'static str;

    fn name() -> &'static str {
        Self::SECTION
    }
}
