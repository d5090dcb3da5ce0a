//! Persistence is organized as two thin stores over an injectable key-value
//! [medium](medium::StorageMedium):
//!  - the settings store holds the single user configuration record,
//!  - the history store holds one record per calendar day, keyed `YYYY-MM-DD`.
//!
//! Both stores are synchronous and infallible. A missing or unreadable medium
//! behaves like an empty one, so reads resolve to defaults and writes become
//! no-ops instead of surfacing errors.

pub mod history;
pub mod medium;
pub mod settings;
