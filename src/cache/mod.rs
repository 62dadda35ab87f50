//! System-requirements cache.
//!
//! Memoizes the execution of recipe installers that set up host-level
//! dependencies, keyed either by recipe alone (global scope) or by
//! recipe plus package identifier (local scope).
//!
//! # Entry States
//!
//! | State | On disk | Next `ensure` |
//! |-------|---------|---------------|
//! | Absent | no entry file | runs the installer |
//! | Present | entry file (possibly empty) | returns the stored text |
//!
//! Entries are created once, never edited in place, and only leave the
//! cache by pruning or by someone deleting the file.

pub mod entry;
pub mod lock;
pub mod paths;
pub mod prune;
pub mod system_reqs;

pub use entry::CacheEntry;
pub use lock::KeyLock;
pub use paths::{CacheKey, CacheLayout, Scope, SYSTEM_REQS_FILE};
pub use prune::{PackageSelector, PruneReport};
pub use system_reqs::{Ensured, Installer, Outcome, SystemReqsCache};
