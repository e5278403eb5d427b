//! Read-only query validation.

pub mod guard;

pub use guard::{BLOCKED_KEYWORDS, ReadOnlyGuard};
