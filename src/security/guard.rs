//! Read-only query guard.
//!
//! A best-effort client-side filter, not a security boundary: real enforcement
//! is delegated to a database-side read-only credential.

use crate::error::{GuardError, GuardResult};
use tracing::{debug, warn};

/// Substrings that mark a query as a write attempt.
pub const BLOCKED_KEYWORDS: [&str; 6] = ["insert", "update", "delete", "drop", "alter", "create"];

/// Rejects SQL strings that appear to contain mutating statements.
///
/// The check is a substring scan over the lowercased, trimmed query, not a
/// tokenizer. A read query that merely mentions a blocked word inside a string
/// literal or alias (`SELECT 'update' AS status`) is rejected, and mutating
/// forms outside the list (`TRUNCATE`, `RENAME`, `OPTIMIZE`, multi-statement
/// batches) pass. Both sides of that tradeoff are accepted: this guard only
/// keeps well-behaved clients honest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyGuard;

impl ReadOnlyGuard {
    pub fn new() -> Self {
        Self
    }

    /// Fails with [`GuardError::BlockedKeyword`] if the query contains any
    /// blocked keyword anywhere in its text, case-insensitively.
    pub fn assert_read_only(&self, sql: &str) -> GuardResult<()> {
        let normalized = sql.trim().to_lowercase();
        for keyword in BLOCKED_KEYWORDS {
            if normalized.contains(keyword) {
                warn!("Blocked write attempt: query contains '{}'", keyword);
                return Err(GuardError::BlockedKeyword(keyword));
            }
        }
        debug!("Query passed read-only guard");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_select_passes() {
        let guard = ReadOnlyGuard::new();
        assert!(guard.assert_read_only("SELECT id FROM events LIMIT 1").is_ok());
        assert!(guard.assert_read_only("SHOW TABLES FROM analytics").is_ok());
        assert!(guard.assert_read_only("DESCRIBE TABLE analytics.events").is_ok());
    }

    #[test]
    fn test_mutating_statements_rejected() {
        let guard = ReadOnlyGuard::new();
        for sql in [
            "INSERT INTO events VALUES (1, now())",
            "UPDATE users SET name = 'x'",
            "DELETE FROM events WHERE 1",
            "DROP TABLE events",
            "ALTER TABLE events ADD COLUMN x String",
            "CREATE TABLE t (x UInt8) ENGINE = Memory",
        ] {
            assert!(guard.assert_read_only(sql).is_err(), "should reject: {sql}");
        }
    }

    #[test]
    fn test_case_insensitive_and_anywhere() {
        let guard = ReadOnlyGuard::new();
        assert!(guard.assert_read_only("select * from t where Drop = 1").is_err());
        assert!(guard.assert_read_only("  dRoP TABLE t").is_err());
    }

    #[test]
    fn test_known_false_positive_in_string_literal() {
        // A keyword inside a string literal still trips the substring scan.
        let guard = ReadOnlyGuard::new();
        assert!(guard.assert_read_only("SELECT 'update' AS status").is_err());
    }

    #[test]
    fn test_known_false_negatives_pass() {
        // Mutating forms outside the keyword list are not caught here; the
        // read-only database credential is the actual enforcement point.
        let guard = ReadOnlyGuard::new();
        assert!(guard.assert_read_only("TRUNCATE TABLE t").is_ok());
        assert!(guard.assert_read_only("OPTIMIZE TABLE t FINAL").is_ok());
    }

    #[test]
    fn test_rejection_names_keyword() {
        let guard = ReadOnlyGuard::new();
        let err = guard.assert_read_only("DROP TABLE events").unwrap_err();
        assert!(err.to_string().contains("drop"));
    }
}
