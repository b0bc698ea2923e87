//! Parser warnings routed through `tracing`.
//!
//! Provides deduplication to avoid spamming the same warning for every
//! message in a batch. Used by the CSS components to report unsupported
//! properties and ignored at-rules.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Number of distinct warnings remembered before the set is reset.
///
/// Input is attacker controlled, so the set must not grow with it.
pub const MAX_REMEMBERED_WARNINGS: usize = 1024;

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported feature (emits once per unique message)
///
/// Returns `true` if the warning was emitted, `false` if it was suppressed
/// as a duplicate.
///
/// # Example
/// ```
/// use mailstyle_common::warning::warn_once;
///
/// let _ = warn_once("CSS", "unsupported property 'float'");
/// assert!(!warn_once("CSS", "unsupported property 'float'"));
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_emit = {
        let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
        remember(guard.get_or_insert_with(HashSet::new), key)
    };

    if should_emit {
        tracing::warn!(component, "{message}");
    }
    should_emit
}

/// Record `key`, returning `true` if it was not seen before.
fn remember(set: &mut HashSet<String>, key: String) -> bool {
    if set.len() >= MAX_REMEMBERED_WARNINGS && !set.contains(&key) {
        set.clear();
    }
    set.insert(key)
}

/// Clear all recorded warnings (call between unrelated inputs if every
/// warning should be reported again)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_warning_is_suppressed() {
        let message = "test_duplicate_warning_is_suppressed";
        let _ = warn_once("TEST", message);
        assert!(!warn_once("TEST", message));
    }

    #[test]
    fn test_component_is_part_of_key() {
        let message = "test_component_is_part_of_key";
        let _ = warn_once("A", message);
        let _ = warn_once("B", message);
        assert!(!warn_once("A", message));
        assert!(!warn_once("B", message));
    }

    #[test]
    fn test_set_stays_bounded() {
        let mut set = HashSet::new();
        for i in 0..(MAX_REMEMBERED_WARNINGS + 10) {
            assert!(remember(&mut set, format!("message {i}")));
        }
        assert!(set.len() <= MAX_REMEMBERED_WARNINGS);
        assert!(!remember(&mut set, format!("message {}", MAX_REMEMBERED_WARNINGS + 9)));
    }
}
