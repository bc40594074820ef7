//! Rate-limited warning helper.
//!
//! Distilled spec §7: "Repeated runtime warnings are rate-limited to once
//! per ~5 seconds per source site to avoid log flooding." Grounded in the
//! original's `RATE_LIMIT` macro (`src/actions/actions.c`); re-expressed
//! here using the teacher's `log` crate rather than the original's raw
//! `DWARN` wrapper.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::{Duration, Instant};

const RATE_LIMIT: Duration = Duration::from_secs(5);

thread_local! {
    static LAST_WARN: RefCell<HashMap<(&'static str, &'static str), Instant>> =
        RefCell::new(HashMap::new());
}

/// Logs `message` at `warn` level, at most once per `(site_a, site_b)` key
/// per `RATE_LIMIT` interval.
pub fn rate_limited_warn(site_a: &'static str, site_b: &'static str, message: &str) {
    let should_log = LAST_WARN.with(|cell| {
        let mut map = cell.borrow_mut();
        let now = Instant::now();
        match map.get(&(site_a, site_b)) {
            Some(last) if now.duration_since(*last) < RATE_LIMIT => false,
            _ => {
                map.insert((site_a, site_b), now);
                true
            }
        }
    });
    if should_log {
        log::warn!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_call_within_window_is_suppressed_but_does_not_panic() {
        rate_limited_warn("test_site", "slot", "first");
        rate_limited_warn("test_site", "slot", "second");
    }
}
