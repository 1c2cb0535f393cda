use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

fn report_poisoned(tier: &'static str, op: &'static str, lock_kind: &'static str) {
    warn!(
        target = "vizesayfa::cache::lock",
        tier,
        op,
        lock_kind,
        hint = "entries may be stale after a panic in another task",
        "Recovered from poisoned cache lock"
    );
}

pub(crate) fn read_tier<'a, T>(
    lock: &'a RwLock<T>,
    tier: &'static str,
    op: &'static str,
) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| {
        report_poisoned(tier, op, "rwlock.read");
        poisoned.into_inner()
    })
}

pub(crate) fn write_tier<'a, T>(
    lock: &'a RwLock<T>,
    tier: &'static str,
    op: &'static str,
) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| {
        report_poisoned(tier, op, "rwlock.write");
        poisoned.into_inner()
    })
}
