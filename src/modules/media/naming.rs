use std::sync::atomic::{AtomicI64, Ordering};

/// Issues storage names of the form `<millis>-<original name>`.
///
/// The millisecond prefix follows the wall clock but is handed out as a
/// ticket that never repeats within the process, so two uploads of
/// `clip.mp4` in the same millisecond still get different names.
#[derive(Debug, Default)]
pub struct StorageNamer {
    last_ticket: AtomicI64,
}

impl StorageNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&self, original_name: &str) -> String {
        format!("{}-{}", self.next_ticket(), original_name)
    }

    fn next_ticket(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let mut last = self.last_ticket.load(Ordering::Acquire);
        loop {
            let next = now.max(last + 1);
            match self.last_ticket.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return next,
                Err(current) => last = current,
            }
        }
    }
}
