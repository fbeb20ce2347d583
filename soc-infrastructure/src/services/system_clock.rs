use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

use soc_domain::Clock;

/// Wall clock pinned to one offset for the lifetime of the process.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Uses the configured offset, or the host's current one when unset.
    pub fn from_offset(offset: Option<FixedOffset>) -> Self {
        Self::new(offset.unwrap_or_else(|| Local::now().offset().fix()))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}
