/// Receives upload percentages, zero or more times per attempt.
pub type ProgressSink = Box<dyn Fn(u8) + Send + Sync>;

/// Percentage of `sent` out of `total`, rounded half up.
///
/// An unknown or zero total reports 0.
pub fn percent(sent: u64, total: Option<u64>) -> u8 {
    match total {
        Some(total) if total > 0 => {
            let sent = sent.min(total) as u128;
            let total = total as u128;
            ((sent * 200 + total) / (total * 2)) as u8
        }
        _ => 0,
    }
}

/// Accumulates sent bytes and reports a percentage only when it moves
/// forward, so a sink never sees a value lower than one it already got.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    sent: u64,
    total: Option<u64>,
    last: Option<u8>,
}

impl ProgressTracker {
    pub fn new(total: Option<u64>) -> Self {
        Self {
            sent: 0,
            total,
            last: None,
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Records `bytes` more as sent; returns the percentage if it should be
    /// reported.
    pub fn advance(&mut self, bytes: u64) -> Option<u8> {
        self.sent = self.sent.saturating_add(bytes);
        let current = percent(self.sent, self.total);
        match self.last {
            Some(last) if current <= last => None,
            _ => {
                self.last = Some(current);
                Some(current)
            }
        }
    }
}
