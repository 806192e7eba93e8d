//! Waiting for host-side DVH statistics.
//!
//! The host computes DVH statistics asynchronously after they are requested.
//! When it can report progress the wait polls until ready or the timeout
//! elapses; otherwise a fixed settling delay is applied. Either way the
//! caller reads the statistics exactly once afterwards.

use super::{DvhSource, Readiness};
use std::thread;
use std::time::{Duration, Instant};

const DEFAULT_SETTLE_MS: u64 = 500;
const DEFAULT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_POLL_MS: u64 = 50;
/// Floor for the poll interval so a zero setting cannot busy-wait
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Wait policy for DVH statistics
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsWait {
    /// Fixed delay when the host cannot report readiness
    pub settle: Duration,
    /// Upper bound on polling when it can
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for StatisticsWait {
    fn default() -> Self {
        StatisticsWait {
            settle: Duration::from_millis(DEFAULT_SETTLE_MS),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
        }
    }
}

impl StatisticsWait {
    /// No waiting at all; for hosts whose statistics are precomputed.
    pub fn immediate() -> Self {
        StatisticsWait {
            settle: Duration::ZERO,
            timeout: Duration::ZERO,
            poll_interval: Duration::ZERO,
        }
    }
}

/// How the wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Host reported ready after `polls` pending probes
    Ready { polls: u32 },
    /// Host cannot report readiness; the settling delay was applied
    Settled,
    /// Still pending when the timeout elapsed
    TimedOut { polls: u32 },
}

/// Block until the host's statistics can be read.
pub fn wait_for_statistics<S: DvhSource + ?Sized>(source: &S, wait: &StatisticsWait) -> WaitOutcome {
    let start = Instant::now();
    let mut polls = 0;

    loop {
        match source.statistics_ready() {
            Readiness::Ready => return WaitOutcome::Ready { polls },
            Readiness::Unknown => {
                if !wait.settle.is_zero() {
                    thread::sleep(wait.settle);
                }
                return WaitOutcome::Settled;
            }
            Readiness::Pending => {
                let elapsed = start.elapsed();
                if elapsed >= wait.timeout {
                    return WaitOutcome::TimedOut { polls };
                }
                polls += 1;
                let remaining = wait.timeout - elapsed;
                thread::sleep(wait.poll_interval.max(MIN_POLL_INTERVAL).min(remaining));
            }
        }
    }
}
