//! Latency measurement helpers for the `tailcast-bench` binary.

use std::fmt;

/// Returns a monotonic timestamp in nanoseconds.
///
/// Values are comparable across threads in the same process, so a writer
/// can publish one and a receiver can subtract it from its own reading.
#[cfg(unix)]
#[inline(never)]
pub fn mono_time_ns() -> u64 {
    use libc::{CLOCK_MONOTONIC, clock_gettime, timespec};
    let mut ts = timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, writable timespec and CLOCK_MONOTONIC is
    // always available on supported unix targets.
    unsafe {
        clock_gettime(CLOCK_MONOTONIC, &mut ts);
    }
    (ts.tv_sec as u64) * 1_000_000_000 + (ts.tv_nsec as u64)
}

/// Returns a monotonic timestamp in nanoseconds, relative to the first call.
#[cfg(not(unix))]
#[inline(never)]
pub fn mono_time_ns() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let epoch = *EPOCH.get_or_init(Instant::now);
    // Offset by one so the very first reading is non-zero.
    epoch.elapsed().as_nanos() as u64 + 1
}

/// Quantiles reported by [`Summary`] and [`Latencies::print_csv`].
pub const QUANTILES: [f64; 9] = [0.1, 0.5, 0.75, 0.9, 0.95, 0.99, 0.999, 0.9999, 0.99999];

/// Collected latency samples, in nanoseconds.
#[derive(Debug, Clone, Default)]
pub struct Latencies {
    samples: Vec<u64>,
}

/// Order statistics of a non-empty [`Latencies`] set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub n: usize,
    pub min: u64,
    pub max: u64,
    /// One entry per element of [`QUANTILES`], in the same order.
    pub quantiles: [u64; QUANTILES.len()],
}

impl Latencies {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Records the time elapsed between `sent_ns` and `received_ns`.
    ///
    /// A reading earlier than the send time records zero.
    pub fn record(&mut self, sent_ns: u64, received_ns: u64) {
        self.samples.push(received_ns.saturating_sub(sent_ns));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sorts the samples and computes their order statistics.
    ///
    /// Returns `None` if nothing was recorded.
    pub fn summary(&mut self) -> Option<Summary> {
        self.samples.sort_unstable();
        let sorted = &self.samples;
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        Some(Summary {
            n: sorted.len(),
            min,
            max,
            quantiles: QUANTILES.map(|p| nearest_rank(sorted, p)),
        })
    }

    /// Prints a CSV header followed by one row for this sample set.
    pub fn print_csv(&mut self, title: &str) {
        println!("{}", csv_header());
        match self.summary() {
            Some(summary) => println!("{title},{summary}"),
            None => println!("{title},0"),
        }
    }
}

/// Picks the sample at `round((n - 1) * p)` from a sorted, non-empty slice.
fn nearest_rank(sorted: &[u64], p: f64) -> u64 {
    debug_assert!((0.0..=1.0).contains(&p));
    let idx = ((sorted.len() - 1) as f64 * p).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn csv_header() -> String {
    let mut header = String::from("name,n,min,max");
    for p in QUANTILES {
        header.push(',');
        header.push_str(&p.to_string());
    }
    header
}

/// Formats as the CSV columns after `name`.
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.n, self.min, self.max)?;
        for q in &self.quantiles {
            write!(f, ",{q}")?;
        }
        Ok(())
    }
}
