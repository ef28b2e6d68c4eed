use std::time::Duration;

/// Aggregate CPU time counters from the `cpu` line of the stat record.
///
/// All fields are cumulative jiffies since boot and monotonically
/// non-decreasing while the kernel is live. Deltas are always taken with
/// saturating subtraction so a counter wrap or source replacement reads as
/// zero rather than underflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuCounters {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuCounters {
    pub fn total(&self) -> u64 {
        self.user
            + self.nice
            + self.system
            + self.idle
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
            + self.guest
            + self.guest_nice
    }

    /// Idle plus iowait: the non-working share of `total()`.
    pub fn idle_total(&self) -> u64 {
        self.idle + self.iowait
    }
}

/// Memory summary in kilobytes. `available <= total` holds on a healthy
/// system but is not enforced here; utilization math saturates instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryCounters {
    pub total_kb: u64,
    pub free_kb: u64,
    pub buffers_kb: u64,
    pub cached_kb: u64,
    pub available_kb: u64,
}

/// One live process as observed at capture time. Rebuilt from scratch every
/// cycle; only the delta engine's history outlives a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSample {
    pub pid: u32,
    /// Command name with the wrapping parentheses stripped. May contain
    /// spaces or further parentheses.
    pub name: String,
    /// utime + stime, cumulative jiffies.
    pub cpu_time: u64,
    /// Resident set size in kilobytes.
    pub rss_kb: u64,
}

/// Everything captured in one sampling pass, as close to atomically as the
/// source allows (best effort, no cross-field guarantee).
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    pub cpu: CpuCounters,
    pub memory: MemoryCounters,
    pub uptime: Duration,
    /// Ordered by pid ascending.
    pub processes: Vec<ProcessSample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_all_ten_fields() {
        let cpu = CpuCounters {
            user: 1,
            nice: 2,
            system: 3,
            idle: 4,
            iowait: 5,
            irq: 6,
            softirq: 7,
            steal: 8,
            guest: 9,
            guest_nice: 10,
        };
        assert_eq!(cpu.total(), 55);
        assert_eq!(cpu.idle_total(), 9);
    }

    #[test]
    fn default_counters_are_zero() {
        let cpu = CpuCounters::default();
        assert_eq!(cpu.total(), 0);
        assert_eq!(cpu.idle_total(), 0);
    }
}
