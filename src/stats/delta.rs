use std::collections::{HashMap, HashSet};

use super::counters::{CpuCounters, MemoryCounters, SystemSnapshot};

/// Per-process result of one delta cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessStats {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub rss_kb: u64,
}

/// Everything the view needs from one cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleStats {
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub mem_used_kb: u64,
    pub processes: Vec<ProcessStats>,
}

/// Converts two time-separated snapshots into utilization rates.
///
/// The only state carried across cycles is the pid → last cumulative cpu
/// time map. Entries appear when a pid is first seen and are pruned once the
/// pid drops out of the enumeration, so the map stays bounded by the live
/// process count and a recycled pid never inherits a dead process's counter.
#[derive(Debug, Default)]
pub struct DeltaEngine {
    history: HashMap<u32, u64>,
}

impl DeltaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one full cycle against the previous snapshot: aggregate CPU,
    /// memory, per-process rates, then the history prune.
    pub fn advance(&mut self, prev: &SystemSnapshot, cur: &SystemSnapshot) -> CycleStats {
        let total_diff = cur.cpu.total().saturating_sub(prev.cpu.total());
        let mem_used_kb = cur
            .memory
            .total_kb
            .saturating_sub(cur.memory.available_kb);

        let processes = cur
            .processes
            .iter()
            .map(|p| ProcessStats {
                pid: p.pid,
                name: p.name.clone(),
                cpu_percent: self.process_utilization(p.pid, p.cpu_time, total_diff),
                rss_kb: p.rss_kb,
            })
            .collect();

        let alive: HashSet<u32> = cur.processes.iter().map(|p| p.pid).collect();
        self.prune(&alive);

        CycleStats {
            cpu_percent: cpu_utilization(&prev.cpu, &cur.cpu),
            mem_percent: memory_utilization(&cur.memory),
            mem_used_kb,
            processes,
        }
    }

    /// Per-process utilization over the cycle's aggregate `total_diff`.
    ///
    /// A pid with no prior history contributes zero for its first observed
    /// cycle; dividing lifetime-cumulative time by one interval would make
    /// every long-lived process spike on the program's first sample. History
    /// is updated with `cumulative` either way.
    pub fn process_utilization(&mut self, pid: u32, cumulative: u64, total_diff: u64) -> f64 {
        let diff = match self.history.insert(pid, cumulative) {
            Some(previous) => cumulative.saturating_sub(previous),
            None => 0,
        };
        if total_diff == 0 {
            return 0.0;
        }
        diff as f64 * 100.0 / total_diff as f64
    }

    /// Drops history entries for pids absent from the latest enumeration.
    pub fn prune(&mut self, alive: &HashSet<u32>) {
        self.history.retain(|pid, _| alive.contains(pid));
    }

    #[cfg(test)]
    fn tracked_pids(&self) -> usize {
        self.history.len()
    }
}

/// Aggregate CPU utilization over the interval between two counter samples.
/// A zero total diff (first cycle, stalled clock) is exactly 0.0.
pub fn cpu_utilization(prev: &CpuCounters, cur: &CpuCounters) -> f64 {
    let total_diff = cur.total().saturating_sub(prev.total());
    if total_diff == 0 {
        return 0.0;
    }
    let idle_diff = cur.idle_total().saturating_sub(prev.idle_total());
    let busy = total_diff.saturating_sub(idle_diff);
    busy as f64 * 100.0 / total_diff as f64
}

/// Stateless per-cycle memory utilization: used = total - available.
pub fn memory_utilization(mem: &MemoryCounters) -> f64 {
    if mem.total_kb == 0 {
        return 0.0;
    }
    let used = mem.total_kb.saturating_sub(mem.available_kb);
    used as f64 * 100.0 / mem.total_kb as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::counters::ProcessSample;

    fn counters(user: u64, idle: u64) -> CpuCounters {
        CpuCounters {
            user,
            idle,
            ..Default::default()
        }
    }

    #[test]
    fn utilization_matches_worked_example() {
        // prev total=1000 idle=800, cur total=1200 idle=850:
        // totalDiff=200, idleDiff=50 -> (200-50)*100/200 = 75.00
        let prev = counters(200, 800);
        let cur = counters(350, 850);
        assert_eq!(prev.total(), 1000);
        assert_eq!(cur.total(), 1200);
        let pct = cpu_utilization(&prev, &cur);
        assert!((pct - 75.0).abs() < 1e-9);
    }

    #[test]
    fn equal_totals_yield_exactly_zero() {
        let cpu = counters(100, 900);
        assert_eq!(cpu_utilization(&cpu, &cpu), 0.0);
    }

    #[test]
    fn counter_reset_reads_as_zero_not_underflow() {
        let prev = counters(1000, 9000);
        let cur = counters(10, 90);
        assert_eq!(cpu_utilization(&prev, &cur), 0.0);
    }

    #[test]
    fn flat_idle_with_growing_total_is_strictly_positive() {
        let prev = counters(100, 500);
        let cur = counters(150, 500);
        let pct = cpu_utilization(&prev, &cur);
        assert!(pct > 0.0);
        assert!(pct <= 100.0);
    }

    #[test]
    fn memory_utilization_worked_example() {
        let mem = MemoryCounters {
            total_kb: 8_000_000,
            available_kb: 2_000_000,
            ..Default::default()
        };
        assert!((memory_utilization(&mem) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn memory_utilization_zero_total_is_zero() {
        assert_eq!(memory_utilization(&MemoryCounters::default()), 0.0);
    }

    #[test]
    fn first_observation_contributes_zero_then_real_rate() {
        let mut engine = DeltaEngine::new();
        // pid 42 first seen at cumulative=500: 0.00 this cycle.
        assert_eq!(engine.process_utilization(42, 500, 200), 0.0);
        // Next cycle cumulative=560, totalDiff=200: diff=60 -> 30.00%.
        let pct = engine.process_utilization(42, 560, 200);
        assert!((pct - 30.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_diff_guards_division() {
        let mut engine = DeltaEngine::new();
        engine.process_utilization(7, 100, 200);
        assert_eq!(engine.process_utilization(7, 150, 0), 0.0);
    }

    #[test]
    fn absent_pid_is_purged_and_recycled_pid_starts_fresh() {
        let mut engine = DeltaEngine::new();
        engine.process_utilization(42, 10_000, 100);
        engine.process_utilization(43, 500, 100);
        assert_eq!(engine.tracked_pids(), 2);

        // pid 42 exits; only 43 remains alive.
        let alive: HashSet<u32> = [43].into_iter().collect();
        engine.prune(&alive);
        assert_eq!(engine.tracked_pids(), 1);

        // A new process recycles pid 42 with a small counter. Without the
        // purge this would diff against 10_000; fresh history means zero.
        assert_eq!(engine.process_utilization(42, 30, 100), 0.0);
        let pct = engine.process_utilization(42, 80, 100);
        assert!((pct - 50.0).abs() < 1e-9);
    }

    fn snapshot(cpu: CpuCounters, procs: Vec<ProcessSample>) -> SystemSnapshot {
        SystemSnapshot {
            cpu,
            memory: MemoryCounters {
                total_kb: 8_000_000,
                available_kb: 2_000_000,
                ..Default::default()
            },
            uptime: std::time::Duration::from_secs(100),
            processes: procs,
        }
    }

    fn sample(pid: u32, name: &str, cpu_time: u64, rss_kb: u64) -> ProcessSample {
        ProcessSample {
            pid,
            name: name.to_string(),
            cpu_time,
            rss_kb,
        }
    }

    #[test]
    fn advance_computes_rates_and_prunes_departed_pids() {
        let mut engine = DeltaEngine::new();

        let prev = snapshot(counters(200, 800), vec![]);
        let base = snapshot(
            counters(200, 800),
            vec![sample(1, "init", 100, 2048), sample(2, "worker", 40, 1024)],
        );
        // Baseline: primes history, everything reports zero.
        let stats = engine.advance(&prev, &base);
        assert!(stats.processes.iter().all(|p| p.cpu_percent == 0.0));

        // pid 2 exits, pid 3 appears, pid 1 burns 50 of 200 jiffies.
        let cur = snapshot(
            counters(350, 850),
            vec![sample(1, "init", 150, 2048), sample(3, "fresh", 900, 512)],
        );
        let stats = engine.advance(&base, &cur);

        assert!((stats.cpu_percent - 75.0).abs() < 1e-9);
        assert!((stats.mem_percent - 75.0).abs() < 1e-9);
        assert_eq!(stats.mem_used_kb, 6_000_000);

        assert_eq!(stats.processes.len(), 2);
        assert!((stats.processes[0].cpu_percent - 25.0).abs() < 1e-9);
        // Fresh pid: zero on first observation despite a large cumulative.
        assert_eq!(stats.processes[1].cpu_percent, 0.0);

        // History now tracks exactly the live set {1, 3}.
        assert_eq!(engine.tracked_pids(), 2);
    }
}
