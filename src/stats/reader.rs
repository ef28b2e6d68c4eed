use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::eyre;

use super::counters::{CpuCounters, MemoryCounters, ProcessSample, SystemSnapshot};

/// Reads point-in-time snapshots from a `/proc`-shaped accounting tree.
///
/// Every read degrades rather than fails: a missing global record yields
/// zeroed counters, a missing or malformed per-process record drops that pid
/// for the current cycle only. The sole fatal condition is the root directory
/// being absent at startup, checked once in [`ProcReader::open`].
pub struct ProcReader {
    root: PathBuf,
}

impl ProcReader {
    pub fn open() -> Result<Self> {
        let root = PathBuf::from("/proc");
        if !root.is_dir() {
            return Err(eyre!(
                "accounting source {} is not available",
                root.display()
            ));
        }
        Ok(Self { root })
    }

    /// Same reader against an arbitrary root. Used by tests with a fixture
    /// tree; no existence check, capture degrades to zeros on an empty root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn capture(&self) -> SystemSnapshot {
        SystemSnapshot {
            cpu: self.read_cpu_counters(),
            memory: self.read_memory_counters(),
            uptime: self.read_uptime(),
            processes: self.read_processes(),
        }
    }

    fn read_cpu_counters(&self) -> CpuCounters {
        let contents = match std::fs::read_to_string(self.root.join("stat")) {
            Ok(contents) => contents,
            Err(_) => return CpuCounters::default(),
        };
        contents
            .lines()
            .next()
            .and_then(parse_cpu_line)
            .unwrap_or_default()
    }

    fn read_memory_counters(&self) -> MemoryCounters {
        match std::fs::read_to_string(self.root.join("meminfo")) {
            Ok(contents) => parse_meminfo(&contents),
            Err(_) => MemoryCounters::default(),
        }
    }

    fn read_uptime(&self) -> Duration {
        std::fs::read_to_string(self.root.join("uptime"))
            .ok()
            .and_then(|s| {
                s.split_whitespace()
                    .next()
                    .and_then(|tok| tok.parse::<f64>().ok())
            })
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or_default()
    }

    fn read_processes(&self) -> Vec<ProcessSample> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut samples: Vec<ProcessSample> = entries
            .flatten()
            .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
            .filter_map(|pid| self.read_process(pid))
            .collect();
        samples.sort_unstable_by_key(|p| p.pid);
        samples
    }

    /// Returns `None` when the process exited between enumeration and read,
    /// or when its records do not match the expected shape. Either way the
    /// pid is simply absent from this cycle.
    fn read_process(&self, pid: u32) -> Option<ProcessSample> {
        let stat = std::fs::read_to_string(self.root.join(pid.to_string()).join("stat")).ok()?;
        let (name, cpu_time) = parse_pid_stat(&stat)?;

        // A readable status record without a VmRSS line is a kernel thread,
        // not a malformed record: it stays in the table with zero RSS. Only
        // an unreadable status file drops the pid.
        let status =
            std::fs::read_to_string(self.root.join(pid.to_string()).join("status")).ok()?;
        let rss_kb = parse_vm_rss(&status).unwrap_or(0);

        Some(ProcessSample {
            pid,
            name,
            cpu_time,
            rss_kb,
        })
    }
}

/// Parses the aggregate `cpu` line: label followed by up to ten counters.
/// Older kernels emit fewer columns; missing trailing columns read as zero.
fn parse_cpu_line(line: &str) -> Option<CpuCounters> {
    let mut fields = line.split_whitespace();
    if fields.next() != Some("cpu") {
        return None;
    }
    let values: Vec<u64> = fields.filter_map(|tok| tok.parse().ok()).collect();
    if values.len() < 4 {
        return None;
    }
    let at = |i: usize| values.get(i).copied().unwrap_or(0);
    Some(CpuCounters {
        user: at(0),
        nice: at(1),
        system: at(2),
        idle: at(3),
        iowait: at(4),
        irq: at(5),
        softirq: at(6),
        steal: at(7),
        guest: at(8),
        guest_nice: at(9),
    })
}

fn parse_meminfo(contents: &str) -> MemoryCounters {
    let mut mem = MemoryCounters::default();
    for line in contents.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            mem.total_kb = parse_kb_field(rest);
        } else if let Some(rest) = line.strip_prefix("MemFree:") {
            mem.free_kb = parse_kb_field(rest);
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            mem.available_kb = parse_kb_field(rest);
        } else if let Some(rest) = line.strip_prefix("Buffers:") {
            mem.buffers_kb = parse_kb_field(rest);
        } else if let Some(rest) = line.strip_prefix("Cached:") {
            mem.cached_kb = parse_kb_field(rest);
        }
    }
    mem
}

fn parse_kb_field(rest: &str) -> u64 {
    rest.split_whitespace()
        .next()
        .and_then(|tok| tok.parse().ok())
        .unwrap_or(0)
}

/// Extracts the comm name and cumulative cpu time from a per-process stat
/// record.
///
/// The comm field is delimited by parentheses and may itself contain spaces
/// and parentheses, so extraction is lexical: slice between the first `(` and
/// the last `)`. Whitespace tokenization only starts after that point.
/// Fields after comm: state(0) ppid(1) pgrp(2) session(3) tty_nr(4) tpgid(5)
/// flags(6) minflt(7) cminflt(8) majflt(9) cmajflt(10) utime(11) stime(12).
fn parse_pid_stat(contents: &str) -> Option<(String, u64)> {
    let open = contents.find('(')?;
    let close = contents.rfind(')')?;
    if close <= open {
        return None;
    }
    let name = contents[open + 1..close].to_string();

    let fields: Vec<&str> = contents[close + 1..].split_whitespace().collect();
    let utime: u64 = fields.get(11)?.parse().ok()?;
    let stime: u64 = fields.get(12)?.parse().ok()?;
    Some((name, utime + stime))
}

/// Pulls the resident set size in kilobytes out of a status record.
fn parse_vm_rss(contents: &str) -> Option<u64> {
    contents
        .lines()
        .find_map(|line| line.strip_prefix("VmRSS:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|tok| tok.parse().ok())
}
