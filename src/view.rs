use crate::stats::delta::ProcessStats;

/// Rows shown in the process table at once.
pub const DISPLAY_ROWS: usize = 20;

/// Active ranking key. Exactly one is active; adding a key (e.g. by name)
/// means adding a variant, not another boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Cpu,
    Memory,
}

impl SortKey {
    pub fn toggle(self) -> Self {
        match self {
            SortKey::Cpu => SortKey::Memory,
            SortKey::Memory => SortKey::Cpu,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Cpu => "CPU",
            SortKey::Memory => "RSS",
        }
    }
}

/// One display row; a filtered, ordered projection of [`ProcessStats`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub rss_kb: u64,
}

impl From<&ProcessStats> for ProcessRow {
    fn from(stats: &ProcessStats) -> Self {
        ProcessRow {
            pid: stats.pid,
            name: stats.name.clone(),
            cpu_percent: stats.cpu_percent,
            rss_kb: stats.rss_kb,
        }
    }
}

/// Filters by literal case-sensitive substring, sorts by the active key
/// descending (ties: the other numeric field descending, then pid ascending
/// so equal rows still order deterministically), and truncates to `limit`.
pub fn rank(stats: &[ProcessStats], key: SortKey, filter: &str, limit: usize) -> Vec<ProcessRow> {
    let mut rows: Vec<ProcessRow> = stats
        .iter()
        .filter(|p| filter.is_empty() || p.name.contains(filter))
        .map(ProcessRow::from)
        .collect();

    rows.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Cpu => b
                .cpu_percent
                .total_cmp(&a.cpu_percent)
                .then(b.rss_kb.cmp(&a.rss_kb)),
            SortKey::Memory => b
                .rss_kb
                .cmp(&a.rss_kb)
                .then(b.cpu_percent.total_cmp(&a.cpu_percent)),
        };
        ordering.then(a.pid.cmp(&b.pid))
    });

    rows.truncate(limit);
    rows
}
