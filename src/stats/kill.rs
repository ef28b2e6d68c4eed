use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System};

/// Outcome of one signal-delivery attempt. Only immediate delivery is
/// reported; nothing waits for the target to actually exit.
#[derive(Debug)]
pub enum KillResult {
    Delivered(u32),
    Failed(u32, String),
    NotFound(u32),
}

impl KillResult {
    pub fn message(&self) -> String {
        match self {
            KillResult::Delivered(pid) => format!("Sent SIGTERM to PID {pid}"),
            KillResult::Failed(_, msg) => msg.clone(),
            KillResult::NotFound(pid) => format!("Process {pid} not found"),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, KillResult::Delivered(_))
    }
}

/// Requests graceful termination of `pid`. Refreshes only the target
/// process, so a stale view cannot signal the wrong recycled pid.
pub fn send_term(pid: u32) -> KillResult {
    let target = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[target]),
        true,
        ProcessRefreshKind::nothing(),
    );

    match sys.process(target) {
        Some(process) => match process.kill_with(Signal::Term) {
            Some(true) => KillResult::Delivered(pid),
            Some(false) => KillResult::Failed(
                pid,
                format!("Failed to send SIGTERM to PID {pid} (permission denied?)"),
            ),
            // Term not supported on this platform, fall back to kill()
            None => {
                if process.kill() {
                    KillResult::Delivered(pid)
                } else {
                    KillResult::Failed(pid, format!("Failed to kill PID {pid}"))
                }
            }
        },
        None => KillResult::NotFound(pid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonexistent_pid_reports_not_found() {
        let result = send_term(u32::MAX);
        assert!(matches!(result, KillResult::NotFound(_)));
        assert!(!result.is_success());
        assert!(result.message().contains("not found"));
    }
}
