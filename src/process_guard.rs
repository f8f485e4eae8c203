//! Lifecycle management for package-manager child processes
//!
//! `pacman` and AUR helpers run with `PR_SET_PDEATHSIG` set, and their PIDs
//! are tracked while they run. On SIGINT/SIGTERM/SIGHUP, or when a
//! [`ProcessGuard`] is dropped, every tracked child gets SIGTERM, then
//! SIGKILL after a grace period.
//!
//! Commands that share our stdin stay in the foreground process group: a
//! background group reading the terminal (a sudo password prompt) would be
//! stopped by SIGTTIN. Queries with no terminal I/O get their own group.
//!
//! An interrupted `pacman -S` otherwise keeps holding `/var/lib/pacman/db.lck`.

use nix::libc;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

static CHILD_PROCESSES: OnceLock<Arc<Mutex<ChildProcesses>>> = OnceLock::new();

/// PIDs of package-manager processes currently running
#[derive(Debug, Default)]
pub struct ChildProcesses {
    pids: HashSet<u32>,
    terminating: bool,
}

impl ChildProcesses {
    /// Process-wide registry shared by the runner and the signal thread
    pub fn global() -> Arc<Mutex<ChildProcesses>> {
        CHILD_PROCESSES
            .get_or_init(|| Arc::new(Mutex::new(ChildProcesses::default())))
            .clone()
    }

    pub fn track(&mut self, pid: u32) {
        self.pids.insert(pid);
        tracing::debug!(pid, "tracking child process");
    }

    pub fn untrack(&mut self, pid: u32) {
        self.pids.remove(&pid);
        tracing::debug!(pid, "child process finished");
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    /// SIGTERM every tracked child (its whole group when it leads one), wait
    /// up to `grace`, then SIGKILL survivors.
    ///
    /// Runs at most once per registry.
    pub fn terminate_all(&mut self, grace: Duration) {
        if self.terminating {
            return;
        }
        self.terminating = true;

        if self.pids.is_empty() {
            return;
        }

        let pids: Vec<u32> = self.pids.drain().collect();
        tracing::info!("Terminating {} package manager process(es)", pids.len());

        for &pid in &pids {
            if signal_group(pid, Signal::SIGTERM).is_err() {
                if let Err(e) = signal_pid(pid, Signal::SIGTERM) {
                    tracing::warn!("Failed to send SIGTERM to {}: {}", pid, e);
                }
            }
        }

        let start = Instant::now();
        while start.elapsed() < grace {
            if !pids.iter().any(|&pid| is_alive(pid)) {
                tracing::info!("Child processes exited after SIGTERM");
                return;
            }
            std::thread::sleep(Duration::from_millis(100));
        }

        for &pid in pids.iter().filter(|&&pid| is_alive(pid)) {
            tracing::warn!("Process {} ignored SIGTERM, sending SIGKILL", pid);
            if signal_group(pid, Signal::SIGKILL).is_err() {
                let _ = signal_pid(pid, Signal::SIGKILL);
            }
        }
    }
}

fn signal_pid(pid: u32, signal: Signal) -> Result<(), nix::Error> {
    signal::kill(Pid::from_raw(pid as i32), signal)
}

/// Negative PID addresses the whole group. Fails with `ESRCH` when `pgid`
/// does not lead a group.
fn signal_group(pgid: u32, signal: Signal) -> Result<(), nix::Error> {
    signal::kill(Pid::from_raw(-(pgid as i32)), signal)
}

/// Alive means the PID exists and is not a zombie.
fn is_alive(pid: u32) -> bool {
    if signal::kill(Pid::from_raw(pid as i32), None).is_err() {
        return false;
    }
    match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        Ok(stat) => !matches!(stat.split_whitespace().nth(2), Some("Z" | "X")),
        Err(_) => true,
    }
}

/// Terminates all tracked children when dropped.
///
/// Held by `main` for the duration of the run.
pub struct ProcessGuard {
    children: Arc<Mutex<ChildProcesses>>,
}

impl ProcessGuard {
    pub fn new() -> Self {
        Self {
            children: ChildProcesses::global(),
        }
    }
}

impl Default for ProcessGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if let Ok(mut children) = self.children.lock() {
            children.terminate_all(Duration::from_secs(5));
        }
    }
}

/// Install the SIGINT/SIGTERM/SIGHUP handler thread.
///
/// The thread terminates tracked children and exits with `128 + signal`.
pub fn init_signal_handlers() -> Result<(), std::io::Error> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;

    std::thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            tracing::warn!("Received signal {}, stopping package manager", sig);
            if let Ok(mut children) = ChildProcesses::global().lock() {
                children.terminate_all(Duration::from_secs(3));
            }
            std::process::exit(128 + sig);
        }
    });

    Ok(())
}

/// Extension trait for `std::process::Command` to tie the child to us
pub trait CommandProcessGroup {
    /// Put the child in a new process group and kill it if we die.
    fn in_new_process_group(&mut self) -> &mut Self;

    /// Kill the child if we die, keeping it in our process group.
    fn kill_on_parent_death(&mut self) -> &mut Self;
}

impl CommandProcessGroup for Command {
    fn kill_on_parent_death(&mut self) -> &mut Self {
        use std::os::unix::process::CommandExt;
        // SAFETY: the closure only calls the async-signal-safe prctl.
        unsafe {
            self.pre_exec(|| {
                if libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM) == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }
        self
    }

    fn in_new_process_group(&mut self) -> &mut Self {
        use std::os::unix::process::CommandExt;
        // SAFETY: the closure only calls async-signal-safe setpgid and prctl.
        unsafe {
            self.pre_exec(|| {
                nix::unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0))
                    .map_err(std::io::Error::from)?;
                if libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM) == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }
        self
    }
}

/// Spawn `cmd` with stderr piped, track it until it exits, and hand every
/// stderr line to `on_stderr` as it arrives.
///
/// Stdout and stdin are left as configured on `cmd`.
pub fn run_tracked_streaming<F>(cmd: &mut Command, mut on_stderr: F) -> std::io::Result<ExitStatus>
where
    F: FnMut(&str),
{
    cmd.stderr(Stdio::piped());
    let mut child = cmd.kill_on_parent_death().spawn()?;
    let pid = child.id();

    if let Ok(mut children) = ChildProcesses::global().lock() {
        children.track(pid);
    }

    if let Some(stderr) = child.stderr.take() {
        for line in BufReader::new(stderr).split(b'\n') {
            match line {
                Ok(bytes) => on_stderr(String::from_utf8_lossy(&bytes).trim_end()),
                Err(e) => {
                    tracing::debug!("Stopped reading stderr of {}: {}", pid, e);
                    break;
                }
            }
        }
    }

    // always reap the child, even if reading stderr failed
    let status = child.wait();

    if let Ok(mut children) = ChildProcesses::global().lock() {
        children.untrack(pid);
    }

    status
}
