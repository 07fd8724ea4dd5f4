//! # Server
//!
//! Runs the authoritative [`World`] on a dedicated thread named `server`.
//!
//! ## Start/stop handshake
//!
//! ```text
//! main thread                         server thread
//! -----------                         -------------
//! start()  spawn ──────────────────>  World::create()
//!          wait(started) <────────── phase = Running | Failed, notify started
//!                                     loop while running { update; sleep }
//! shutdown() running = false ──────>  (sees flag at next iteration)
//!          wait(stopped, timeout) <── phase = Stopped, notify stopped
//!          join, or detach on timeout
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use parking_lot::{Condvar, Mutex};
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::error::{EngineError, EngineResult};
use crate::frame::FrameClock;
use crate::world::World;

/// Lifecycle of the server thread, guarded by the handshake mutex.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Phase {
    /// No thread, or a thread not yet reporting.
    Starting,
    /// The world exists and the tick loop runs.
    Running,
    /// Start-up failed; the thread is exiting.
    Failed(String),
    /// The tick loop has ended.
    Stopped,
}

/// State shared with the server thread.
struct Shared {
    phase: Mutex<Phase>,
    started: Condvar,
    stopped: Condvar,
    /// Cleared to ask the thread to stop. Checked once per tick.
    running: AtomicBool,
    /// Completed world updates.
    ticks: AtomicU64,
}

impl Shared {
    fn new(phase: Phase, running: bool) -> Self {
        Self {
            phase: Mutex::new(phase),
            started: Condvar::new(),
            stopped: Condvar::new(),
            running: AtomicBool::new(running),
            ticks: AtomicU64::new(0),
        }
    }

    fn report(&self, phase: Phase, condvar: &Condvar) {
        let mut guard = self.phase.lock();
        *guard = phase;
        condvar.notify_all();
    }
}

/// Handle to the server thread.
pub struct Server {
    config: ServerConfig,
    shared: Arc<Shared>,
    thread: Option<JoinHandle<()>>,
}

impl Server {
    /// Creates a stopped server.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            shared: Arc::new(Shared::new(Phase::Stopped, false)),
            thread: None,
        }
    }

    /// Spawns the server thread and blocks until it reports started or
    /// failed.
    ///
    /// # Errors
    ///
    /// [`EngineError::ServerAlreadyRunning`] if a thread is attached,
    /// [`EngineError::ServerSpawn`] if the thread cannot be spawned,
    /// [`EngineError::ServerStartFailed`] if the world could not be created.
    pub fn start(&mut self) -> EngineResult<()> {
        if self.thread.is_some() {
            return Err(EngineError::ServerAlreadyRunning);
        }

        // Fresh state per run: a detached thread keeps its own cleared flag
        self.shared = Arc::new(Shared::new(Phase::Starting, true));

        let shared = Arc::clone(&self.shared);
        let config = self.config.clone();
        let handle = thread::Builder::new()
            .name("server".to_owned())
            .spawn(move || server_main(&shared, &config))
            .map_err(|err| {
                self.shared.running.store(false, Ordering::Release);
                *self.shared.phase.lock() = Phase::Stopped;
                EngineError::ServerSpawn(err)
            })?;

        let mut phase = self.shared.phase.lock();
        while *phase == Phase::Starting {
            self.shared.started.wait(&mut phase);
        }

        if let Phase::Failed(reason) = &*phase {
            let reason = reason.clone();
            drop(phase);
            error!(%reason, "the server failed to start");
            // The thread exits right after reporting
            if handle.join().is_err() {
                error!("server thread panicked");
            }
            return Err(EngineError::ServerStartFailed { reason });
        }
        drop(phase);

        self.thread = Some(handle);
        Ok(())
    }

    /// Stops the server thread.
    ///
    /// Waits up to the configured join timeout for the thread to report
    /// stopped, then joins it. On timeout the thread is detached. Does
    /// nothing if no thread is attached.
    pub fn shutdown(&mut self) {
        self.shared.running.store(false, Ordering::Release);

        let Some(handle) = self.thread.take() else {
            return;
        };

        let deadline = Instant::now() + self.config.join_timeout();
        let mut phase = self.shared.phase.lock();
        while *phase != Phase::Stopped {
            if self.shared.stopped.wait_until(&mut phase, deadline).timed_out() {
                break;
            }
        }
        let stopped = *phase == Phase::Stopped;
        drop(phase);

        if stopped {
            if handle.join().is_err() {
                error!("server thread panicked");
            }
            info!("server stopped");
        } else {
            warn!(
                timeout_ms = self.config.join_timeout_ms,
                "server thread did not stop in time, detaching it"
            );
            drop(handle);
        }
    }

    /// Checks whether the server thread runs its tick loop.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Number of world updates completed since the last [`Server::start`].
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.shared.ticks.load(Ordering::Relaxed)
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn server_main(shared: &Shared, config: &ServerConfig) {
    info!("starting server");

    let mut world = match World::create() {
        Ok(world) => world,
        Err(err) => {
            shared.running.store(false, Ordering::Release);
            shared.report(Phase::Failed(err.to_string()), &shared.started);
            return;
        }
    };
    shared.report(Phase::Running, &shared.started);

    let mut clock = FrameClock::new(config.tick_interval());
    while shared.running.load(Ordering::Acquire) {
        let delta_t = clock.begin_frame();
        if let Err(err) = world.update(delta_t) {
            error!(error = %err, "world update failed, stopping server");
            shared.running.store(false, Ordering::Release);
            break;
        }
        shared.ticks.fetch_add(1, Ordering::Relaxed);
        clock.end_frame();
    }

    info!(ticks = clock.frame_count(), "shutting down server");
    world.destroy();

    shared.report(Phase::Stopped, &shared.stopped);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast_config() -> ServerConfig {
        ServerConfig {
            tick_interval_ms: 5,
            join_timeout_ms: 2000,
        }
    }

    #[test]
    fn test_start_and_shutdown() {
        let mut server = Server::new(fast_config());
        assert!(!server.is_running());

        server.start().unwrap();
        assert!(server.is_running());

        let deadline = Instant::now() + Duration::from_secs(2);
        while server.tick_count() == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(server.tick_count() > 0);

        server.shutdown();
        assert!(!server.is_running());
        assert!(server.thread.is_none());
    }

    #[test]
    fn test_double_start_fails() {
        let mut server = Server::new(fast_config());
        server.start().unwrap();
        assert!(matches!(server.start(), Err(EngineError::ServerAlreadyRunning)));
        server.shutdown();
    }

    #[test]
    fn test_restart_after_shutdown() {
        let mut server = Server::new(fast_config());
        server.start().unwrap();
        server.shutdown();

        server.start().unwrap();
        assert!(server.is_running());
    }

    #[test]
    fn test_shutdown_without_start_is_noop() {
        let mut server = Server::new(fast_config());
        server.shutdown();
        server.shutdown();
        assert!(!server.is_running());
    }

    #[test]
    fn test_slow_thread_is_detached() {
        let mut server = Server::new(ServerConfig {
            tick_interval_ms: 500,
            join_timeout_ms: 10,
        });
        server.start().unwrap();

        // Give the loop time to enter its first sleep
        thread::sleep(Duration::from_millis(20));

        let start = Instant::now();
        server.shutdown();
        assert!(start.elapsed() < Duration::from_millis(400));
        assert!(!server.is_running());
    }

    #[test]
    fn test_restart_after_detach_runs_one_loop() {
        let mut server = Server::new(ServerConfig {
            tick_interval_ms: 100,
            join_timeout_ms: 5,
        });
        server.start().unwrap();
        thread::sleep(Duration::from_millis(20));

        server.shutdown();
        assert!(server.thread.is_none());
        let detached = Arc::clone(&server.shared);
        let detached_ticks = detached.ticks.load(Ordering::Relaxed);

        server.start().unwrap();
        thread::sleep(Duration::from_millis(1000));

        // The detached loop exits after its current tick instead of resuming
        assert!(!detached.running.load(Ordering::Acquire));
        assert!(detached.ticks.load(Ordering::Relaxed) <= detached_ticks + 1);
        assert_eq!(*detached.phase.lock(), Phase::Stopped);

        // One loop at 100 ms for one second
        let ticks = server.tick_count();
        assert!((5..=13).contains(&ticks), "{ticks} ticks in one second");

        server.shutdown();
    }
}
