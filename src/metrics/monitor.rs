use crate::chart::HostSnapshot;
use crate::error::Result;
use crate::metrics::host::HostId;
use crate::metrics::pool::WorkerPool;
use crate::metrics::sample::{Sample, SampleBuffer, DEFAULT_CAPACITY};
use crate::probe::executor::PROCESS_GRACE;
use crate::probe::prober::Prober;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    pub interval: Duration,
    pub timeout: Duration,
    pub capacity: usize,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_PROBE_INTERVAL,
            timeout: DEFAULT_PROBE_TIMEOUT,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    Stopped,
}

struct MonitorShared {
    host: HostId,
    buffer: SampleBuffer,
    last_known_good: Mutex<Option<f64>>,
    lifecycle: Mutex<Lifecycle>,
    cancel: CancellationToken,
    ticks: AtomicU64,
}

impl MonitorShared {
    /// Records one tick's result unless the monitor has been stopped.
    ///
    /// Runs under the lifecycle lock, so once `stop` has returned no
    /// further commit can land.
    fn commit(&self, sample: Sample) -> bool {
        let lifecycle = self.lifecycle.lock();
        if *lifecycle != Lifecycle::Running {
            return false;
        }

        let sample = match sample {
            Sample::Latency(ms) if ms.is_finite() && ms >= 0.0 => sample,
            _ => Sample::Gap,
        };

        self.buffer.push(sample);
        if let Sample::Latency(ms) = sample {
            *self.last_known_good.lock() = Some(ms);
        }
        self.ticks.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// The pool went away underneath a running monitor.
    fn retire(&self) {
        let mut lifecycle = self.lifecycle.lock();
        if *lifecycle == Lifecycle::Running {
            *lifecycle = Lifecycle::Stopped;
            tracing::info!(host = %self.host, "worker pool closed, monitor stopped");
        }
    }
}

/// Periodically probes one host and keeps its bounded latency history.
///
/// Probes run one at a time: a tick that falls due while the previous probe
/// is still in flight is skipped rather than queued.
pub struct HostMonitor {
    shared: Arc<MonitorShared>,
    prober: Arc<dyn Prober>,
    settings: MonitorSettings,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl HostMonitor {
    pub fn new(host: HostId, prober: Arc<dyn Prober>, settings: MonitorSettings) -> Self {
        Self {
            shared: Arc::new(MonitorShared {
                host,
                buffer: SampleBuffer::new(settings.capacity),
                last_known_good: Mutex::new(None),
                lifecycle: Mutex::new(Lifecycle::Idle),
                cancel: CancellationToken::new(),
                ticks: AtomicU64::new(0),
            }),
            prober,
            settings,
            task: Mutex::new(None),
        }
    }

    /// Begins polling; the first probe is issued immediately.
    ///
    /// A no-op if the monitor is already running or has been stopped. Fails
    /// only when the pool refuses the polling task.
    pub fn start(&self, pool: &WorkerPool) -> Result<()> {
        let mut lifecycle = self.shared.lifecycle.lock();
        if *lifecycle != Lifecycle::Idle {
            return Ok(());
        }

        let handle = pool.spawn(poll_loop(
            self.shared.clone(),
            self.prober.clone(),
            self.settings.clone(),
            pool.clone(),
        ))?;

        *lifecycle = Lifecycle::Running;
        *self.task.lock() = Some(handle);
        tracing::info!(
            host = %self.shared.host,
            interval = ?self.settings.interval,
            timeout = ?self.settings.timeout,
            "monitor started"
        );
        Ok(())
    }

    /// Cancels future ticks and interrupts an in-flight probe.
    ///
    /// The sample history stays readable afterwards but never changes again.
    pub fn stop(&self) {
        let previous = std::mem::replace(&mut *self.shared.lifecycle.lock(), Lifecycle::Stopped);
        self.shared.cancel.cancel();
        if previous == Lifecycle::Running {
            tracing::info!(host = %self.shared.host, "monitor stopped");
        }
    }

    /// Resolves once the polling task has exited.
    pub async fn stopped(&self) {
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    pub fn host(&self) -> &HostId {
        &self.shared.host
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *self.shared.lifecycle.lock()
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle() == Lifecycle::Running
    }

    pub fn sample_snapshot(&self) -> Vec<Sample> {
        self.shared.buffer.snapshot()
    }

    pub fn last_known_good(&self) -> Option<f64> {
        *self.shared.last_known_good.lock()
    }

    /// Number of samples committed since the monitor started.
    pub fn tick_count(&self) -> u64 {
        self.shared.ticks.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> usize {
        self.settings.capacity
    }

    /// Samples and last-known-good taken together, consistent with each other.
    pub fn snapshot(&self) -> HostSnapshot {
        let _lifecycle = self.shared.lifecycle.lock();
        HostSnapshot {
            host: self.shared.host.clone(),
            samples: self.shared.buffer.snapshot(),
            last_known_good: *self.shared.last_known_good.lock(),
        }
    }
}

impl Drop for HostMonitor {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

impl std::fmt::Debug for HostMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostMonitor")
            .field("host", &self.shared.host)
            .field("lifecycle", &self.lifecycle())
            .field("samples", &self.shared.buffer.len())
            .finish_non_exhaustive()
    }
}

async fn poll_loop(
    shared: Arc<MonitorShared>,
    prober: Arc<dyn Prober>,
    settings: MonitorSettings,
    pool: WorkerPool,
) {
    let mut ticker = interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shared.cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let permit = tokio::select! {
            _ = shared.cancel.cancelled() => break,
            permit = pool.acquire() => match permit {
                Ok(permit) => permit,
                Err(_) => {
                    shared.retire();
                    break;
                }
            },
        };

        let sample = tokio::select! {
            _ = shared.cancel.cancelled() => break,
            sample = probe_with_deadline(prober.as_ref(), shared.host.as_str(), settings.timeout) => sample,
        };
        drop(permit);

        shared.commit(sample);
    }

    tracing::debug!(host = %shared.host, "polling loop exited");
}

async fn probe_with_deadline(prober: &dyn Prober, host: &str, timeout: Duration) -> Sample {
    match tokio::time::timeout(timeout + PROCESS_GRACE, prober.probe(host, timeout)).await {
        Ok(sample) => sample,
        Err(_) => {
            tracing::debug!(host, "probe exceeded its deadline");
            Sample::Gap
        }
    }
}
