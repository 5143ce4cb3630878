use crate::chart::HostSnapshot;
use crate::error::{AppError, Result};
use crate::metrics::host::HostId;
use crate::metrics::monitor::{HostMonitor, MonitorSettings};
use crate::metrics::pool::WorkerPool;
use crate::probe::prober::Prober;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Host name and last reading, for list and legend rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct HostStatus {
    pub host: HostId,
    pub last_known_good: Option<f64>,
}

/// The set of monitored hosts, in the order they were added.
pub struct MonitorRegistry {
    monitors: RwLock<Vec<Arc<HostMonitor>>>,
    pool: WorkerPool,
    prober: Arc<dyn Prober>,
    settings: MonitorSettings,
    shut_down: AtomicBool,
}

impl MonitorRegistry {
    pub fn new(pool: WorkerPool, prober: Arc<dyn Prober>, settings: MonitorSettings) -> Self {
        Self {
            monitors: RwLock::new(Vec::new()),
            pool,
            prober,
            settings,
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Starts monitoring `host`.
    ///
    /// Returns `Ok(false)` if an equivalent host (ignoring case and
    /// surrounding whitespace) is already monitored.
    pub fn add(&self, host: &str) -> Result<bool> {
        let host = HostId::parse(host)?;

        // `shutdown_all` flips the flag under this lock.
        let mut monitors = self.monitors.write();
        if self.is_shut_down() {
            return Err(AppError::ShutDown);
        }
        if monitors.iter().any(|m| m.host() == &host) {
            tracing::debug!(%host, "host already monitored");
            return Ok(false);
        }

        let monitor = HostMonitor::new(host.clone(), self.prober.clone(), self.settings.clone());
        monitor.start(&self.pool).inspect_err(|e| {
            tracing::error!(%host, error = %e, "failed to start monitor");
        })?;
        monitors.push(Arc::new(monitor));

        tracing::info!(%host, hosts = monitors.len(), "host added");
        Ok(true)
    }

    /// Stops and forgets the matching monitor. Returns whether one existed.
    pub fn remove(&self, host: &str) -> bool {
        let removed = {
            let mut monitors = self.monitors.write();
            monitors
                .iter()
                .position(|m| m.host().matches(host))
                .map(|index| monitors.remove(index))
        };

        match removed {
            Some(monitor) => {
                monitor.stop();
                tracing::info!(host = %monitor.host(), "host removed");
                true
            }
            None => false,
        }
    }

    /// Active monitors in insertion order.
    pub fn list(&self) -> Vec<Arc<HostMonitor>> {
        self.monitors.read().clone()
    }

    pub fn get(&self, host: &str) -> Option<Arc<HostMonitor>> {
        self.monitors
            .read()
            .iter()
            .find(|m| m.host().matches(host))
            .cloned()
    }

    pub fn hosts(&self) -> Vec<HostStatus> {
        self.monitors
            .read()
            .iter()
            .map(|m| HostStatus {
                host: m.host().clone(),
                last_known_good: m.last_known_good(),
            })
            .collect()
    }

    /// Per-host snapshots for projection, in insertion order.
    pub fn snapshots(&self) -> Vec<HostSnapshot> {
        self.list().iter().map(|m| m.snapshot()).collect()
    }

    pub fn len(&self) -> usize {
        self.monitors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.read().is_empty()
    }

    /// Stops every monitor and tears down the worker pool.
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn shutdown_all(&self) {
        let monitors = self.monitors.write();
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }

        for monitor in monitors.iter() {
            monitor.stop();
        }
        self.pool.shutdown();
        tracing::info!(hosts = monitors.len(), "all monitors shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for MonitorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorRegistry")
            .field("hosts", &self.len())
            .field("workers", &self.pool.workers())
            .field("shut_down", &self.is_shut_down())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::monitor::Lifecycle;
    use crate::metrics::sample::Sample;
    use crate::probe::testing::ScriptedProber;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn registry(script: Vec<Sample>) -> MonitorRegistry {
        MonitorRegistry::new(
            WorkerPool::new(4).unwrap(),
            Arc::new(ScriptedProber::new(script)),
            MonitorSettings::default(),
        )
    }

    fn names(registry: &MonitorRegistry) -> Vec<String> {
        registry
            .list()
            .iter()
            .map(|m| m.host().to_string())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_is_case_insensitive_and_idempotent() {
        let registry = registry(vec![]);

        assert!(registry.add("Example.com").unwrap());
        assert!(!registry.add("  example.COM ").unwrap());

        assert_eq!(registry.len(), 1);
        assert_eq!(names(&registry), vec!["Example.com"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_preserves_insertion_order() {
        let registry = registry(vec![]);
        for host in ["b.example", "a.example", "10.0.0.1", "c.example"] {
            registry.add(host).unwrap();
        }
        registry.remove("a.example");
        registry.add("a.example").unwrap();

        assert_eq!(
            names(&registry),
            vec!["b.example", "10.0.0.1", "c.example", "a.example"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_host_rejected() {
        let registry = registry(vec![]);
        assert!(matches!(registry.add("   "), Err(AppError::InvalidHost(_))));
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_stops_monitor() {
        let registry = registry(vec![]);
        registry.add("example.com").unwrap();
        let monitor = registry.get("EXAMPLE.COM").unwrap();
        assert!(monitor.is_running());

        assert!(registry.remove("Example.Com"));
        assert!(!registry.remove("example.com"));
        assert!(registry.is_empty());
        assert_eq!(monitor.lifecycle(), Lifecycle::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_then_add_starts_fresh() {
        let registry = registry(vec![
            Sample::Latency(30.0),
            Sample::Latency(31.0),
            Sample::Latency(32.0),
        ]);
        registry.add("example.com").unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let old = registry.get("example.com").unwrap();
        assert_eq!(old.sample_snapshot().len(), 2);

        registry.remove("example.com");
        registry.add("example.com").unwrap();
        let fresh = registry.get("example.com").unwrap();

        assert!(!Arc::ptr_eq(&old, &fresh));
        assert!(fresh.sample_snapshot().len() <= 1);
        assert!(!fresh.sample_snapshot().contains(&Sample::Latency(30.0)));
        assert_eq!(old.sample_snapshot().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hosts_reports_last_known_good() {
        let registry = registry(vec![Sample::Latency(12.5)]);
        registry.add("example.com").unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        registry.add("example.org").unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let hosts = registry.hosts();
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].last_known_good, Some(12.5));
        assert_eq!(hosts[1].last_known_good, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_all_is_idempotent_and_blocks_adds() {
        let registry = registry(vec![]);
        registry.add("a.example").unwrap();
        registry.add("b.example").unwrap();
        registry.remove("b.example");

        registry.shutdown_all();
        registry.shutdown_all();

        assert!(registry.is_shut_down());
        assert!(registry.list().iter().all(|m| !m.is_running()));
        assert!(matches!(registry.add("c.example"), Err(AppError::ShutDown)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_after_individual_stop() {
        let registry = registry(vec![]);
        registry.add("a.example").unwrap();
        registry.get("a.example").unwrap().stop();

        registry.shutdown_all();
        assert_eq!(
            registry.get("a.example").unwrap().lifecycle(),
            Lifecycle::Stopped
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_add_racing_shutdown_never_leaves_a_running_monitor() {
        let registry = registry(vec![]);
        registry.add("a.example").unwrap();

        let added = std::thread::scope(|scope| {
            // Hold the list so both calls queue up behind it.
            let held = registry.monitors.write();
            let add = scope.spawn(|| registry.add("late.example"));
            std::thread::sleep(Duration::from_millis(50));
            let shutdown = scope.spawn(|| registry.shutdown_all());
            std::thread::sleep(Duration::from_millis(50));
            drop(held);

            shutdown.join().unwrap();
            add.join().unwrap()
        });

        assert!(registry.is_shut_down());
        assert!(registry.list().iter().all(|m| !m.is_running()));
        match added {
            Ok(true) => assert_eq!(
                registry.get("late.example").unwrap().lifecycle(),
                Lifecycle::Stopped
            ),
            Err(AppError::ShutDown) => assert!(registry.get("late.example").is_none()),
            other => panic!("unexpected add result: {:?}", other),
        }
        assert!(matches!(registry.add("later.example"), Err(AppError::ShutDown)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_pool_bounds_probes_across_hosts() {
        let prober = Arc::new(
            ScriptedProber::new(vec![]).with_delay(Duration::from_millis(700)),
        );
        let registry = MonitorRegistry::new(
            WorkerPool::new(2).unwrap(),
            prober.clone(),
            MonitorSettings::default(),
        );
        for i in 0..6 {
            registry.add(&format!("host{}.example", i)).unwrap();
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
        registry.shutdown_all();

        assert_eq!(prober.max_in_flight(), 2);
        assert!(prober.calls() >= 6, "got {} calls", prober.calls());
    }

    #[tokio::test]
    async fn test_add_fails_when_pool_refuses_work() {
        let pool = WorkerPool::new(1).unwrap();
        let registry = MonitorRegistry::new(
            pool.clone(),
            Arc::new(ScriptedProber::new(vec![])),
            MonitorSettings::default(),
        );
        pool.shutdown();

        assert!(matches!(registry.add("example.com"), Err(AppError::ShutDown)));
        assert!(registry.is_empty());
    }
}
