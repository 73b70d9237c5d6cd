use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::time::{sleep, timeout};

use crate::{
    append_shutdown_log, append_startup_log,
    backend_config::BackendTimings,
    backend_http::{BackendHttp, ProbeOutcome, ReqwestBackendHttp},
    backend_path,
    launch_plan::LaunchPlan,
    process_control::{ProcessLauncher, SystemProcessLauncher, WorkerExit, WorkerProcess},
    worker_state::{ExitKind, StartDecision, SupervisorError, WorkerLifecycle, WorkerState},
    BackendBridgeState, WORKER_EXIT_POLL_INTERVAL,
};

pub(crate) type DesktopSupervisor = BackendSupervisor<ReqwestBackendHttp, SystemProcessLauncher>;

/// Called when the worker dies on its own after it was Ready.
pub(crate) type ExitListener = Box<dyn Fn(WorkerExit) + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct BackendSupervisor<H, L> {
    plan: LaunchPlan,
    timings: BackendTimings,
    http: H,
    launcher: Arc<L>,
    process: Mutex<Option<Box<dyn WorkerProcess>>>,
    executable: Mutex<Option<PathBuf>>,
    lifecycle: Mutex<WorkerLifecycle>,
    exit_listener: Mutex<Option<ExitListener>>,
}

impl<H: BackendHttp, L: ProcessLauncher> BackendSupervisor<H, L> {
    pub(crate) fn new(plan: LaunchPlan, timings: BackendTimings, http: H, launcher: L) -> Self {
        Self {
            plan,
            timings,
            http,
            launcher: Arc::new(launcher),
            process: Mutex::new(None),
            executable: Mutex::new(None),
            lifecycle: Mutex::new(WorkerLifecycle::default()),
            exit_listener: Mutex::new(None),
        }
    }

    pub(crate) fn set_exit_listener(&self, listener: ExitListener) {
        *lock(&self.exit_listener) = Some(listener);
    }

    pub(crate) fn state(&self) -> WorkerState {
        lock(&self.lifecycle).state()
    }

    pub(crate) fn retry_count(&self) -> u32 {
        lock(&self.lifecycle).retry_count()
    }

    pub(crate) fn is_running(&self) -> bool {
        lock(&self.process).is_some()
    }

    pub(crate) fn bridge_state(&self) -> BackendBridgeState {
        let running = self.is_running();
        let lifecycle = lock(&self.lifecycle);
        BackendBridgeState {
            state: lifecycle.state(),
            running,
            retry_count: lifecycle.retry_count(),
            last_exit_code: lifecycle.last_exit_code(),
        }
    }

    /// Launches the worker and waits until its health endpoint answers.
    pub(crate) async fn start(self: &Arc<Self>) -> Result<(), SupervisorError> {
        let handle_alive = self.is_running();
        if lock(&self.lifecycle).begin_start(handle_alive)? == StartDecision::AlreadyReady {
            return Ok(());
        }

        let result = self.launch_and_wait().await;
        let mut lifecycle = lock(&self.lifecycle);
        match &result {
            Ok(()) => {
                lifecycle.mark_ready();
                append_startup_log(&format!(
                    "backend ready after {} failed health probe(s)",
                    lifecycle.retry_count()
                ));
            }
            Err(error) => {
                lifecycle.mark_failed();
                tracing::error!("backend startup failed: {error}");
            }
        }
        result
    }

    async fn launch_and_wait(self: &Arc<Self>) -> Result<(), SupervisorError> {
        let executable = self.plan.location.resolve()?;
        self.discard_stale_process();

        let process = self
            .launcher
            .launch(&self.plan, &executable)
            .map_err(|source| SupervisorError::Spawn {
                path: executable.clone(),
                source,
            })?;
        let pid = process.id();
        append_startup_log(&format!(
            "spawned backend pid {pid}: {:?}",
            self.plan.debug_command(&executable)
        ));
        *lock(&self.process) = Some(process);
        *lock(&self.executable) = Some(executable);
        tokio::spawn(Arc::clone(self).watch_exit(pid));

        sleep(self.timings.initial_delay).await;

        let max_retries = self.timings.max_retries.max(1);
        for attempt in 1..=max_retries {
            if let Some(exit) = self.reap_exited(pid) {
                self.handle_exit(exit);
            }
            if !self.is_running() {
                return Err(SupervisorError::WorkerExited {
                    code: lock(&self.lifecycle).last_exit_code(),
                });
            }

            let outcome = timeout(self.timings.probe_timeout, self.http.check_health())
                .await
                .unwrap_or_else(|_| ProbeOutcome::Unhealthy("health probe timed out".to_string()));
            match outcome {
                ProbeOutcome::Healthy => return Ok(()),
                ProbeOutcome::Unhealthy(reason) => {
                    let retries = lock(&self.lifecycle).record_failed_probe();
                    append_startup_log(&format!(
                        "health probe {attempt}/{max_retries} failed ({reason}); retries so far: {retries}"
                    ));
                }
            }

            if attempt < max_retries {
                sleep(self.timings.poll_interval).await;
            }
        }

        Err(SupervisorError::StartupTimeout {
            attempts: max_retries,
        })
    }

    /// A worker left over from a failed start must not coexist with a new one.
    fn discard_stale_process(&self) {
        let Some(mut stale) = lock(&self.process).take() else {
            return;
        };
        append_startup_log(&format!("terminating stale backend pid {}", stale.id()));
        if let Err(error) = stale.terminate() {
            tracing::warn!("failed to terminate stale backend: {error}");
        }
    }

    /// Clears the handle if the worker with `pid` has exited.
    fn reap_exited(&self, pid: u32) -> Option<WorkerExit> {
        let mut guard = lock(&self.process);
        let process = guard.as_mut().filter(|process| process.id() == pid)?;
        match process.poll_exit() {
            Ok(Some(exit)) => {
                *guard = None;
                Some(exit)
            }
            Ok(None) => None,
            Err(error) => {
                tracing::warn!("failed to poll backend pid {pid}: {error}");
                None
            }
        }
    }

    fn handle_exit(&self, exit: WorkerExit) {
        let kind = lock(&self.lifecycle).observe_exit(exit.code);
        match kind {
            ExitKind::Unexpected => {
                tracing::warn!("backend exited unexpectedly with code {:?}", exit.code);
                if let Some(listener) = lock(&self.exit_listener).as_ref() {
                    listener(exit);
                }
            }
            ExitKind::DuringStartup => {
                tracing::warn!("backend exited during startup with code {:?}", exit.code);
            }
            ExitKind::Expected => {
                append_shutdown_log(&format!("backend exited with code {:?}", exit.code));
            }
        }
    }

    async fn watch_exit(self: Arc<Self>, pid: u32) {
        loop {
            sleep(WORKER_EXIT_POLL_INTERVAL).await;
            let tracked = lock(&self.process)
                .as_ref()
                .is_some_and(|process| process.id() == pid);
            if !tracked {
                return;
            }
            if let Some(exit) = self.reap_exited(pid) {
                self.handle_exit(exit);
                return;
            }
        }
    }

    /// Graceful request, then forced termination. Never fails and never
    /// outlives the cleanup ceiling.
    pub(crate) async fn shutdown(&self) {
        let ceiling = self.timings.cleanup_timeout;
        if timeout(ceiling, self.shutdown_sequence()).await.is_err() {
            append_shutdown_log(&format!(
                "backend cleanup exceeded {}ms; abandoning it",
                ceiling.as_millis()
            ));
        }
    }

    async fn shutdown_sequence(&self) {
        if !self.is_running() {
            append_shutdown_log("no backend process to stop");
            return;
        }
        if !lock(&self.lifecycle).begin_terminate() {
            append_shutdown_log("backend shutdown already in progress");
            return;
        }

        match timeout(self.timings.shutdown_request_timeout, self.http.request_shutdown()).await {
            Ok(Ok(status)) => {
                append_shutdown_log(&format!("graceful shutdown answered with HTTP {status}"))
            }
            Ok(Err(reason)) => append_shutdown_log(&format!("graceful shutdown failed: {reason}")),
            Err(_) => append_shutdown_log(&format!(
                "graceful shutdown timed out after {}ms",
                self.timings.shutdown_request_timeout.as_millis()
            )),
        }

        self.force_terminate().await;
    }

    /// The kill runs on the blocking pool so the cleanup ceiling can still
    /// abandon it when the OS call stalls.
    async fn force_terminate(&self) {
        let executable_name = lock(&self.executable)
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(backend_path::executable_file_name);
        let process = lock(&self.process).take();
        let launcher = Arc::clone(&self.launcher);
        let name = executable_name.clone();
        let exit = tokio::task::spawn_blocking(move || launcher.force_terminate(&name, process))
            .await
            .unwrap_or_else(|error| {
                append_shutdown_log(&format!("forced termination task failed: {error}"));
                None
            });
        append_shutdown_log(&format!(
            "forced termination of {executable_name} done (exit {:?})",
            exit.and_then(|exit| exit.code)
        ));
        lock(&self.lifecycle).mark_terminated(exit.and_then(|exit| exit.code));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{backend_path::BackendLocation, env_loader::EnvEntries};
    use std::{
        collections::VecDeque,
        io,
        path::Path,
        sync::atomic::{AtomicU32, Ordering},
        time::Duration,
    };
    use tokio::time::Instant;

    #[derive(Clone, Copy)]
    enum ShutdownReply {
        Status(u16),
        FailAfter(Duration),
        Hang,
    }

    struct FakeHttp {
        health: Mutex<VecDeque<ProbeOutcome>>,
        health_calls: AtomicU32,
        shutdown: ShutdownReply,
        shutdown_calls: AtomicU32,
    }

    impl FakeHttp {
        fn new(health: Vec<ProbeOutcome>, shutdown: ShutdownReply) -> Self {
            Self {
                health: Mutex::new(health.into()),
                health_calls: AtomicU32::new(0),
                shutdown,
                shutdown_calls: AtomicU32::new(0),
            }
        }
    }

    impl BackendHttp for FakeHttp {
        async fn check_health(&self) -> ProbeOutcome {
            self.health_calls.fetch_add(1, Ordering::SeqCst);
            lock(&self.health)
                .pop_front()
                .unwrap_or_else(|| ProbeOutcome::Unhealthy("connection refused".to_string()))
        }

        async fn request_shutdown(&self) -> Result<u16, String> {
            self.shutdown_calls.fetch_add(1, Ordering::SeqCst);
            match self.shutdown {
                ShutdownReply::Status(status) => Ok(status),
                ShutdownReply::FailAfter(delay) => {
                    sleep(delay).await;
                    Err("aborted".to_string())
                }
                ShutdownReply::Hang => std::future::pending().await,
            }
        }
    }

    type ExitSlot = Arc<Mutex<Option<WorkerExit>>>;

    struct FakeWorker {
        pid: u32,
        exit: ExitSlot,
    }

    impl WorkerProcess for FakeWorker {
        fn id(&self) -> u32 {
            self.pid
        }

        fn poll_exit(&mut self) -> io::Result<Option<WorkerExit>> {
            Ok(*lock(&self.exit))
        }

        fn terminate(&mut self) -> io::Result<Option<WorkerExit>> {
            let mut exit = lock(&self.exit);
            Ok(Some(*exit.get_or_insert(WorkerExit { code: None })))
        }
    }

    #[derive(Default)]
    struct FakeLauncher {
        next_pid: AtomicU32,
        exits: Mutex<Vec<ExitSlot>>,
        fail_spawn: bool,
        kill_delay: Option<Duration>,
        kills: Mutex<Vec<(String, bool, Instant)>>,
    }

    impl FakeLauncher {
        fn last_exit_slot(&self) -> ExitSlot {
            lock(&self.exits).last().cloned().expect("a worker was launched")
        }
    }

    impl ProcessLauncher for Arc<FakeLauncher> {
        fn launch(&self, _plan: &LaunchPlan, _executable: &Path) -> io::Result<Box<dyn WorkerProcess>> {
            if self.fail_spawn {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            let exit = ExitSlot::default();
            lock(&self.exits).push(Arc::clone(&exit));
            Ok(Box::new(FakeWorker {
                pid: 100 + self.next_pid.fetch_add(1, Ordering::SeqCst),
                exit,
            }))
        }

        fn force_terminate(
            &self,
            executable_name: &str,
            tracked: Option<Box<dyn WorkerProcess>>,
        ) -> Option<WorkerExit> {
            lock(&self.kills).push((executable_name.to_string(), tracked.is_some(), Instant::now()));
            if let Some(delay) = self.kill_delay {
                // Stands in for a taskkill that never returns promptly.
                std::thread::sleep(delay);
            }
            tracked.and_then(|mut process| process.terminate().ok().flatten())
        }
    }

    struct Harness {
        _dir: tempfile::TempDir,
        supervisor: Arc<BackendSupervisor<Arc<FakeHttp>, Arc<FakeLauncher>>>,
        http: Arc<FakeHttp>,
        launcher: Arc<FakeLauncher>,
    }

    impl BackendHttp for Arc<FakeHttp> {
        async fn check_health(&self) -> ProbeOutcome {
            self.as_ref().check_health().await
        }

        async fn request_shutdown(&self) -> Result<u16, String> {
            self.as_ref().request_shutdown().await
        }
    }

    fn timings() -> BackendTimings {
        BackendTimings {
            initial_delay: Duration::from_secs(3),
            poll_interval: Duration::from_millis(1_500),
            max_retries: 20,
            probe_timeout: Duration::from_secs(1),
            shutdown_request_timeout: Duration::from_secs(2),
            cleanup_timeout: Duration::from_secs(8),
        }
    }

    fn harness_with(
        health: Vec<ProbeOutcome>,
        shutdown: ShutdownReply,
        timings: BackendTimings,
        launcher: FakeLauncher,
    ) -> Harness {
        let dir = tempfile::tempdir().expect("tempdir");
        let executable = dir.path().join("SondaClickBackend.exe");
        std::fs::write(&executable, b"").expect("touch executable");
        let plan = LaunchPlan {
            location: BackendLocation {
                dev_path: dir.path().join("missing"),
                packaged_path: None,
                override_path: Some(executable),
                packaged: false,
            },
            args: Vec::new(),
            env: EnvEntries::new(),
            log_path: None,
        };
        let http = Arc::new(FakeHttp::new(health, shutdown));
        let launcher = Arc::new(launcher);
        let supervisor = Arc::new(BackendSupervisor::new(
            plan,
            timings,
            Arc::clone(&http),
            Arc::clone(&launcher),
        ));
        Harness {
            _dir: dir,
            supervisor,
            http,
            launcher,
        }
    }

    fn harness(health: Vec<ProbeOutcome>, shutdown: ShutdownReply) -> Harness {
        harness_with(health, shutdown, timings(), FakeLauncher::default())
    }

    fn unhealthy(count: usize) -> Vec<ProbeOutcome> {
        vec![ProbeOutcome::Unhealthy("HTTP 500".to_string()); count]
    }

    #[tokio::test(start_paused = true)]
    async fn start_resolves_after_five_failed_probes_then_success() {
        let mut health = unhealthy(5);
        health.push(ProbeOutcome::Healthy);
        let h = harness(health, ShutdownReply::Status(200));
        let started = Instant::now();

        h.supervisor.start().await.expect("start should succeed");

        assert_eq!(h.supervisor.retry_count(), 5);
        assert_eq!(h.supervisor.state(), WorkerState::Ready);
        let expected = Duration::from_secs(3) + Duration::from_millis(1_500) * 5;
        assert!(started.elapsed() >= expected);
        assert!(started.elapsed() < expected + Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn start_times_out_after_exactly_the_retry_bound() {
        let h = harness(Vec::new(), ShutdownReply::Status(200));

        let error = h.supervisor.start().await.expect_err("start should fail");

        assert!(matches!(error, SupervisorError::StartupTimeout { attempts: 20 }));
        assert_eq!(h.http.health_calls.load(Ordering::SeqCst), 20);
        assert_eq!(h.supervisor.state(), WorkerState::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn start_fails_fast_when_executable_is_missing() {
        let h = harness(Vec::new(), ShutdownReply::Status(200));
        let mut plan = h.supervisor.plan.clone();
        plan.location.override_path = Some(PathBuf::from("/definitely/missing/backend"));
        let supervisor = Arc::new(BackendSupervisor::new(
            plan,
            timings(),
            Arc::clone(&h.http),
            Arc::clone(&h.launcher),
        ));

        let error = supervisor.start().await.expect_err("start should fail");

        assert!(matches!(error, SupervisorError::ExecutableNotFound { .. }));
        assert!(lock(&h.launcher.exits).is_empty());
        assert_eq!(h.http.health_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_reports_spawn_error_and_keeps_no_handle() {
        let launcher = FakeLauncher {
            fail_spawn: true,
            ..FakeLauncher::default()
        };
        let h = harness_with(Vec::new(), ShutdownReply::Status(200), timings(), launcher);

        let error = h.supervisor.start().await.expect_err("start should fail");

        assert!(matches!(error, SupervisorError::Spawn { .. }));
        assert!(!h.supervisor.is_running());
        assert_eq!(h.supervisor.state(), WorkerState::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn start_rejects_when_worker_exits_before_ready() {
        let h = harness(Vec::new(), ShutdownReply::Status(200));
        let supervisor = Arc::clone(&h.supervisor);
        let pending = tokio::spawn(async move { supervisor.start().await });

        sleep(Duration::from_secs(1)).await;
        *lock(&h.launcher.last_exit_slot()) = Some(WorkerExit { code: Some(2) });

        let error = pending.await.expect("join").expect_err("start should fail");
        assert!(matches!(error, SupervisorError::WorkerExited { code: Some(2) }));
        assert!(!h.supervisor.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_start_is_rejected_while_starting() {
        let h = harness(vec![ProbeOutcome::Healthy], ShutdownReply::Status(200));
        let supervisor = Arc::clone(&h.supervisor);
        let first = tokio::spawn(async move { supervisor.start().await });
        sleep(Duration::from_millis(10)).await;

        let second = h.supervisor.start().await;

        assert!(matches!(second, Err(SupervisorError::Busy(WorkerState::Starting))));
        first.await.expect("join").expect("first start succeeds");
        assert_eq!(lock(&h.launcher.exits).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_noop_when_already_ready() {
        let h = harness(vec![ProbeOutcome::Healthy], ShutdownReply::Status(200));
        h.supervisor.start().await.expect("first start");
        h.supervisor.start().await.expect("second start");
        assert_eq!(lock(&h.launcher.exits).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unexpected_exit_clears_handle_and_notifies_listener() {
        let h = harness(vec![ProbeOutcome::Healthy], ShutdownReply::Status(200));
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        h.supervisor
            .set_exit_listener(Box::new(move |exit| lock(&sink).push(exit.code)));
        h.supervisor.start().await.expect("start");

        *lock(&h.launcher.last_exit_slot()) = Some(WorkerExit { code: Some(1) });
        sleep(WORKER_EXIT_POLL_INTERVAL * 2).await;

        assert!(!h.supervisor.is_running());
        assert_eq!(h.supervisor.state(), WorkerState::Terminated);
        assert_eq!(*lock(&observed), vec![Some(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn worker_exit_after_startup_timeout_does_not_notify_listener() {
        let h = harness(Vec::new(), ShutdownReply::Status(200));
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        h.supervisor
            .set_exit_listener(Box::new(move |exit| lock(&sink).push(exit.code)));
        h.supervisor.start().await.expect_err("start should time out");

        *lock(&h.launcher.last_exit_slot()) = Some(WorkerExit { code: Some(1) });
        sleep(WORKER_EXIT_POLL_INTERVAL * 2).await;

        assert!(!h.supervisor.is_running());
        assert_eq!(h.supervisor.state(), WorkerState::Failed);
        assert!(lock(&observed).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_without_process_resolves_immediately() {
        let h = harness(Vec::new(), ShutdownReply::Hang);
        let started = Instant::now();

        h.supervisor.shutdown().await;

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(h.http.shutdown_calls.load(Ordering::SeqCst), 0);
        assert!(lock(&h.launcher.kills).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_force_kills_after_graceful_acknowledgement() {
        let h = harness(vec![ProbeOutcome::Healthy], ShutdownReply::Status(503));
        h.supervisor.start().await.expect("start");

        h.supervisor.shutdown().await;

        let kills = lock(&h.launcher.kills);
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].0, "SondaClickBackend.exe");
        assert!(kills[0].1);
        assert!(!h.supervisor.is_running());
        assert_eq!(h.supervisor.state(), WorkerState::Terminated);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_kills_promptly_after_request_timeout() {
        let h = harness(
            vec![ProbeOutcome::Healthy],
            ShutdownReply::FailAfter(Duration::from_secs(5)),
        );
        h.supervisor.start().await.expect("start");
        let started = Instant::now();

        h.supervisor.shutdown().await;

        let kill_at = lock(&h.launcher.kills)[0].2;
        assert!(kill_at - started <= Duration::from_millis(2_500));
        assert!(started.elapsed() < Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_never_outlives_cleanup_ceiling() {
        let mut slow = timings();
        slow.shutdown_request_timeout = Duration::from_secs(60);
        let h = harness_with(
            vec![ProbeOutcome::Healthy],
            ShutdownReply::Hang,
            slow,
            FakeLauncher::default(),
        );
        h.supervisor.start().await.expect("start");
        let started = Instant::now();

        h.supervisor.shutdown().await;

        assert!(started.elapsed() >= Duration::from_secs(8));
        assert!(started.elapsed() < Duration::from_millis(8_050));
    }

    // Real time: paused clocks do not advance while a blocking task runs.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn shutdown_abandons_stalled_kill_at_cleanup_ceiling() {
        let fast = BackendTimings {
            initial_delay: Duration::from_millis(10),
            poll_interval: Duration::from_millis(10),
            max_retries: 3,
            probe_timeout: Duration::from_millis(100),
            shutdown_request_timeout: Duration::from_millis(50),
            cleanup_timeout: Duration::from_millis(200),
        };
        let launcher = FakeLauncher {
            kill_delay: Some(Duration::from_millis(1_500)),
            ..FakeLauncher::default()
        };
        let h = harness_with(
            vec![ProbeOutcome::Healthy],
            ShutdownReply::Status(200),
            fast,
            launcher,
        );
        h.supervisor.start().await.expect("start");
        let started = std::time::Instant::now();

        h.supervisor.shutdown().await;

        assert!(started.elapsed() < Duration::from_millis(1_000));
        assert_eq!(lock(&h.launcher.kills).len(), 1);
        assert!(!h.supervisor.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_unexpected_exit_launches_fresh_worker() {
        let h = harness(
            vec![ProbeOutcome::Healthy, ProbeOutcome::Healthy],
            ShutdownReply::Status(200),
        );
        h.supervisor.start().await.expect("start");
        *lock(&h.launcher.last_exit_slot()) = Some(WorkerExit { code: Some(9) });
        sleep(WORKER_EXIT_POLL_INTERVAL * 2).await;

        h.supervisor.start().await.expect("restart");

        assert_eq!(lock(&h.launcher.exits).len(), 2);
        assert_eq!(h.supervisor.bridge_state().last_exit_code, Some(9));
        assert!(h.supervisor.bridge_state().running);
    }
}
