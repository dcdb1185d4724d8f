//! Flow driver: repeated passes over a caller-owned grid.
//!
//! [`FlowSolver`] holds a validated [`FlowConfig`], an optional dedicated
//! thread pool, and the scratch buffers the parallel backend reuses from
//! pass to pass. Pass N+1 always consumes pass N's output; there is no
//! convergence detection.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, log_enabled, trace, warn, Level};
use rayon::{ThreadPool, ThreadPoolBuilder};
use rill_core::{AccumulationMode, Backend, ConfigError, FlowConfig, GridError, GridSize};

use crate::parallel::{DoubleBuffer, SharedWater};
use crate::rule::PassStats;
use crate::sequential::sequential_pass;

/// Outcome of a multi-pass run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Passes actually executed.
    pub passes: usize,
    /// Counters summed over every pass.
    pub stats: PassStats,
}

impl RunSummary {
    fn record(&mut self, stats: PassStats) {
        self.passes += 1;
        self.stats = self.stats.merge(stats);
    }
}

/// Run `iterations` passes of `backend` with the default epsilon on rayon's
/// global pool.
///
/// # Errors
///
/// Returns [`GridError`] before touching `water` if `size < 3` or either
/// buffer does not hold `size * size` cells.
pub fn run(
    size: usize,
    height: &[f32],
    water: &mut [f32],
    iterations: usize,
    backend: Backend,
) -> Result<(), GridError> {
    FlowSolver::for_backend(backend)
        .run(size, height, water, iterations)
        .map(|_| ())
}

/// Drives flow passes with a fixed configuration.
pub struct FlowSolver {
    config: FlowConfig,
    pool: Option<ThreadPool>,
    double: DoubleBuffer,
    shared: SharedWater,
}

impl std::fmt::Debug for FlowSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowSolver")
            .field("config", &self.config)
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}

impl FlowSolver {
    /// Validate `config` and build the solver.
    ///
    /// When `worker_count` is set, a dedicated pool of that many threads is
    /// built; otherwise parallel passes run on rayon's global pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation fails or the pool cannot be
    /// built.
    pub fn new(config: FlowConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let pool = match config.worker_count {
            Some(n) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("rill-flow-{i}"))
                    .build()
                    .map_err(|e| ConfigError::ThreadPool {
                        reason: e.to_string(),
                    })?,
            ),
            None => None,
        };
        Ok(Self::with_pool(config, pool))
    }

    /// Solver for `backend` with the default epsilon on the global pool.
    ///
    /// Infallible: the defaults always validate.
    pub fn for_backend(backend: Backend) -> Self {
        Self::with_pool(FlowConfig::with_backend(backend), None)
    }

    fn with_pool(config: FlowConfig, pool: Option<ThreadPool>) -> Self {
        Self {
            config,
            pool,
            double: DoubleBuffer::default(),
            shared: SharedWater::default(),
        }
    }

    /// The configuration this solver was built with.
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// One pass.
    pub fn step(
        &mut self,
        size: usize,
        height: &[f32],
        water: &mut [f32],
    ) -> Result<PassStats, GridError> {
        self.run(size, height, water, 1).map(|s| s.stats)
    }

    /// Exactly `iterations` passes.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] before touching `water` if `size < 3` or either
    /// buffer does not hold `size * size` cells.
    pub fn run(
        &mut self,
        size: usize,
        height: &[f32],
        water: &mut [f32],
        iterations: usize,
    ) -> Result<RunSummary, GridError> {
        self.run_inner(size, height, water, iterations, None)
    }

    /// Like [`run`](Self::run), but checks `cancel` before every pass and
    /// stops once it is set. A pass in flight always completes.
    pub fn run_cancellable(
        &mut self,
        size: usize,
        height: &[f32],
        water: &mut [f32],
        iterations: usize,
        cancel: &AtomicBool,
    ) -> Result<RunSummary, GridError> {
        self.run_inner(size, height, water, iterations, Some(cancel))
    }

    fn run_inner(
        &mut self,
        size: usize,
        height: &[f32],
        water: &mut [f32],
        iterations: usize,
        cancel: Option<&AtomicBool>,
    ) -> Result<RunSummary, GridError> {
        let grid = GridSize::new(size)?;
        grid.check_fields(height, water)?;

        let backend = self.config.backend;
        let epsilon = self.config.epsilon;
        let mass_before = log_enabled!(Level::Debug).then(|| total_mass(water));
        debug!("flow run: backend={backend:?} size={size} iterations={iterations}");
        if backend == Backend::Parallel(AccumulationMode::DirectAccumulate) {
            warn!("direct accumulation selected: concurrent updates may be lost, results are approximate");
        }

        let cancelled = || cancel.is_some_and(|c| c.load(Ordering::Acquire));
        let mut summary = RunSummary::default();
        let Self {
            pool,
            double,
            shared,
            ..
        } = self;
        let pool = pool.as_ref();

        match backend {
            Backend::Sequential => {
                for pass in 0..iterations {
                    if cancelled() {
                        break;
                    }
                    let stats = sequential_pass(&grid, height, water, epsilon);
                    trace!("pass {pass}: {stats:?}");
                    summary.record(stats);
                }
            }
            Backend::Parallel(AccumulationMode::DoubleBuffered) => {
                double.load(water);
                for pass in 0..iterations {
                    if cancelled() {
                        break;
                    }
                    let stats = install(pool, || double.pass(&grid, height, epsilon));
                    trace!("pass {pass}: {stats:?}");
                    summary.record(stats);
                }
                double.store(water);
            }
            Backend::Parallel(AccumulationMode::DirectAccumulate) => {
                shared.load(water);
                for pass in 0..iterations {
                    if cancelled() {
                        break;
                    }
                    let stats = install(pool, || shared.pass(&grid, height, epsilon));
                    trace!("pass {pass}: {stats:?}");
                    summary.record(stats);
                }
                shared.store(water);
            }
        }

        if let Some(before) = mass_before {
            debug!(
                "flow run done: passes={} sources={} snapped={} mass {before:.6} -> {:.6}",
                summary.passes,
                summary.stats.sources,
                summary.stats.snapped,
                total_mass(water)
            );
        }
        Ok(summary)
    }
}

fn install<R, F>(pool: Option<&ThreadPool>, op: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match pool {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

fn total_mass(water: &[f32]) -> f64 {
    water.iter().map(|&w| w as f64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_test_utils::{total_water, Fixture};

    const ALL_BACKENDS: [Backend; 3] = [
        Backend::Sequential,
        Backend::Parallel(AccumulationMode::DoubleBuffered),
        Backend::Parallel(AccumulationMode::DirectAccumulate),
    ];

    #[test]
    fn new_rejects_invalid_config() {
        let err = FlowSolver::new(FlowConfig {
            epsilon: f32::NAN,
            ..FlowConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEpsilon { .. }));
    }

    #[test]
    fn zero_iterations_is_a_no_op() {
        for backend in ALL_BACKENDS {
            let mut f = Fixture::random(10, 1);
            let before = f.water.clone();
            let summary = FlowSolver::for_backend(backend)
                .run(10, &f.height, &mut f.water, 0)
                .unwrap();
            assert_eq!(summary, RunSummary::default());
            assert_eq!(f.water, before, "{backend:?}");
        }
    }

    #[test]
    fn runs_exactly_the_requested_passes() {
        for backend in ALL_BACKENDS {
            let mut f = Fixture::random(10, 2);
            let summary = FlowSolver::for_backend(backend)
                .run(10, &f.height, &mut f.water, 7)
                .unwrap();
            assert_eq!(summary.passes, 7, "{backend:?}");
        }
    }

    #[test]
    fn sequential_solver_matches_free_function() {
        let base = Fixture::random(15, 4);
        let mut a = base.water.clone();
        let mut b = base.water.clone();
        FlowSolver::for_backend(Backend::Sequential)
            .run(15, &base.height, &mut a, 6)
            .unwrap();
        crate::flow_repeat(15, &base.height, &mut b, 6).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn free_run_dispatches_on_backend() {
        let base = Fixture::flat_blob(5, 1.0);
        let mut seq = base.water.clone();
        let mut par = base.water.clone();
        run(5, &base.height, &mut seq, 1, Backend::Sequential).unwrap();
        run(
            5,
            &base.height,
            &mut par,
            1,
            Backend::Parallel(AccumulationMode::DoubleBuffered),
        )
        .unwrap();
        // Gauss-Seidel lets (3,2) shed within the pass; Jacobi does not.
        assert_eq!(par[13], 0.125);
        assert_eq!(seq[13], 0.0);
    }

    #[test]
    fn cancelled_before_start_runs_nothing() {
        let cancel = AtomicBool::new(true);
        for backend in ALL_BACKENDS {
            let mut f = Fixture::random(8, 9);
            let before = f.water.clone();
            let summary = FlowSolver::for_backend(backend)
                .run_cancellable(8, &f.height, &mut f.water, 100, &cancel)
                .unwrap();
            assert_eq!(summary.passes, 0);
            assert_eq!(f.water, before);
        }
    }

    #[test]
    fn uncancelled_run_completes() {
        let cancel = AtomicBool::new(false);
        let mut f = Fixture::random(8, 9);
        let summary = FlowSolver::for_backend(Backend::Sequential)
            .run_cancellable(8, &f.height, &mut f.water, 12, &cancel)
            .unwrap();
        assert_eq!(summary.passes, 12);
    }

    #[test]
    fn custom_epsilon_is_used() {
        // A coarse epsilon snaps residuals a fine one keeps.
        let mut fine = Fixture::random(12, 21);
        let mut coarse = fine.clone();
        let run_with = |eps: f32, f: &mut Fixture| {
            FlowSolver::new(FlowConfig {
                epsilon: eps,
                ..FlowConfig::default()
            })
            .unwrap()
            .run(12, &f.height, &mut f.water, 3)
            .unwrap()
        };
        let s_fine = run_with(0.0, &mut fine);
        let s_coarse = run_with(0.5, &mut coarse);
        assert!(s_coarse.stats.snapped >= s_fine.stats.snapped);
        assert!(total_water(&coarse.water) <= total_water(&fine.water) + 1e-3);
    }

    #[test]
    fn solver_reuses_scratch_across_sizes() {
        let mut solver = FlowSolver::for_backend(Backend::Parallel(
            AccumulationMode::DoubleBuffered,
        ));
        let mut big = Fixture::flat_blob(9, 1.0);
        solver.run(9, &big.height, &mut big.water, 2).unwrap();
        let mut small = Fixture::flat_blob(3, 1.0);
        solver.run(3, &small.height, &mut small.water, 1).unwrap();
        assert_eq!(small.water[4], 0.0);
        assert_eq!(small.water[0], 0.125);
    }
}
