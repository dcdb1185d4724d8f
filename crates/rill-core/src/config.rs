//! Flow configuration and validation.
//!
//! [`FlowConfig`] selects the execution backend and the epsilon snap
//! tolerance. [`validate()`](FlowConfig::validate) checks it once, before a
//! solver is built, so a pass never has to.

use crate::error::ConfigError;

/// Default epsilon snap tolerance.
///
/// Residual water below this depth is collapsed to exactly zero after a
/// cell sheds. Earlier GPU kernels used `1e-3`; the host-side rule uses
/// `1e-4`.
pub const DEFAULT_EPSILON: f32 = 1e-4;

/// How concurrent writes are reconciled in the parallel backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccumulationMode {
    /// All reads come from a frozen snapshot; writes land in a separate
    /// output buffer. Deterministic and independent of scheduling (a
    /// Jacobi-style update).
    DoubleBuffered,
    /// All units of work read and write one shared buffer without mutual
    /// exclusion.
    ///
    /// **Approximate.** Concurrent increments to the same cell may be lost
    /// or duplicated, so mass is not conserved exactly and results can
    /// differ between runs. Water depth stays non-negative.
    DirectAccumulate,
}

/// Which flow backend a pass runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Backend {
    /// In-place row-major scan on the calling thread (Gauss-Seidel style).
    #[default]
    Sequential,
    /// One unit of work per interior cell on a thread pool.
    Parallel(AccumulationMode),
}

/// Configuration for a flow solver.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowConfig {
    /// Backend used by every pass. Default: [`Backend::Sequential`].
    pub backend: Backend,
    /// Epsilon snap tolerance. Default: [`DEFAULT_EPSILON`].
    pub epsilon: f32,
    /// Worker threads for the parallel backend. `None` runs on rayon's
    /// global pool; `Some(n)` builds a dedicated pool of `n` threads.
    pub worker_count: Option<usize>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Sequential,
            epsilon: DEFAULT_EPSILON,
            worker_count: None,
        }
    }
}

impl FlowConfig {
    /// Default configuration with the given backend.
    pub fn with_backend(backend: Backend) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidEpsilon`] if `epsilon` is NaN, infinite, or
    ///   negative.
    /// - [`ConfigError::InvalidWorkerCount`] if `worker_count` is `Some(0)`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::InvalidEpsilon {
                value: self.epsilon,
            });
        }
        if let Some(0) = self.worker_count {
            return Err(ConfigError::InvalidWorkerCount { value: 0 });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_and_sequential() {
        let cfg = FlowConfig::default();
        assert_eq!(cfg.backend, Backend::Sequential);
        assert_eq!(cfg.epsilon, DEFAULT_EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_bad_epsilon() {
        for eps in [f32::NAN, f32::INFINITY, -1e-3] {
            let cfg = FlowConfig {
                epsilon: eps,
                ..FlowConfig::default()
            };
            assert!(matches!(
                cfg.validate(),
                Err(ConfigError::InvalidEpsilon { .. })
            ));
        }
    }

    #[test]
    fn zero_epsilon_is_allowed() {
        let cfg = FlowConfig {
            epsilon: 0.0,
            ..FlowConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_workers() {
        let cfg = FlowConfig {
            worker_count: Some(0),
            ..FlowConfig::with_backend(Backend::Parallel(AccumulationMode::DoubleBuffered))
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidWorkerCount { value: 0 })
        );
    }
}
