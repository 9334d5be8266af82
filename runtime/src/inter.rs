//! Worker-thread interpreter
//!
//! An [`Interpreter`] evaluates code on a dedicated, named thread against a
//! shared read-only scope. Each spawn yields a [`Job`] whose result is
//! collected exactly once with [`Job::join`]. Jobs cannot be cancelled.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use iris::{Context, Dict, Limits, Seq, Value};
use tracing::debug;

use crate::error::{RunError, Stage};

static NEXT_JOB_ID: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone)]
pub struct Interpreter {
    scope: Arc<Dict>,
    limits: Limits,
}

impl Interpreter {
    pub fn new(scope: Arc<Dict>, limits: Limits) -> Self {
        Interpreter { scope, limits }
    }

    /// Evaluate already resolved code on a worker thread.
    pub fn spawn(&self, code: Seq) -> Result<Job, RunError> {
        self.start(move |ctx| {
            ctx.eval_codelist(&code)
                .map_err(|e| RunError::script(Stage::Eval, e))
        })
    }

    /// Resolve and evaluate freshly read code on a worker thread, so that
    /// macro expansion runs there too.
    pub fn spawn_program(&self, code: Seq) -> Result<Job, RunError> {
        self.start(move |ctx| {
            let resolved = ctx
                .resolve_codelist(&code)
                .map_err(|e| RunError::script(Stage::Resolve, e))?;
            ctx.eval_codelist(&resolved)
                .map_err(|e| RunError::script(Stage::Eval, e))
        })
    }

    fn start<F>(&self, work: F) -> Result<Job, RunError>
    where
        F: FnOnce(&Context<'_>) -> Result<Value, RunError> + Send + 'static,
    {
        let id = NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed);
        let scope = Arc::clone(&self.scope);
        let limits = self.limits;

        let handle = thread::Builder::new()
            .name(format!("iris-inter-{id}"))
            .spawn(move || {
                debug!(id, "interpreter started");
                let result = work(&Context::with_limits(&scope, limits));
                debug!(id, ok = result.is_ok(), "interpreter finished");
                result
            })
            .map_err(RunError::Spawn)?;

        Ok(Job { id, handle })
    }
}

/// Handle to a running evaluation.
#[derive(Debug)]
pub struct Job {
    id: usize,
    handle: JoinHandle<Result<Value, RunError>>,
}

impl Job {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the worker is done and take its result.
    pub fn join(self) -> Result<Value, RunError> {
        self.handle.join().map_err(|_| RunError::WorkerPanicked)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib::standard_scope;
    use iris::{ErrorKind, read_str};

    fn interpreter() -> Interpreter {
        Interpreter::new(Arc::new(standard_scope()), Limits::default())
    }

    #[test]
    fn test_spawn_resolved_code() {
        let inter = interpreter();
        let code = read_str("(+ 1 2) (* 3 4)").unwrap();
        let resolved = Context::new(&standard_scope()).resolve_codelist(&code).unwrap();
        let job = inter.spawn(resolved).unwrap();
        assert_eq!(job.join().unwrap(), Value::Int(12));
    }

    #[test]
    fn test_spawn_program_reports_stage() {
        let inter = interpreter();
        let err = inter
            .spawn_program(read_str("(+ fresh 1)").unwrap())
            .unwrap()
            .join()
            .unwrap_err();
        match err {
            RunError::Script { stage, error } => {
                assert_eq!(stage, Stage::Resolve);
                assert_eq!(error.kind(), ErrorKind::NameError);
            }
            other => panic!("unexpected error {other:?}"),
        }

        let err = inter
            .spawn_program(read_str("(+ 1 '(2))").unwrap())
            .unwrap()
            .join()
            .unwrap_err();
        assert!(matches!(err, RunError::Script { stage: Stage::Eval, .. }));
    }

    #[test]
    fn test_job_ids_are_distinct() {
        let inter = interpreter();
        let a = inter.spawn(Seq::new()).unwrap();
        let b = inter.spawn(Seq::new()).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.join().unwrap(), Value::None);
        assert_eq!(b.join().unwrap(), Value::None);
    }
}
