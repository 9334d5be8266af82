//! The standard environment
//!
//! A [`Runtime`] owns the standard scope: the standard library plus the
//! process arguments bound under [`ARGV_NAME`]. Building one initializes
//! the environment, dropping it tears the environment down.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use iris::{Context, Dict, Limits, Seq, Value, read};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{RunError, Stage};
use crate::inter::{Interpreter, Job};
use crate::stdlib::register_stdlib;

/// Reserved name of the shared process argument list.
pub const ARGV_NAME: &str = "*argv*";

/// Bind a shared argument list in `scope`. Several scopes can hold the
/// same list without copying it.
pub fn bind_argv(scope: &mut Dict, argv: &Arc<Value>) {
    scope.insert(ARGV_NAME, Value::Shared(Arc::clone(argv)));
}

#[derive(Debug)]
pub struct Runtime {
    scope: Arc<Dict>,
    config: Config,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Runtime {
    /// Standard scope with an empty argument list.
    pub fn new(config: Config) -> Self {
        Self::with_argv(config, Seq::new())
    }

    pub fn with_argv(config: Config, argv: Seq) -> Self {
        let mut scope = Dict::new();
        register_stdlib(&mut scope);
        bind_argv(&mut scope, &Arc::new(Value::Seq(argv)));
        debug!(bindings = scope.len(), "standard scope initialized");
        Runtime {
            scope: Arc::new(scope),
            config,
        }
    }

    pub fn scope(&self) -> &Dict {
        &self.scope
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn limits(&self) -> Limits {
        self.config.limits()
    }

    pub fn context(&self) -> Context<'_> {
        Context::with_limits(&self.scope, self.limits())
    }

    pub fn read(&self, source: &[u8]) -> Result<Seq, RunError> {
        read(source).map_err(|e| RunError::script(Stage::Read, e))
    }

    pub fn resolve(&self, code: &Seq) -> Result<Seq, RunError> {
        self.context()
            .resolve_codelist(code)
            .map_err(|e| RunError::script(Stage::Resolve, e))
    }

    /// Read, resolve and evaluate `source` on the calling thread.
    pub fn run_str(&self, source: &str) -> Result<Value, RunError> {
        let code = self.read(source.as_bytes())?;
        let resolved = self.resolve(&code)?;
        self.context()
            .eval_codelist(&resolved)
            .map_err(|e| RunError::script(Stage::Eval, e))
    }

    /// Read a source file and run it on a worker thread.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn run_file(&self, path: &Path) -> Result<Value, RunError> {
        let source = fs::read(path).map_err(|source| RunError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let code = self.read(&source)?;
        self.interpreter().spawn_program(code)?.join()
    }

    /// Evaluate resolved code on a worker thread sharing this scope.
    pub fn spawn(&self, code: Seq) -> Result<Job, RunError> {
        self.interpreter().spawn(code)
    }

    fn interpreter(&self) -> Interpreter {
        Interpreter::new(Arc::clone(&self.scope), self.limits())
    }
}
