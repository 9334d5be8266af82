//! Codelist resolution and evaluation
//!
//! Source goes through three steps: the reader builds a code tree, the
//! resolver substitutes bound symbols and expands macros against a scope,
//! and the evaluator runs the resolved tree.
//!
//! A list is a call only when its head is a function (or another call
//! form). Macro calls are expanded during resolution, so a list still
//! headed by a macro is quoted data. Every other value, list data
//! included, evaluates to a copy.

use smallvec::SmallVec;
use tracing::{instrument, trace};

use crate::dict::Dict;
use crate::error::{ErrorKind, ErrorValue};
use crate::reader;
use crate::seq::Seq;
use crate::value::{Callable, Value};

/// Maximum number of evaluated arguments to a function call.
pub const DEFAULT_ARG_LIMIT: usize = 32;

/// Maximum nesting of resolution and evaluation steps.
pub const DEFAULT_DEPTH_LIMIT: usize = reader::MAX_NESTING;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub arg_limit: usize,
    pub depth_limit: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            arg_limit: DEFAULT_ARG_LIMIT,
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }
}

/// Borrowed evaluation state handed to every native.
#[derive(Debug, Clone, Copy)]
pub struct Context<'s> {
    scope: &'s Dict,
    limits: Limits,
    depth: usize,
}

impl<'s> Context<'s> {
    pub fn new(scope: &'s Dict) -> Self {
        Self::with_limits(scope, Limits::default())
    }

    pub fn with_limits(scope: &'s Dict, limits: Limits) -> Self {
        Context {
            scope,
            limits,
            depth: 0,
        }
    }

    pub fn scope(&self) -> &'s Dict {
        self.scope
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The context for one level further down the tree.
    fn nested(&self) -> Result<Context<'s>, ErrorValue> {
        if self.depth >= self.limits.depth_limit {
            return Err(ErrorValue::new(
                ErrorKind::StackError,
                format!("nesting exceeds the limit of {}", self.limits.depth_limit),
            ));
        }
        Ok(Context {
            depth: self.depth + 1,
            ..*self
        })
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve each top-level form independently.
    #[instrument(level = "trace", skip_all, fields(forms = code.len()))]
    pub fn resolve_codelist(&self, code: &Seq) -> Result<Seq, ErrorValue> {
        code.iter().map(|form| self.resolve(form)).collect()
    }

    /// Substitute bindings for symbols and expand macro calls.
    pub fn resolve(&self, code: &Value) -> Result<Value, ErrorValue> {
        match code {
            Value::Text(text) if text.is_literal() => Ok(code.clone()),
            Value::Text(name) => self
                .scope
                .get(name)
                .ok_or_else(|| ErrorValue::name_error(format!("unbound symbol '{name}'"))),
            Value::Seq(list) => {
                let inner = self.nested()?;
                if let Some(mac) = list.first().and_then(|head| self.macro_head(head)) {
                    trace!("expanding macro");
                    return inner.call(&mac, &list.as_slice()[1..]);
                }
                list.iter()
                    .map(|item| inner.resolve(item))
                    .collect::<Result<Seq, _>>()
                    .map(Value::Seq)
            }
            other => Ok(other.clone()),
        }
    }

    /// The macro a list head designates, either directly or through a
    /// bound symbol.
    fn macro_head(&self, head: &Value) -> Option<Callable> {
        let callable = match head {
            Value::Text(name) => self.scope.get_view(name)?.as_callable()?,
            other => other.as_callable()?,
        };
        callable.is_macro().then(|| callable.clone())
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Evaluate every form, keeping only the last result.
    #[instrument(level = "trace", skip_all, fields(forms = code.len()))]
    pub fn eval_codelist(&self, code: &Seq) -> Result<Value, ErrorValue> {
        let mut last = Value::None;
        for form in code {
            last = self.eval(form)?;
        }
        Ok(last)
    }

    pub fn eval(&self, code: &Value) -> Result<Value, ErrorValue> {
        match code {
            Value::Seq(list) if is_call_form(list) => self.eval_call(list.as_slice()),
            other => Ok(other.clone()),
        }
    }

    fn eval_call(&self, form: &[Value]) -> Result<Value, ErrorValue> {
        let Some((head, tail)) = form.split_first() else {
            return Ok(Value::Seq(Seq::new()));
        };
        let inner = self.nested()?;
        let callee = inner.eval(head)?;
        let callable = callee.as_callable().ok_or_else(|| {
            ErrorValue::type_error(format!("{} is not callable", callee.resolved().kind()))
        })?;

        if callable.is_macro() {
            return inner.call(callable, tail);
        }

        if tail.len() > self.limits.arg_limit {
            return Err(ErrorValue::new(
                ErrorKind::StackError,
                format!(
                    "{} arguments exceed the limit of {}",
                    tail.len(),
                    self.limits.arg_limit
                ),
            ));
        }
        let args = tail
            .iter()
            .map(|arg| inner.eval(arg))
            .collect::<Result<SmallVec<[Value; 8]>, _>>()?;
        inner.call(callable, &args)
    }

    /// Invoke a callable on prepared arguments.
    pub fn call(&self, callable: &Callable, args: &[Value]) -> Result<Value, ErrorValue> {
        trace!(%callable, args = args.len(), "call");
        match callable {
            Callable::Native { func, .. } => func(args, self)?.into_result(),
            Callable::Code(code) if args.is_empty() => self.eval_codelist(code),
            Callable::Code(_) => Err(ErrorValue::contract(format!(
                "code takes no arguments, got {}",
                args.len()
            ))),
        }
    }

    /// Read, resolve and evaluate a whole source string.
    pub fn run_str(&self, source: &str) -> Result<Value, ErrorValue> {
        let code = reader::read_str(source)?;
        let resolved = self.resolve_codelist(&code)?;
        self.eval_codelist(&resolved)
    }
}

/// A non-empty list whose head is a function or itself a call form.
fn is_call_form(list: &Seq) -> bool {
    match list.first() {
        Some(Value::Seq(inner)) => is_call_form(inner),
        Some(head) => head.as_callable().is_some_and(|callable| !callable.is_macro()),
        None => false,
    }
}
