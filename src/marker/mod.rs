// src/marker/mod.rs

//! Environment markers
//!
//! A marker is a small boolean expression attached to a field value after a
//! `;`, for example:
//!
//! ```text
//! pywin32 (>1.0); sys.platform == 'win32'
//! ```
//!
//! Each comparison puts a platform variable against a quoted literal. Both
//! sides literal, or both sides variables, is an evaluation error.
//! Comparisons chain with `and`/`or`, grouped strictly left to right (see
//! [`parser`]).
//!
//! Variables resolve against an optional execution context first, then a
//! built-in table describing the host:
//!
//! | variable              | example      |
//! |-----------------------|--------------|
//! | `sys.platform`        | `linux`      |
//! | `os.name`             | `posix`      |
//! | `platform.machine`    | `x86_64`     |
//! | `platform.version`    | (empty)      |
//! | `python_version`      | `3.12`       |
//! | `python_full_version` | `3.12.0`     |
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use pkgmeta::marker::interpret;
//!
//! let mut context = BTreeMap::new();
//! context.insert("sys.platform".to_string(), "linux2".to_string());
//! assert!(interpret("sys.platform == 'linux2'", Some(&context)).unwrap());
//! ```

pub mod lexer;
pub mod parser;

pub use lexer::{tokenize, Lexer, Operator, Token};
pub use parser::{parse, Expr, Operand, Operation, Parser};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Variable overrides consulted before the built-in table
pub type ExecutionContext = BTreeMap<String, String>;

/// Names of the built-in marker variables
pub const VARIABLES: [&str; 6] = [
    "sys.platform",
    "python_version",
    "python_full_version",
    "os.name",
    "platform.version",
    "platform.machine",
];

/// Interpreter version reported when no override is given
pub const DEFAULT_PYTHON_VERSION: &str = "3.12";

/// Full interpreter version reported when no override is given
pub const DEFAULT_PYTHON_FULL_VERSION: &str = "3.12.0";

/// Built-in variable table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerEnvironment {
    pub sys_platform: String,
    pub python_version: String,
    pub python_full_version: String,
    pub os_name: String,
    pub platform_version: String,
    pub platform_machine: String,
}

impl MarkerEnvironment {
    /// Describe the running host
    pub fn detect() -> Self {
        let sys_platform = match std::env::consts::OS {
            "linux" => "linux",
            "macos" => "darwin",
            "windows" => "win32",
            other => other,
        };
        let os_name = if cfg!(windows) { "nt" } else { "posix" };

        Self {
            sys_platform: sys_platform.to_string(),
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            python_full_version: DEFAULT_PYTHON_FULL_VERSION.to_string(),
            os_name: os_name.to_string(),
            platform_version: String::new(),
            platform_machine: std::env::consts::ARCH.to_string(),
        }
    }

    /// The host environment, detected once per process
    pub fn host() -> &'static MarkerEnvironment {
        static HOST: OnceLock<MarkerEnvironment> = OnceLock::new();
        HOST.get_or_init(Self::detect)
    }

    /// Look up a built-in variable
    pub fn lookup(&self, name: &str) -> Option<&str> {
        let value = match name {
            "sys.platform" => &self.sys_platform,
            "python_version" => &self.python_version,
            "python_full_version" => &self.python_full_version,
            "os.name" => &self.os_name,
            "platform.version" => &self.platform_version,
            "platform.machine" => &self.platform_machine,
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// Variable lookup: execution context first, then the built-in table
struct Scope<'a> {
    environment: &'a MarkerEnvironment,
    context: Option<&'a ExecutionContext>,
}

impl Scope<'_> {
    fn resolve<'s>(&'s self, operand: &'s Operand) -> Result<&'s str> {
        let name = match operand {
            Operand::Variable(name) => name.as_str(),
            Operand::Literal(raw) => {
                return Err(Error::MarkerEvaluation(format!(
                    "{} is not a valid variable",
                    raw
                )));
            }
        };

        if let Some(value) = self.context.and_then(|context| context.get(name)) {
            return Ok(value.as_str());
        }
        self.environment
            .lookup(name)
            .ok_or_else(|| Error::MarkerEvaluation(format!("'{}' is not a known variable", name)))
    }
}

impl Operation {
    fn evaluate(&self, scope: &Scope<'_>) -> Result<bool> {
        match (self.left.literal_value(), self.right.literal_value()) {
            (Some(_), Some(_)) => Err(Error::MarkerEvaluation(format!(
                "'{}' compares two literals",
                Expr::Operation(self.clone())
            ))),
            (Some(left), None) => {
                let right = scope.resolve(&self.right)?;
                Ok(self.op.apply(left, right))
            }
            (None, Some(right)) => {
                let left = scope.resolve(&self.left)?;
                Ok(self.op.apply(left, right))
            }
            (None, None) => Err(Error::MarkerEvaluation(format!(
                "'{}' has no quoted literal",
                Expr::Operation(self.clone())
            ))),
        }
    }
}

impl Expr {
    fn evaluate_in(&self, scope: &Scope<'_>) -> Result<bool> {
        match self {
            Self::Operation(operation) => operation.evaluate(scope),
            Self::And(left, right) => Ok(left.evaluate_in(scope)? && right.evaluate_in(scope)?),
            Self::Or(left, right) => Ok(left.evaluate_in(scope)? || right.evaluate_in(scope)?),
        }
    }

    /// Evaluate against an explicit variable table
    pub fn evaluate(
        &self,
        environment: &MarkerEnvironment,
        context: Option<&ExecutionContext>,
    ) -> Result<bool> {
        self.evaluate_in(&Scope {
            environment,
            context,
        })
    }
}

/// A parsed environment marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    source: String,
    expr: Expr,
}

impl Marker {
    /// Parse a marker expression (the part after `;`)
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self {
            source: source.trim().to_string(),
            expr: parse(source)?,
        })
    }

    /// The marker as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The parsed expression
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluate against the host environment
    pub fn evaluate(&self, context: Option<&ExecutionContext>) -> Result<bool> {
        self.expr.evaluate(MarkerEnvironment::host(), context)
    }

    /// Evaluate against an explicit variable table
    pub fn evaluate_in(
        &self,
        environment: &MarkerEnvironment,
        context: Option<&ExecutionContext>,
    ) -> Result<bool> {
        self.expr.evaluate(environment, context)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Marker {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse and evaluate `marker` against the host environment
pub fn interpret(marker: &str, context: Option<&ExecutionContext>) -> Result<bool> {
    Marker::parse(marker)?.evaluate(context)
}
