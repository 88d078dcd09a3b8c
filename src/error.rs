//! The error taxonomy for every stage of the pipeline.

use std::error::Error;
use std::fmt;

use llvm::JitError;
use lex::Token;

/// Everything that can abort a single top-level item.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The lexer read a byte sequence it could not turn into a token.
    LexError(String),
    /// The parser found a structural mismatch.
    ParseError {
        expected: &'static str,
        found: Token,
    },
    /// A `Variable` names something absent from local and global scope.
    UnboundName(String),
    /// The left-hand side of `=` is not a variable.
    BadAssignment,
    /// `getFunction` found neither a module-local definition nor a registry entry.
    UnknownCallee(String),
    /// The emitted IR failed LLVM's verifier.
    VerifierFailure(String),
    /// The JIT rejected a module add, symbol lookup, or module removal.
    JitFailure(JitError),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CompileError::LexError(ref msg) => write!(f, "lex error: {}", msg),
            CompileError::ParseError { expected, ref found } => {
                write!(f, "parse error: expected {}, found {}", expected, found)
            }
            CompileError::UnboundName(ref name) => write!(f, "unbound name `{}`", name),
            CompileError::BadAssignment => write!(f, "left-hand side of `=` is not a variable"),
            CompileError::UnknownCallee(ref name) => write!(f, "call to unknown function `{}`", name),
            CompileError::VerifierFailure(ref msg) => write!(f, "IR verification failed: {}", msg),
            CompileError::JitFailure(ref err) => write!(f, "JIT error: {}", err),
        }
    }
}

impl Error for CompileError {}

impl From<JitError> for CompileError {
    fn from(err: JitError) -> CompileError {
        CompileError::JitFailure(err)
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
