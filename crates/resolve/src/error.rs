use std::{fmt, result::Result as StdResult};

use common::{result::ContextError, source::Source, span::Span};

pub type Result<T> = StdResult<T, Error>;

/// A syntax form the compiler knows about but does not support.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Unsupported {
    NamedFunctionExpression,
    PatternParameter,
    PatternDeclaration,
    ExportForm,
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::NamedFunctionExpression => {
                write!(f, "Named function expressions are not supported")
            }
            Unsupported::PatternParameter => write!(f, "Only simple parameters supported"),
            Unsupported::PatternDeclaration => {
                write!(f, "Only simple variable declarations are supported")
            }
            Unsupported::ExportForm => write!(f, "Only simple export syntax is supported"),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Error {
    /// A lexical name was declared twice in one scope.
    Redeclared {
        name: String,
        span: Span,
        first_declared: Option<Span>,
    },
    /// Assignment to a `const` binding.
    AssignToReadonly { name: String, span: Span },
    /// A declared name which is not a valid identifier.
    InvalidIdentifier { name: String, span: Span },
    /// Syntax outside the supported subset.
    NotSupported { what: Unsupported, span: Span },
    /// An invariant of the pass itself was violated. Attributed to the
    /// implementation, not the input program.
    Internal { reason: &'static str },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Redeclared { name, .. } => {
                write!(f, "Variable \"{name}\" already declared in scope")
            }
            Error::AssignToReadonly { name, .. } => {
                write!(
                    f,
                    "Cannot assign to variable \"{name}\" because it is declared readonly"
                )
            }
            Error::InvalidIdentifier { name, .. } => {
                write!(f, "Invalid identifier: \"{name}\"")
            }
            Error::NotSupported { what, .. } => {
                write!(f, "{what}")
            }
            Error::Internal { reason } => {
                write!(f, "Internal resolver error: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl ContextError<Source> for Error {
    fn display(&self, f: &mut fmt::Formatter, ctx: &Source) -> fmt::Result {
        write!(f, "{self}")?;
        match self {
            Error::Redeclared {
                span,
                first_declared,
                ..
            } => {
                write!(f, " at {}", ctx.render_location(*span))?;
                if let Some(first) = first_declared {
                    write!(f, ", first declared at {}", ctx.render_location(*first))?;
                }
                Ok(())
            }
            Error::AssignToReadonly { span, .. }
            | Error::InvalidIdentifier { span, .. }
            | Error::NotSupported { span, .. } => {
                write!(f, " at {}", ctx.render_location(*span))
            }
            Error::Internal { .. } => Ok(()),
        }
    }
}
