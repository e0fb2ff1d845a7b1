use std::fmt;

use crate::error::{Level, LuairErrorExt};
use crate::ir::err::IrError;
use crate::ir::verify::VerifyError;
use crate::location::{Location, Span};

/// Why lowering a chunk stopped. Lowering never returns a partial module.
#[derive(Debug, Clone, PartialEq)]
pub enum LowerError {
    /// The chunk uses a construct the lowering does not handle yet.
    Unsupported { construct: &'static str, span: Span },
    /// The lowering broke one of its own structural rules, or produced a
    /// module that does not verify.
    Invariant { message: String, location: Option<Location> },
}

impl LowerError {
    pub fn unsupported(construct: &'static str, span: Span) -> Self {
        LowerError::Unsupported { construct, span }
    }

    pub fn invariant(message: impl Into<String>, location: Option<Location>) -> Self {
        LowerError::Invariant { message: message.into(), location }
    }

    /// Name of the rejected construct, for unsupported-construct errors.
    pub fn construct(&self) -> Option<&'static str> {
        match self {
            LowerError::Unsupported { construct, .. } => Some(construct),
            LowerError::Invariant { .. } => None,
        }
    }
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowerError::Unsupported { construct, span } => {
                write!(f, "{} not implemented (at {})", construct, span.start)
            }
            LowerError::Invariant { message, location: Some(loc) } => {
                write!(f, "internal error: {} (at {})", message, loc)
            }
            LowerError::Invariant { message, location: None } => write!(f, "internal error: {}", message),
        }
    }
}

impl std::error::Error for LowerError {}

impl From<IrError> for LowerError {
    fn from(err: IrError) -> Self {
        LowerError::invariant(err.to_string(), None)
    }
}

impl From<Vec<VerifyError>> for LowerError {
    fn from(errors: Vec<VerifyError>) -> Self {
        let location = errors.iter().find_map(|e| e.location().cloned());
        let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        LowerError::invariant(format!("module failed to verify: {}", details.join("; ")), location)
    }
}

impl LuairErrorExt for LowerError {
    fn level(&self) -> Level {
        match self {
            LowerError::Unsupported { .. } => Level::Error,
            LowerError::Invariant { .. } => Level::Critical,
        }
    }

    fn message(&self) -> String {
        match self {
            LowerError::Unsupported { construct, .. } => format!("{} not implemented", construct),
            LowerError::Invariant { message, .. } => message.clone(),
        }
    }

    fn issuer(&self) -> String {
        "luair.ir.lower".to_string()
    }

    fn span(&self) -> Option<Span> {
        match self {
            LowerError::Unsupported { span, .. } => Some(span.clone()),
            LowerError::Invariant { .. } => None,
        }
    }

    fn location(&self) -> Option<Location> {
        match self {
            LowerError::Unsupported { span, .. } => Some(span.start.clone()),
            LowerError::Invariant { location, .. } => location.clone(),
        }
    }
}
