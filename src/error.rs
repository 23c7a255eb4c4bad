//! Error types for fusepipe.

use thiserror::Error;

use crate::container::ContainerKind;
use crate::stage::StageKind;

/// Result type alias using fusepipe's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by fallible stage and combiner functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for pipeline runs.
#[derive(Error, Debug)]
pub enum Error {
    /// A dynamic value had the wrong shape for the target container.
    #[error("type mismatch accumulating into {kind}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind of the container that rejected the value.
        kind: ContainerKind,
        /// Shape the container accepts.
        expected: &'static str,
        /// Shape that actually arrived.
        found: String,
    },

    /// A fallible stage function returned an error.
    #[error("{kind} stage #{index} failed: {source}")]
    Stage {
        /// Position of the stage in the chain.
        index: usize,
        /// Variant of the failing stage.
        kind: StageKind,
        /// Error returned by the stage function.
        #[source]
        source: BoxError,
    },

    /// An integer accumulator went past the range of its type.
    #[error("numeric accumulator overflowed {number}")]
    Overflow {
        /// Name of the integer type.
        number: &'static str,
    },

    /// A fallible combiner returned an error.
    #[error("combiner failed: {source}")]
    Combiner {
        /// Error returned by the combiner.
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// Create a type mismatch error.
    pub fn type_mismatch(
        kind: ContainerKind,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Error::TypeMismatch {
            kind,
            expected,
            found: found.into(),
        }
    }

    /// Create an overflow error for the named integer type.
    pub fn overflow(number: &'static str) -> Self {
        Error::Overflow { number }
    }

    /// Wrap a stage function failure.
    pub fn stage(index: usize, kind: StageKind, source: BoxError) -> Self {
        Error::Stage {
            index,
            kind,
            source,
        }
    }

    /// Wrap a combiner failure.
    pub fn combiner(source: impl Into<BoxError>) -> Self {
        Error::Combiner {
            source: source.into(),
        }
    }
}
