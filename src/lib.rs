//! # fusepipe
//!
//! Fused, chainable transformation pipelines over sequences.
//!
//! A pipeline wraps one or more sequences, collects a chain of `map` and
//! `filter` stages, and runs them in a single pass when a terminal call
//! materializes the result into a container.
//!
//! ## Features
//!
//! - **Stage fusion**: every element goes through all stages before the next
//!   one is pulled; no intermediate collections
//! - **Local indices**: each stage sees a contiguous 0-based index over the
//!   elements it actually accepts, whatever upstream filters dropped
//! - **Lockstep zip**: several inputs combine into tuples, stopping at the
//!   shortest one
//! - **Typed containers**: the combine behavior is picked at compile time from
//!   the target container, with an explicit combiner as override
//!
//! ## Quick Start
//!
//! ```rust
//! use fusepipe::{from, from_zip, Record, Value};
//!
//! let doubled = from(vec![1, 2, 3]).map(|v, _| v * 2).collect_into(Vec::new())?;
//! assert_eq!(doubled, vec![2, 4, 6]);
//!
//! let sums = from_zip((vec![1, 2, 3, 4], vec![5, 6, 7]))
//!     .map(|(a, b), _| a + b)
//!     .collect_into(Vec::new())?;
//! assert_eq!(sums, vec![6, 8, 10]);
//!
//! let record = from(vec![1, 2, 3])
//!     .map(|v, i| (v * v, i))
//!     .collect_into(Record::new())?;
//! assert_eq!(record["9"], Value::Int(2));
//!
//! let total = from(vec![1, 2, 3, 4, 5]).collect_into(0i32)?;
//! assert_eq!(total, 15);
//! # Ok::<(), fusepipe::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod config;
pub mod container;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod stage;
pub mod value;
pub mod zip;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::container::{Container, ContainerKind};
    pub use crate::error::{Error, Result};
    pub use crate::pipeline::{Pipeline, from, from_zip};
    pub use crate::source::Sequence;
    pub use crate::stage::StageKind;
    pub use crate::value::{Record, Value};
}

pub use config::PipelineConfig;
pub use container::{Container, ContainerKind};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, from, from_zip};
pub use source::Sequence;
pub use stage::StageKind;
pub use value::{Record, Value};
pub use zip::zip;
