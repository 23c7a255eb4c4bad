//! Pipeline stages.
//!
//! A stage is one of two variants, described by [`StageKind`]:
//!
//! - a **transform** replaces every value it receives,
//! - a **predicate** lets a value through or rejects it.
//!
//! Both receive the value together with their *local index*: how many
//! elements this stage has accepted so far in the current run. Stages hold
//! no mutable state of their own; run-scoped counters live in
//! [`PassState`](crate::chain::PassState).

use std::fmt;
use std::marker::PhantomData;

use crate::error::BoxError;

/// The variant of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Replaces each value with a new one, possibly of another type.
    Transform,
    /// Keeps or drops each value.
    Predicate,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Transform => f.write_str("transform"),
            StageKind::Predicate => f.write_str("predicate"),
        }
    }
}

/// Outcome of applying a stage, `Ok(None)` meaning "rejected".
pub type StageResult<T> = std::result::Result<Option<T>, BoxError>;

/// A single stage of a pipeline.
///
/// This is the typed counterpart of a stage descriptor: input and output
/// types are known at compile time, so a type-changing `map` stays checked.
pub trait Stage {
    /// The type of value this stage accepts.
    type Input;

    /// The type of value this stage produces.
    type Output;

    /// Which variant this stage is.
    fn kind(&self) -> StageKind;

    /// Apply the stage to one value.
    ///
    /// `index` is the stage's local index. Returns `Ok(None)` to reject the
    /// value; only predicates do that.
    fn apply(&self, input: Self::Input, index: usize) -> StageResult<Self::Output>;
}

// ============================================================================
// Transform
// ============================================================================

/// A stage that maps each value through a function.
pub struct Transform<F, In, Out> {
    f: F,
    _marker: PhantomData<fn(In) -> Out>,
}

impl<F, In, Out> Transform<F, In, Out>
where
    F: Fn(In, usize) -> Out,
{
    /// Create a new transform stage.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<F, In, Out> Stage for Transform<F, In, Out>
where
    F: Fn(In, usize) -> Out,
{
    type Input = In;
    type Output = Out;

    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    fn apply(&self, input: In, index: usize) -> StageResult<Out> {
        Ok(Some((self.f)(input, index)))
    }
}

/// A transform whose function can fail.
pub struct TryTransform<F, In, Out, E> {
    f: F,
    _marker: PhantomData<fn(In) -> Result<Out, E>>,
}

impl<F, In, Out, E> TryTransform<F, In, Out, E>
where
    F: Fn(In, usize) -> Result<Out, E>,
    E: Into<BoxError>,
{
    /// Create a new fallible transform stage.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<F, In, Out, E> Stage for TryTransform<F, In, Out, E>
where
    F: Fn(In, usize) -> Result<Out, E>,
    E: Into<BoxError>,
{
    type Input = In;
    type Output = Out;

    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    fn apply(&self, input: In, index: usize) -> StageResult<Out> {
        (self.f)(input, index).map(Some).map_err(Into::into)
    }
}

// ============================================================================
// Predicate
// ============================================================================

/// A stage that keeps only values matching a predicate.
pub struct Predicate<F, T> {
    predicate: F,
    _marker: PhantomData<fn(T) -> T>,
}

impl<F, T> Predicate<F, T>
where
    F: Fn(&T, usize) -> bool,
{
    /// Create a new predicate stage.
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            _marker: PhantomData,
        }
    }
}

impl<F, T> Stage for Predicate<F, T>
where
    F: Fn(&T, usize) -> bool,
{
    type Input = T;
    type Output = T;

    fn kind(&self) -> StageKind {
        StageKind::Predicate
    }

    fn apply(&self, input: T, index: usize) -> StageResult<T> {
        if (self.predicate)(&input, index) {
            Ok(Some(input))
        } else {
            Ok(None)
        }
    }
}

/// A predicate whose function can fail.
pub struct TryPredicate<F, T, E> {
    predicate: F,
    _marker: PhantomData<fn(T) -> Result<T, E>>,
}

impl<F, T, E> TryPredicate<F, T, E>
where
    F: Fn(&T, usize) -> Result<bool, E>,
    E: Into<BoxError>,
{
    /// Create a new fallible predicate stage.
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            _marker: PhantomData,
        }
    }
}

impl<F, T, E> Stage for TryPredicate<F, T, E>
where
    F: Fn(&T, usize) -> Result<bool, E>,
    E: Into<BoxError>,
{
    type Input = T;
    type Output = T;

    fn kind(&self) -> StageKind {
        StageKind::Predicate
    }

    fn apply(&self, input: T, index: usize) -> StageResult<T> {
        match (self.predicate)(&input, index) {
            Ok(true) => Ok(Some(input)),
            Ok(false) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
