//! The pipeline builder and its terminal calls.
//!
//! A pipeline is built in three steps:
//!
//! 1. [`from`] (or [`from_zip`] for several inputs) wraps the source,
//! 2. [`Pipeline::map`] and [`Pipeline::filter`] append stages,
//! 3. a terminal call such as [`Pipeline::collect_into`] walks the source once,
//!    threads every element through all stages and folds the survivors into a
//!    container.
//!
//! Stages are fused: no intermediate collection is built between them. A
//! terminal call borrows the pipeline, so it can be repeated; each run starts
//! again from a fresh cursor with fresh counters.
//!
//! # Example
//!
//! ```rust
//! use fusepipe::from;
//!
//! let squares = from(vec![1, 2, 3, 4, 5, 6])
//!     .filter(|v, _| v % 2 == 0)
//!     .map(|v, _| v * v)
//!     .filter(|v, _| *v != 16)
//!     .map(|v, i| (v, i))
//!     .collect_into(Vec::new())?;
//!
//! assert_eq!(squares, vec![(4, 0), (36, 1)]);
//! # Ok::<(), fusepipe::Error>(())
//! ```

use std::fmt;

use tracing::{debug, warn};

use crate::chain::{AppendStage, Identity, PassState, StageChain, StageList};
use crate::config::PipelineConfig;
use crate::container::{Container, ContainerKind};
use crate::error::{BoxError, Error, Result};
use crate::source::Sequence;
use crate::stage::{Predicate, StageKind, Transform, TryPredicate, TryTransform};
use crate::zip::ZipSources;

/// A chain of stages over a source, waiting for a terminal call.
///
/// Type parameters:
/// - `S`: the source sequence
/// - `C`: the chain of stages
pub struct Pipeline<S, C = Identity> {
    source: S,
    chain: C,
    config: PipelineConfig,
}

/// Start a pipeline over one sequence.
pub fn from<S: Sequence>(source: S) -> Pipeline<S> {
    Pipeline::new(source)
}

/// Start a pipeline over several sequences zipped in lockstep.
///
/// Stages receive one tuple per step, with one slot per input, until the
/// shortest input runs out. A 1-tuple behaves exactly like [`from`].
pub fn from_zip<Z>(sources: Z) -> Pipeline<Z::Zipped>
where
    Z: ZipSources,
    Z::Zipped: Sequence,
{
    Pipeline::new(sources.zip())
}

impl<S: Sequence> Pipeline<S> {
    /// Create a pipeline with no stages.
    pub fn new(source: S) -> Self {
        Self {
            source,
            chain: Identity,
            config: PipelineConfig::default(),
        }
    }
}

impl<S, C> Pipeline<S, C> {
    /// Replace the run configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the run configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get the source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S, C: StageList> Pipeline<S, C> {
    /// The kinds of the registered stages, in application order.
    pub fn stages(&self) -> Vec<StageKind> {
        let mut kinds = Vec::with_capacity(self.chain.len());
        self.chain.describe(&mut kinds);
        kinds
    }

    /// Number of registered stages.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Returns `true` when no stage has been registered.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl<S, C> Pipeline<S, C>
where
    S: Sequence,
    C: StageChain<S::Item>,
{
    /// Append a transform stage.
    ///
    /// `transform` receives each value and its local index and returns the
    /// replacement value, which may be of a different type.
    pub fn map<F, U>(self, transform: F) -> Pipeline<S, C::Appended>
    where
        F: Fn(C::Output, usize) -> U,
        C: AppendStage<Transform<F, C::Output, U>>,
    {
        self.push(Transform::new(transform))
    }

    /// Append a predicate stage.
    ///
    /// Values for which `predicate` returns `false` are dropped and never
    /// reach later stages or the container.
    pub fn filter<F>(self, predicate: F) -> Pipeline<S, C::Appended>
    where
        F: Fn(&C::Output, usize) -> bool,
        C: AppendStage<Predicate<F, C::Output>>,
    {
        self.push(Predicate::new(predicate))
    }

    /// Append a transform stage whose function can fail.
    ///
    /// The first `Err` aborts the run with [`Error::Stage`].
    pub fn try_map<F, U, E>(self, transform: F) -> Pipeline<S, C::Appended>
    where
        F: Fn(C::Output, usize) -> std::result::Result<U, E>,
        E: Into<BoxError>,
        C: AppendStage<TryTransform<F, C::Output, U, E>>,
    {
        self.push(TryTransform::new(transform))
    }

    /// Append a predicate stage whose function can fail.
    ///
    /// The first `Err` aborts the run with [`Error::Stage`].
    pub fn try_filter<F, E>(self, predicate: F) -> Pipeline<S, C::Appended>
    where
        F: Fn(&C::Output, usize) -> std::result::Result<bool, E>,
        E: Into<BoxError>,
        C: AppendStage<TryPredicate<F, C::Output, E>>,
    {
        self.push(TryPredicate::new(predicate))
    }

    fn push<T>(self, stage: T) -> Pipeline<S, C::Appended>
    where
        T: crate::stage::Stage,
        C: AppendStage<T>,
    {
        Pipeline {
            source: self.source,
            chain: self.chain.append(stage),
            config: self.config,
        }
    }

    /// Run the pipeline, folding survivors into `container` in place.
    ///
    /// On error the elements combined before the failure stay in the
    /// container.
    pub fn extend_into<K>(&self, container: &mut K) -> Result<()>
    where
        K: Container<C::Output>,
    {
        let kind = <K as Container<C::Output>>::KIND;
        self.drive((), Some(kind), |(), value| container.combine(value))
    }

    /// Run the pipeline and return `container` with every survivor folded in
    /// by its built-in combiner.
    pub fn collect_into<K>(&self, container: K) -> Result<K>
    where
        K: Container<C::Output>,
    {
        let kind = <K as Container<C::Output>>::KIND;
        self.drive(container, Some(kind), |mut container, value| {
            container.combine(value)?;
            Ok(container)
        })
    }

    /// Run the pipeline, folding survivors with a caller-supplied combiner.
    ///
    /// The combiner takes the container and one value and returns the
    /// container; any container type works.
    pub fn collect_into_with<K, F>(&self, container: K, mut combiner: F) -> Result<K>
    where
        F: FnMut(K, C::Output) -> K,
    {
        self.drive(container, None, |container, value| Ok(combiner(container, value)))
    }

    /// Like [`collect_into_with`](Self::collect_into_with), with a combiner
    /// that can fail.
    ///
    /// The first `Err` aborts the run with [`Error::Combiner`].
    pub fn try_collect_into_with<K, F, E>(&self, container: K, mut combiner: F) -> Result<K>
    where
        F: FnMut(K, C::Output) -> std::result::Result<K, E>,
        E: Into<BoxError>,
    {
        self.drive(container, None, |container, value| {
            combiner(container, value).map_err(Error::combiner)
        })
    }

    /// One full pass over the source.
    fn drive<A, G>(&self, init: A, target: Option<ContainerKind>, mut fold: G) -> Result<A>
    where
        G: FnMut(A, C::Output) -> Result<A>,
    {
        let label = self.config.label.as_str();
        let stages = self.chain.len();
        debug!(pipeline = label, stages, ?target, "starting run");

        let limit = self.config.element_limit.unwrap_or(usize::MAX);
        let mut pass = PassState::new(stages);
        let mut acc = init;
        let mut pulled = 0;
        let mut accepted = 0;

        let mut cursor = self.source.cursor();
        for (position, item) in cursor.by_ref().take(limit).enumerate() {
            pulled = position + 1;
            pass.begin(position);

            let outcome = match self.chain.run(item, &mut pass) {
                Ok(Some(value)) => {
                    accepted += 1;
                    fold(acc, value)
                }
                Ok(None) => Ok(acc),
                Err(err) => Err(err),
            };

            acc = match outcome {
                Ok(acc) => acc,
                Err(err) => {
                    debug!(pipeline = label, position, error = %err, "run aborted");
                    return Err(err);
                }
            };
        }

        if self.config.element_limit == Some(pulled) {
            match remaining(cursor.size_hint()) {
                Remaining::More => {
                    warn!(pipeline = label, limit = pulled, "run stopped at element limit");
                }
                Remaining::Unknown => {
                    debug!(pipeline = label, limit = pulled, "run reached element limit");
                }
                Remaining::Exhausted => {}
            }
        }

        debug!(
            pipeline = label,
            pulled,
            accepted,
            rejected = pass.total_rejected(),
            "run finished"
        );
        Ok(acc)
    }
}

/// What is left in a source once the element limit is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Remaining {
    More,
    Exhausted,
    Unknown,
}

// Judged from the size hint alone; pulling one more element to find out
// would break the limit.
fn remaining((lower, upper): (usize, Option<usize>)) -> Remaining {
    if lower > 0 {
        Remaining::More
    } else if upper == Some(0) {
        Remaining::Exhausted
    } else {
        Remaining::Unknown
    }
}

impl<S, C: StageList> fmt::Debug for Pipeline<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
