//! Typed stage chains and the per-run index bookkeeping.
//!
//! A chain is a type-level list: `Chain<First, Chain<Second, Identity>>`
//! applies `First` then `Second`. Appending walks to the [`Identity`] at the
//! end, so registration order is application order.
//!
//! While a run is in progress every stage keeps a rejection counter in
//! [`PassState`]. The local index of the stage at position `idx` for the
//! element at global position `p` is
//!
//! ```text
//! p - (rejections of the stages at positions 0..=idx)
//! ```
//!
//! which counts exactly the elements this stage has accepted so far: a
//! transform accepts everything it receives, a predicate only what it lets
//! through.

use tracing::trace;

use crate::error::{Error, Result};
use crate::stage::{Stage, StageKind};

/// The chain with no stages. Every value leaves exactly as it came in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

/// One stage in front of the stages that run after it.
pub struct Chain<S, Tail> {
    stage: S,
    tail: Tail,
}

impl<S, Tail> Chain<S, Tail>
where
    S: Stage,
{
    /// Put `stage` in front of `tail`.
    pub fn new(stage: S, tail: Tail) -> Self {
        Self { stage, tail }
    }
}

/// Growing a chain at its far end.
///
/// `Appended` is the chain type with `S` as its last stage, so every `map`
/// or `filter` call on a pipeline changes the pipeline's type.
pub trait AppendStage<S: Stage>: Sized {
    /// Chain type once `S` runs last.
    type Appended;

    /// Make `stage` the last stage of the chain.
    fn append(self, stage: S) -> Self::Appended;
}

impl<S: Stage> AppendStage<S> for Identity {
    type Appended = Chain<S, Identity>;

    fn append(self, stage: S) -> Self::Appended {
        Chain::new(stage, Identity)
    }
}

// The head keeps its place; only the terminating `Identity` is replaced.
impl<Head, Tail, S> AppendStage<S> for Chain<Head, Tail>
where
    Head: Stage,
    Tail: AppendStage<S>,
    S: Stage,
{
    type Appended = Chain<Head, Tail::Appended>;

    fn append(self, stage: S) -> Self::Appended {
        let Chain { stage: head, tail } = self;
        Chain::new(head, tail.append(stage))
    }
}

/// Shape of a chain, independent of the values flowing through it.
pub trait StageList {
    /// Number of stages.
    fn len(&self) -> usize;

    /// Returns `true` when the chain has no stages.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push the kind of every stage, in order, onto `kinds`.
    fn describe(&self, kinds: &mut Vec<StageKind>);
}

impl StageList for Identity {
    fn len(&self) -> usize {
        0
    }

    fn describe(&self, _kinds: &mut Vec<StageKind>) {}
}

impl<S: Stage, Tail: StageList> StageList for Chain<S, Tail> {
    fn len(&self) -> usize {
        1 + self.tail.len()
    }

    fn describe(&self, kinds: &mut Vec<StageKind>) {
        kinds.push(self.stage.kind());
        self.tail.describe(kinds);
    }
}

/// Run-scoped counters for one terminal call.
#[derive(Debug, Clone)]
pub struct PassState {
    position: usize,
    rejected: Vec<usize>,
}

impl PassState {
    /// Fresh counters for a chain of `stages` stages.
    pub fn new(stages: usize) -> Self {
        Self {
            position: 0,
            rejected: vec![0; stages],
        }
    }

    /// Set the global position of the element about to enter the chain.
    pub fn begin(&mut self, position: usize) {
        self.position = position;
    }

    /// Global position of the current element.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Rejections per stage so far. Always zero for built-in transforms.
    pub fn rejected(&self) -> &[usize] {
        &self.rejected
    }

    /// Total elements rejected by all stages so far.
    pub fn total_rejected(&self) -> usize {
        self.rejected.iter().sum()
    }
}

/// A chain that can carry values of type `In`.
pub trait StageChain<In>: StageList {
    /// The type of value leaving the last stage.
    type Output;

    /// Thread one element through the chain.
    ///
    /// Returns `Ok(None)` when some predicate rejected it.
    fn run(&self, input: In, pass: &mut PassState) -> Result<Option<Self::Output>> {
        self.run_from(input, pass, 0, 0)
    }

    /// Thread one element through the chain starting at stage `depth`, with
    /// `upstream` rejections already counted by the stages before it.
    fn run_from(
        &self,
        input: In,
        pass: &mut PassState,
        depth: usize,
        upstream: usize,
    ) -> Result<Option<Self::Output>>;
}

impl<In> StageChain<In> for Identity {
    type Output = In;

    fn run_from(
        &self,
        input: In,
        _pass: &mut PassState,
        _depth: usize,
        _upstream: usize,
    ) -> Result<Option<In>> {
        Ok(Some(input))
    }
}

impl<S, Tail> StageChain<S::Input> for Chain<S, Tail>
where
    S: Stage,
    Tail: StageChain<S::Output>,
{
    type Output = Tail::Output;

    fn run_from(
        &self,
        input: S::Input,
        pass: &mut PassState,
        depth: usize,
        upstream: usize,
    ) -> Result<Option<Self::Output>> {
        let seen = upstream + pass.rejected[depth];
        let index = pass.position - seen;
        let kind = self.stage.kind();

        let output = self
            .stage
            .apply(input, index)
            .map_err(|source| Error::stage(depth, kind, source))?;

        match output {
            Some(value) => self.tail.run_from(value, pass, depth + 1, seen),
            None => {
                pass.rejected[depth] += 1;
                trace!(stage = depth, %kind, index, position = pass.position, "element rejected");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{Predicate, Transform, TryTransform};

    fn run_all<C: StageChain<i32>>(chain: &C, input: &[i32]) -> Vec<C::Output> {
        let mut pass = PassState::new(chain.len());
        let mut out = Vec::new();
        for (position, value) in input.iter().copied().enumerate() {
            pass.begin(position);
            if let Some(v) = chain.run(value, &mut pass).unwrap() {
                out.push(v);
            }
        }
        out
    }

    #[test]
    fn test_identity_passes_through() {
        assert_eq!(run_all(&Identity, &[1, 2, 3]), vec![1, 2, 3]);
        assert!(Identity.is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let chain = Identity
            .append(Transform::new(|x: i32, _| x + 1))
            .append(Transform::new(|x: i32, _| x * 10));
        assert_eq!(chain.len(), 2);
        assert_eq!(run_all(&chain, &[1, 2]), vec![20, 30]);
    }

    #[test]
    fn test_describe() {
        let chain = Identity
            .append(Predicate::new(|x: &i32, _| *x > 0))
            .append(Transform::new(|x: i32, _| x as i64));
        let mut kinds = Vec::new();
        chain.describe(&mut kinds);
        assert_eq!(kinds, vec![StageKind::Predicate, StageKind::Transform]);
    }

    #[test]
    fn test_index_is_local_after_filtering() {
        let chain = Identity
            .append(Predicate::new(|x: &i32, _| *x > 2))
            .append(Transform::new(|x: i32, i| (x, i)));
        assert_eq!(run_all(&chain, &[1, 2, 3, 4, 5]), vec![(3, 0), (4, 1), (5, 2)]);
    }

    #[test]
    fn test_predicate_index_counts_accepted() {
        // The index only moves on acceptance, so after two hits every later element sees 2.
        let chain = Identity.append(Predicate::new(|_: &i32, i| i < 2));
        assert_eq!(run_all(&chain, &[1, 2, 3, 4]), vec![1, 2]);
    }

    #[test]
    fn test_rejection_counters() {
        let chain = Identity
            .append(Predicate::new(|x: &i32, _| x % 2 == 0))
            .append(Transform::new(|x: i32, _| x * x))
            .append(Predicate::new(|x: &i32, _| *x != 16));
        let mut pass = PassState::new(chain.len());
        for (position, value) in (1..=6).enumerate() {
            pass.begin(position);
            chain.run(value, &mut pass).unwrap();
        }
        assert_eq!(pass.rejected(), &[3, 0, 1]);
        assert_eq!(pass.total_rejected(), 4);
        assert_eq!(pass.position(), 5);
    }

    #[test]
    fn test_stage_error_reports_position() {
        let chain = Identity
            .append(Transform::new(|x: i32, _| x))
            .append(TryTransform::new(|x: i32, _| {
                if x == 2 { Err("two") } else { Ok(x) }
            }));
        let mut pass = PassState::new(chain.len());
        pass.begin(0);
        assert_eq!(chain.run(1, &mut pass).unwrap(), Some(1));
        pass.begin(1);
        let err = chain.run(2, &mut pass).unwrap_err();
        assert!(matches!(
            err,
            Error::Stage {
                index: 1,
                kind: StageKind::Transform,
                ..
            }
        ));
    }
}
