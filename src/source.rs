//! Re-iterable pipeline sources.

/// A sequence that can hand out a fresh cursor any number of times.
///
/// Every terminal call on a [`Pipeline`](crate::Pipeline) asks its source for
/// a new cursor and walks it once. Any `IntoIterator + Clone` value is a
/// sequence: vectors, arrays, ranges, slices by reference and cloneable
/// iterators all work. A cloned one-shot iterator that shares state with the
/// original (e.g. one draining a channel) will of course not replay.
pub trait Sequence {
    /// The type of element this sequence yields.
    type Item;

    /// The cursor walking one pass over the sequence.
    type Cursor: Iterator<Item = Self::Item>;

    /// Start a new pass.
    fn cursor(&self) -> Self::Cursor;
}

impl<I> Sequence for I
where
    I: IntoIterator + Clone,
{
    type Item = I::Item;
    type Cursor = I::IntoIter;

    fn cursor(&self) -> Self::Cursor {
        self.clone().into_iter()
    }
}
