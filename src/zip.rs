//! Lockstep zipping of several sequences.
//!
//! [`zip`] combines 1 to 8 inputs into one sequence of tuples, one slot per
//! input. All cursors advance together, in input order, and iteration stops
//! for good at the first step where any input is exhausted; values already
//! pulled from earlier inputs on that step are discarded.
//!
//! A single input is not wrapped: `zip((xs,))` is `xs` itself, so stage
//! functions downstream receive bare values instead of 1-tuples.
//!
//! # Example
//!
//! ```rust
//! use fusepipe::zip;
//!
//! let pairs: Vec<_> = zip((vec![1, 2, 3, 4], vec!["a", "b", "c"])).into_iter().collect();
//! assert_eq!(pairs, vec![(1, "a"), (2, "b"), (3, "c")]);
//!
//! let single = zip((vec![1, 2],));
//! assert_eq!(single, vec![1, 2]);
//! ```

/// A tuple of sequences that can be zipped.
///
/// Implemented for tuples of 1 to 8 `IntoIterator` values.
pub trait ZipSources {
    /// The combined sequence.
    type Zipped: IntoIterator;

    /// Combine the sources.
    fn zip(self) -> Self::Zipped;
}

/// Zip a tuple of sequences into one sequence of tuples.
pub fn zip<Z: ZipSources>(sources: Z) -> Z::Zipped {
    sources.zip()
}

/// Several sequences combined step by step.
///
/// Re-iterable (and therefore usable as a pipeline source) whenever every
/// input is `Clone`.
#[derive(Debug, Clone)]
pub struct Zip<T> {
    sources: T,
}

impl<T> Zip<T> {
    /// Get the zipped sources back.
    pub fn into_inner(self) -> T {
        self.sources
    }
}

/// Cursor over a [`Zip`].
#[derive(Debug, Clone)]
pub struct ZipCursor<T> {
    cursors: T,
    done: bool,
}

impl<A: IntoIterator> ZipSources for (A,) {
    type Zipped = A;

    fn zip(self) -> A {
        self.0
    }
}

fn min_upper(acc: Option<usize>, hi: Option<usize>) -> Option<usize> {
    match (acc, hi) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

macro_rules! impl_zip {
    ($($S:ident $v:ident),+) => {
        impl<$($S: IntoIterator),+> ZipSources for ($($S,)+) {
            type Zipped = Zip<($($S,)+)>;

            fn zip(self) -> Self::Zipped {
                Zip { sources: self }
            }
        }

        impl<$($S: IntoIterator),+> IntoIterator for Zip<($($S,)+)> {
            type Item = ($($S::Item,)+);
            type IntoIter = ZipCursor<($($S::IntoIter,)+)>;

            fn into_iter(self) -> Self::IntoIter {
                let ($($v,)+) = self.sources;
                ZipCursor {
                    cursors: ($($v.into_iter(),)+),
                    done: false,
                }
            }
        }

        impl<$($S: Iterator),+> Iterator for ZipCursor<($($S,)+)> {
            type Item = ($($S::Item,)+);

            fn next(&mut self) -> Option<Self::Item> {
                if self.done {
                    return None;
                }
                let ($($v,)+) = &mut self.cursors;
                $(
                    let $v = match $v.next() {
                        Some(value) => value,
                        None => {
                            self.done = true;
                            return None;
                        }
                    };
                )+
                Some(($($v,)+))
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                if self.done {
                    return (0, Some(0));
                }
                let ($($v,)+) = &self.cursors;
                let mut lower = usize::MAX;
                let mut upper = None;
                $(
                    let (lo, hi) = $v.size_hint();
                    lower = lower.min(lo);
                    upper = min_upper(upper, hi);
                )+
                (lower, upper)
            }
        }
    };
}

impl_zip!(A a, B b);
impl_zip!(A a, B b, C c);
impl_zip!(A a, B b, C c, D d);
impl_zip!(A a, B b, C c, D d, E e);
impl_zip!(A a, B b, C c, D d, E e, F f);
impl_zip!(A a, B b, C c, D d, E e, F f, G g);
impl_zip!(A a, B b, C c, D d, E e, F f, G g, H h);

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_single_source_passthrough() {
        let single = zip((vec![1, 2, 3],));
        assert_eq!(single, vec![1, 2, 3]);
    }

    #[test]
    fn test_zip_stops_at_shortest() {
        let zipped: Vec<_> = zip((vec![1, 2, 3, 4], vec![5, 6, 7])).into_iter().collect();
        assert_eq!(zipped, vec![(1, 5), (2, 6), (3, 7)]);
    }

    #[test]
    fn test_zip_heterogeneous_three_way() {
        let zipped: Vec<_> = zip((0..3, ["x", "y", "z"], vec![true, false, true]))
            .into_iter()
            .collect();
        assert_eq!(zipped, vec![(0, "x", true), (1, "y", false), (2, "z", true)]);
    }

    #[test]
    fn test_zip_with_infinite_input() {
        let zipped: Vec<_> = zip((0.., vec!['a', 'b'])).into_iter().collect();
        assert_eq!(zipped, vec![(0, 'a'), (1, 'b')]);
    }

    #[test]
    fn test_zip_does_not_advance_after_exhaustion() {
        let pulls = Cell::new(0);
        let counting = std::iter::from_fn(|| {
            pulls.set(pulls.get() + 1);
            Some(pulls.get())
        });
        let mut cursor = zip((counting, vec![1])).into_iter();
        assert_eq!(cursor.next(), Some((1, 1)));
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.next(), None);
        // Second step pulled the first input once before the second ran dry.
        assert_eq!(pulls.get(), 2);
    }

    #[test]
    fn test_zip_size_hint() {
        let cursor = zip((vec![1, 2, 3], 0..10, vec![0; 5])).into_iter();
        assert_eq!(cursor.size_hint(), (3, Some(3)));

        let unbounded = zip((0.., vec![1, 2])).into_iter();
        assert_eq!(unbounded.size_hint(), (2, Some(2)));
    }

    #[test]
    fn test_zip_is_replayable_when_inputs_clone() {
        let zipped = zip((vec![1, 2], vec![3, 4]));
        let first: Vec<_> = zipped.clone().into_iter().collect();
        let second: Vec<_> = zipped.into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zip_eight_inputs() {
        let zipped: Vec<_> = zip((
            vec![1], vec![2], vec![3], vec![4], vec![5], vec![6], vec![7], vec![8],
        ))
        .into_iter()
        .collect();
        assert_eq!(zipped, vec![(1, 2, 3, 4, 5, 6, 7, 8)]);
    }
}
