//! Target containers and their built-in combiners.
//!
//! A terminal call folds every surviving element into a container. The set of
//! container kinds is closed ([`ContainerKind`]) and the kind is picked at
//! compile time by the [`Container`] impl matching the container and element
//! types:
//!
//! | Kind | Containers | Element | Combine |
//! |---|---|---|---|
//! | list | `Vec`, `VecDeque` | any | append |
//! | set | `HashSet`, `BTreeSet` | any | insert |
//! | mapping | `HashMap`, `BTreeMap` | `(K, V)` or a [`Value`] pair | set key |
//! | record | [`Record`] | `(K: Display, V: Into<Value>)` or a [`Value`] pair | set key |
//! | text | `String` | any `Display` | append |
//! | number | primitive numbers, plus [`Value`] into `i64`/`f64` | number | add |
//!
//! Integer accumulators use checked addition and fail with
//! [`Error::Overflow`] instead of wrapping; the total stays at its last value.
//!
//! A container type without an impl cannot be used with
//! [`Pipeline::collect_into`](crate::Pipeline::collect_into); pass an explicit
//! combiner with
//! [`Pipeline::collect_into_with`](crate::Pipeline::collect_into_with)
//! instead.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::error::{Error, Result};
use crate::value::{Record, Value};

/// The supported container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Ordered growable list.
    List,
    /// Unique set; duplicates are absorbed.
    Set,
    /// Key to value mapping.
    Mapping,
    /// String-keyed record.
    Record,
    /// Character string.
    Text,
    /// Numeric accumulator.
    Number,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerKind::List => "ordered list",
            ContainerKind::Set => "unique set",
            ContainerKind::Mapping => "key-value mapping",
            ContainerKind::Record => "string-keyed record",
            ContainerKind::Text => "string",
            ContainerKind::Number => "number",
        };
        f.write_str(name)
    }
}

/// A container that elements of type `T` can be folded into.
pub trait Container<T> {
    /// The kind of this container.
    const KIND: ContainerKind;

    /// Fold one element into the container.
    fn combine(&mut self, value: T) -> Result<()>;
}

// ============================================================================
// Lists and sets
// ============================================================================

impl<T> Container<T> for Vec<T> {
    const KIND: ContainerKind = ContainerKind::List;

    fn combine(&mut self, value: T) -> Result<()> {
        self.push(value);
        Ok(())
    }
}

impl<T> Container<T> for VecDeque<T> {
    const KIND: ContainerKind = ContainerKind::List;

    fn combine(&mut self, value: T) -> Result<()> {
        self.push_back(value);
        Ok(())
    }
}

impl<T, S> Container<T> for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    const KIND: ContainerKind = ContainerKind::Set;

    fn combine(&mut self, value: T) -> Result<()> {
        self.insert(value);
        Ok(())
    }
}

impl<T: Ord> Container<T> for BTreeSet<T> {
    const KIND: ContainerKind = ContainerKind::Set;

    fn combine(&mut self, value: T) -> Result<()> {
        self.insert(value);
        Ok(())
    }
}

// ============================================================================
// Mappings and records
// ============================================================================

impl<K, V, S> Container<(K, V)> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    const KIND: ContainerKind = ContainerKind::Mapping;

    fn combine(&mut self, (key, value): (K, V)) -> Result<()> {
        self.insert(key, value);
        Ok(())
    }
}

impl<K: Ord, V> Container<(K, V)> for BTreeMap<K, V> {
    const KIND: ContainerKind = ContainerKind::Mapping;

    fn combine(&mut self, (key, value): (K, V)) -> Result<()> {
        self.insert(key, value);
        Ok(())
    }
}

fn expect_pair(kind: ContainerKind, value: Value) -> Result<(Value, Value)> {
    value
        .into_pair()
        .map_err(|other| Error::type_mismatch(kind, "2-element list", other.shape()))
}

impl<S: BuildHasher> Container<Value> for HashMap<Value, Value, S> {
    const KIND: ContainerKind = ContainerKind::Mapping;

    fn combine(&mut self, value: Value) -> Result<()> {
        let (key, value) = expect_pair(ContainerKind::Mapping, value)?;
        self.insert(key, value);
        Ok(())
    }
}

impl Container<Value> for BTreeMap<Value, Value> {
    const KIND: ContainerKind = ContainerKind::Mapping;

    fn combine(&mut self, value: Value) -> Result<()> {
        let (key, value) = expect_pair(ContainerKind::Mapping, value)?;
        self.insert(key, value);
        Ok(())
    }
}

impl<K, V> Container<(K, V)> for Record
where
    K: fmt::Display,
    V: Into<Value>,
{
    const KIND: ContainerKind = ContainerKind::Record;

    fn combine(&mut self, (key, value): (K, V)) -> Result<()> {
        self.insert(key.to_string(), value);
        Ok(())
    }
}

impl Container<Value> for Record {
    const KIND: ContainerKind = ContainerKind::Record;

    fn combine(&mut self, value: Value) -> Result<()> {
        let (key, value) = expect_pair(ContainerKind::Record, value)?;
        self.insert(key.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// Strings and numbers
// ============================================================================

impl<T: fmt::Display> Container<T> for String {
    const KIND: ContainerKind = ContainerKind::Text;

    fn combine(&mut self, value: T) -> Result<()> {
        self.push_str(&value.to_string());
        Ok(())
    }
}

macro_rules! integer_container {
    ($($t:ty),*) => {
        $(
            impl Container<$t> for $t {
                const KIND: ContainerKind = ContainerKind::Number;

                fn combine(&mut self, value: $t) -> Result<()> {
                    *self = self
                        .checked_add(value)
                        .ok_or_else(|| Error::overflow(stringify!($t)))?;
                    Ok(())
                }
            }
        )*
    };
}

integer_container!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_container {
    ($($t:ty),*) => {
        $(
            impl Container<$t> for $t {
                const KIND: ContainerKind = ContainerKind::Number;

                fn combine(&mut self, value: $t) -> Result<()> {
                    *self += value;
                    Ok(())
                }
            }
        )*
    };
}

float_container!(f32, f64);

impl Container<Value> for i64 {
    const KIND: ContainerKind = ContainerKind::Number;

    fn combine(&mut self, value: Value) -> Result<()> {
        let n = value
            .as_int()
            .ok_or_else(|| Error::type_mismatch(ContainerKind::Number, "int", value.shape()))?;
        *self = self.checked_add(n).ok_or_else(|| Error::overflow("i64"))?;
        Ok(())
    }
}

impl Container<Value> for f64 {
    const KIND: ContainerKind = ContainerKind::Number;

    fn combine(&mut self, value: Value) -> Result<()> {
        match value.as_f64() {
            Some(x) => {
                *self += x;
                Ok(())
            }
            None => Err(Error::type_mismatch(
                ContainerKind::Number,
                "number",
                value.shape(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold_all<C: Container<T>, T>(mut container: C, items: Vec<T>) -> Result<C> {
        for item in items {
            container.combine(item)?;
        }
        Ok(container)
    }

    #[test]
    fn test_list_appends() {
        let list = fold_all(Vec::new(), vec![3, 1, 2]).unwrap();
        assert_eq!(list, vec![3, 1, 2]);
        assert_eq!(<Vec<i32> as Container<i32>>::KIND, ContainerKind::List);

        let deque = fold_all(VecDeque::new(), vec!['a', 'b']).unwrap();
        assert_eq!(deque, VecDeque::from(vec!['a', 'b']));
    }

    #[test]
    fn test_set_absorbs_duplicates() {
        let set = fold_all(HashSet::new(), vec![1, 2, 2, 3, 3, 3]).unwrap();
        assert_eq!(set.len(), 3);

        let ordered = fold_all(BTreeSet::new(), vec![5, 1, 5]).unwrap();
        assert_eq!(ordered.into_iter().collect::<Vec<_>>(), vec![1, 5]);
    }

    #[test]
    fn test_mapping_sets_keys() {
        let map = fold_all(HashMap::new(), vec![(0, 1), (1, 4), (0, 9)]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&0], 9);

        let ordered = fold_all(BTreeMap::new(), vec![("b", 2), ("a", 1)]).unwrap();
        assert_eq!(ordered.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_dynamic_mapping_checks_shape() {
        let mut map: HashMap<Value, Value> = HashMap::new();
        map.combine(Value::from(("k", 1))).unwrap();
        assert_eq!(map[&Value::from("k")], Value::Int(1));

        let err = map.combine(Value::Int(3)).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                kind: ContainerKind::Mapping,
                ..
            }
        ));
        // Earlier entries stay in place.
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_record_stringifies_keys() {
        let record = fold_all(Record::new(), vec![(1, 0usize), (4, 1), (9, 2)]).unwrap();
        assert_eq!(record.get("4"), Some(&Value::Int(1)));
        assert_eq!(<Record as Container<(i32, usize)>>::KIND, ContainerKind::Record);
    }

    #[test]
    fn test_record_rejects_non_pairs() {
        let mut record = Record::new();
        record.combine(Value::from(vec![Value::from(2), Value::from("two")])).unwrap();
        assert_eq!(record["2"], Value::from("two"));

        let err = record
            .combine(Value::from(vec![1, 2, 3]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "type mismatch accumulating into string-keyed record: expected 2-element list, found list of 3"
        );
    }

    #[test]
    fn test_string_concatenates() {
        let text = fold_all(String::new(), vec![1, 2, 3, 4, 5]).unwrap();
        assert_eq!(text, "12345");

        let text = fold_all(String::from(">"), vec!["a", "b"]).unwrap();
        assert_eq!(text, ">ab");
    }

    #[test]
    fn test_numbers_add() {
        assert_eq!(fold_all(0i32, vec![1, 2, 3, 4, 5]).unwrap(), 15);
        assert_eq!(fold_all(0.5f64, vec![0.25, 0.25]).unwrap(), 1.0);
        assert_eq!(<u8 as Container<u8>>::KIND, ContainerKind::Number);
    }

    #[test]
    fn test_dynamic_numbers() {
        let total = fold_all(0i64, vec![Value::Int(2), Value::Int(3)]).unwrap();
        assert_eq!(total, 5);

        let total = fold_all(0f64, vec![Value::Int(1), Value::Float(0.5)]).unwrap();
        assert_eq!(total, 1.5);

        let err = fold_all(0i64, vec![Value::from("x")]).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { kind: ContainerKind::Number, .. }));
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        assert_eq!(fold_all(0u8, vec![200, 55]).unwrap(), u8::MAX);

        let err = fold_all(0u8, vec![200, 100]).unwrap_err();
        assert!(matches!(err, Error::Overflow { number: "u8" }));

        let err = fold_all(i32::MIN, vec![-1]).unwrap_err();
        assert_eq!(err.to_string(), "numeric accumulator overflowed i32");
    }

    #[test]
    fn test_dynamic_overflow_keeps_total() {
        let mut total = 0i64;
        total.combine(Value::Int(i64::MAX)).unwrap();
        let err = total.combine(Value::Int(1)).unwrap_err();
        assert!(matches!(err, Error::Overflow { number: "i64" }));
        assert_eq!(total, i64::MAX);
    }

    #[test]
    fn test_float_sum_saturates_to_infinity() {
        let total = fold_all(f64::MAX, vec![f64::MAX]).unwrap();
        assert!(total.is_infinite());
    }
}
