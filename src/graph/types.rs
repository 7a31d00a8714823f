//! Core trait definitions for graph keys and edge weights

use std::fmt;
use std::hash::Hash;

/// A value that can identify a node and index the hashtable.
///
/// Keys need equality, a stable hash, and cheap cloning (edges hold copies of
/// both endpoint keys). `is_null` marks the absent-key sentinel of a key type;
/// the hashtable refuses to store such keys.
pub trait Key: Hash + Eq + Clone + fmt::Debug {
    fn is_null(&self) -> bool {
        false
    }
}

macro_rules! impl_key {
    ($($t:ty),* $(,)?) => {
        $(impl Key for $t {})*
    };
}

impl_key!(
    String, char, bool,
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
);

impl Key for &str {}

/// `None` is the absent key.
impl<T: Key> Key for Option<T> {
    fn is_null(&self) -> bool {
        match self {
            None => true,
            Some(inner) => inner.is_null(),
        }
    }
}

impl<A: Key, B: Key> Key for (A, B) {
    fn is_null(&self) -> bool {
        self.0.is_null() || self.1.is_null()
    }
}

/// Numeric edge weight readable as an `f64` path cost.
pub trait Weight: Copy + fmt::Debug {
    fn to_cost(self) -> f64;
}

macro_rules! impl_weight {
    ($($t:ty),* $(,)?) => {
        $(impl Weight for $t {
            #[inline]
            fn to_cost(self) -> f64 {
                self as f64
            }
        })*
    };
}

impl_weight!(f32, f64, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
