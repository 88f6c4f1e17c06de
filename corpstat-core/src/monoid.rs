//! Monoid trait and tree reduction for partial count tables
//!
//! This module defines the algebra that lets chunks be counted
//! independently and merged in any order or grouping.

use smallvec::SmallVec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A mathematical monoid structure that enables parallel computation
///
/// A monoid is an algebraic structure with an associative binary operation
/// and an identity element:
/// - Associativity: (a ⊕ b) ⊕ c = a ⊕ (b ⊕ c)
/// - Identity: a ⊕ identity = identity ⊕ a = a
///
/// Every partial result in this crate is also commutative, so merges may
/// happen in completion order rather than chunk order.
pub trait Monoid: Sized + Send {
    /// Returns the identity element of the monoid
    fn identity() -> Self;

    /// Combines two elements of the monoid, consuming both
    fn combine(self, other: Self) -> Self;
}

/// Extension trait for monoids that can be reduced from collections
pub trait MonoidReduce: Monoid {
    /// Reduces a collection of monoid elements to a single result
    ///
    /// Uses tree reduction to maintain O(log n) depth even with many elements.
    fn reduce<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        // Use SmallVec to avoid heap allocation for small collections
        let mut items: SmallVec<[Self; 16]> = iter.into_iter().collect();

        // Tree reduction: combine pairs until only one remains
        while items.len() > 1 {
            let mut next_level = SmallVec::<[Self; 16]>::with_capacity(items.len().div_ceil(2));
            let mut level = items.into_iter();

            while let Some(left) = level.next() {
                match level.next() {
                    Some(right) => next_level.push(left.combine(right)),
                    None => next_level.push(left),
                }
            }

            items = next_level;
        }

        items.pop().unwrap_or_else(Self::identity)
    }

    /// Fork-join reduction on the current rayon pool
    #[cfg(feature = "parallel")]
    fn par_reduce(items: Vec<Self>) -> Self {
        items.into_par_iter().reduce(Self::identity, Self::combine)
    }
}

impl<T: Monoid> MonoidReduce for T {}

#[cfg(test)]
mod tests {
    use super::*;

    // Test monoid for verification
    #[derive(Debug, Clone, PartialEq)]
    struct TestMonoid(i32);

    impl Monoid for TestMonoid {
        fn identity() -> Self {
            TestMonoid(0)
        }

        fn combine(self, other: Self) -> Self {
            TestMonoid(self.0 + other.0)
        }
    }

    // Non-commutative witness: reduction must keep left-to-right order
    #[derive(Debug, Clone, PartialEq)]
    struct Concat(String);

    impl Monoid for Concat {
        fn identity() -> Self {
            Concat(String::new())
        }

        fn combine(mut self, other: Self) -> Self {
            self.0.push_str(&other.0);
            self
        }
    }

    #[test]
    fn test_identity_property() {
        let a = TestMonoid(42);

        assert_eq!(a.clone().combine(TestMonoid::identity()), a);
        assert_eq!(TestMonoid::identity().combine(a.clone()), a);
    }

    #[test]
    fn test_reduce_empty() {
        let empty: Vec<TestMonoid> = vec![];
        assert_eq!(TestMonoid::reduce(empty), TestMonoid::identity());
    }

    #[test]
    fn test_reduce_single() {
        assert_eq!(TestMonoid::reduce(vec![TestMonoid(42)]), TestMonoid(42));
    }

    #[test]
    fn test_reduce_odd_count() {
        let values = (1..=5).map(TestMonoid).collect::<Vec<_>>();
        assert_eq!(TestMonoid::reduce(values), TestMonoid(15));
    }

    #[test]
    fn test_tree_reduce_preserves_order() {
        let parts = ["a", "b", "c", "d", "e", "f", "g"]
            .iter()
            .map(|s| Concat(s.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(Concat::reduce(parts), Concat("abcdefg".to_string()));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_par_reduce_matches_sequential() {
        let values = (1..=100).map(TestMonoid).collect::<Vec<_>>();
        assert_eq!(TestMonoid::par_reduce(values.clone()), TestMonoid::reduce(values));
    }
}
