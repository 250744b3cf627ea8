//! Dominator and layering computation over a partial order.
//!
//! Given a set of items and an `implies` predicate (reflexive, transitive,
//! not necessarily total), [`Implication::dominators`] finds the maximal
//! antichain of most specific items and [`Implication::layers`] peels such
//! antichains off repeatedly, most specific first.

/// A partial order described by its `implies` predicate.
///
/// `implies(a, b)` reads "a is at least as specific as b".
#[derive(Debug, Clone, Copy)]
pub struct Implication<F> {
    test: F,
}

impl<F> Implication<F> {
    /// Wrap an `implies` predicate.
    pub const fn new(test: F) -> Self {
        Self { test }
    }

    /// Find the most specific items.
    ///
    /// Returns indices into `candidates`, in input order, of every item that
    /// no other item strictly implies. Items that imply each other without
    /// being equal, or that are incomparable, all survive; that is exactly
    /// the situation reported as an ambiguity.
    ///
    /// One pass: each new item is compared against the current frontier.
    /// If it strictly implies a frontier item, that item is dropped; if a
    /// frontier item strictly implies it, the new item is discarded.
    pub fn dominators<E>(&self, candidates: &[E]) -> Vec<usize>
    where
        F: Fn(&E, &E) -> bool,
    {
        let mut best: Vec<usize> = Vec::new();

        'candidates: for (index, item) in candidates.iter().enumerate() {
            let mut k = 0;
            while k < best.len() {
                let old = &candidates[best[k]];
                let new_implies_old = (self.test)(item, old);
                let old_implies_new = (self.test)(old, item);

                if new_implies_old && !old_implies_new {
                    best.remove(k);
                    continue;
                }
                if old_implies_new && !new_implies_old {
                    continue 'candidates;
                }
                k += 1;
            }
            best.push(index);
        }

        // Removals and pushes keep `best` sorted by input index.
        best
    }

    /// Partition `input` into layers of decreasing specificity.
    ///
    /// Each layer is an antichain, and no item in a later layer implies an
    /// item in an earlier one. Items keep their input order within a layer.
    pub fn layers<E: Clone>(&self, input: &[E]) -> Vec<Vec<E>>
    where
        F: Fn(&E, &E) -> bool,
    {
        let mut remaining: Vec<E> = input.to_vec();
        let mut layers = Vec::new();

        while !remaining.is_empty() {
            let best = self.dominators(&remaining);
            debug_assert!(!best.is_empty(), "a non-empty set has a dominator");

            let mut selected = vec![false; remaining.len()];
            for &i in &best {
                selected[i] = true;
            }

            let mut layer = Vec::with_capacity(best.len());
            let mut rest = Vec::with_capacity(remaining.len() - best.len());
            for (item, chosen) in remaining.into_iter().zip(selected) {
                if chosen {
                    layer.push(item);
                } else {
                    rest.push(item);
                }
            }

            layers.push(layer);
            remaining = rest;
        }

        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Divisibility: `a` implies `b` when `b` divides `a`.
    fn divides(a: &u32, b: &u32) -> bool {
        a % b == 0
    }

    #[test]
    fn test_empty() {
        let order = Implication::new(divides);
        assert!(order.dominators::<u32>(&[]).is_empty());
        assert!(order.layers::<u32>(&[]).is_empty());
    }

    #[test]
    fn test_chain() {
        let order = Implication::new(divides);
        let layers = order.layers(&[2, 8, 4]);
        assert_eq!(layers, vec![vec![8], vec![4], vec![2]]);
    }

    #[test]
    fn test_antichain_survives_together() {
        let order = Implication::new(divides);
        let items = [2, 3, 6, 5];

        assert_eq!(order.dominators(&items), vec![2, 3]);
        assert_eq!(order.layers(&items), vec![vec![6, 5], vec![2, 3]]);
    }

    #[test]
    fn test_dominated_late_arrival_discarded() {
        let order = Implication::new(divides);
        // 12 arrives first; 4 and 6 are both dominated by it.
        assert_eq!(order.dominators(&[12, 4, 6]), vec![0]);
    }

    #[test]
    fn test_mutual_implication_keeps_both() {
        // Every item implies every other: all tie.
        let order = Implication::new(|_: &u32, _: &u32| true);
        assert_eq!(order.dominators(&[1, 2, 3]), vec![0, 1, 2]);
        assert_eq!(order.layers(&[1, 2, 3]), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_layers_skip_incomparable_ranks() {
        let order = Implication::new(divides);
        // 30 dominates 6 and 10; 7 is incomparable with all of them.
        let layers = order.layers(&[6, 7, 30, 10, 2]);
        assert_eq!(layers, vec![vec![7, 30], vec![6, 10], vec![2]]);
    }
}
