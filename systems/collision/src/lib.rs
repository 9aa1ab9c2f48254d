#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pairwise collision detection over a snapshot of active game units.
//!
//! The scan is quadratic in the number of units. Populations are one snake
//! and a handful of food items, so no spatial index is maintained.

use snake_arena_core::{CellCoord, EntityId};

/// Footprint of a single game unit captured at the start of the phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collider {
    /// Identifier of the unit.
    pub id: EntityId,
    /// Cells the unit occupies.
    pub cells: Vec<CellCoord>,
}

impl Collider {
    /// Creates a collider from an identifier and its occupied cells.
    #[must_use]
    pub fn new(id: EntityId, cells: Vec<CellCoord>) -> Self {
        Self { id, cells }
    }

    /// Reports whether the two footprints share at least one cell.
    #[must_use]
    pub fn overlaps(&self, other: &Collider) -> bool {
        self.cells
            .iter()
            .any(|cell| other.cells.iter().any(|candidate| candidate == cell))
    }
}

/// Two overlapping units, in snapshot order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Contact {
    /// Unit that appeared first in the snapshot.
    pub first: EntityId,
    /// Unit that appeared later in the snapshot.
    pub second: EntityId,
}

/// Emits one [`Contact`] for every unordered overlapping pair.
///
/// Pairs are visited as `(i, j)` with `i < j`, so each pair is reported
/// exactly once regardless of how many cells the footprints share.
pub fn detect(snapshot: &[Collider], out: &mut Vec<Contact>) {
    for (index, first) in snapshot.iter().enumerate() {
        for second in &snapshot[index + 1..] {
            if first.overlaps(second) || second.overlaps(first) {
                out.push(Contact {
                    first: first.id,
                    second: second.id,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_footprints_never_overlap() {
        let left = Collider::new(EntityId::new(0), Vec::new());
        let right = Collider::new(EntityId::new(1), vec![CellCoord::new(0, 0)]);
        assert!(!left.overlaps(&right));
        assert!(!right.overlaps(&left));
    }

    #[test]
    fn single_unit_produces_no_contacts() {
        let mut contacts = Vec::new();
        detect(
            &[Collider::new(EntityId::new(3), vec![CellCoord::new(1, 1)])],
            &mut contacts,
        );
        assert!(contacts.is_empty());
    }
}
