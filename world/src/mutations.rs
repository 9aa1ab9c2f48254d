//! Deferred structural mutations of the entity registries.
//!
//! Entities are created and destroyed from inside the tick and collision
//! phases, while the registries are being walked. Those requests are written
//! to this log instead and applied, in order, at the single drain point that
//! closes every tick.

use std::collections::VecDeque;

use snake_arena_core::EntityId;

/// Registries an added entity joins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Registration {
    /// Ticked every step but never collided or painted.
    Tickable,
    /// Ticked, collided and painted.
    GameUnit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mutation {
    Add {
        entity: EntityId,
        registration: Registration,
    },
    Remove {
        entity: EntityId,
    },
}

#[derive(Debug, Default)]
pub(crate) struct MutationQueue {
    pending: VecDeque<Mutation>,
}

impl MutationQueue {
    pub(crate) fn push(&mut self, mutation: Mutation) {
        self.pending.push_back(mutation);
    }

    pub(crate) fn pop(&mut self) -> Option<Mutation> {
        self.pending.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
