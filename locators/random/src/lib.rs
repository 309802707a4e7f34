#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Non-spatial locator that pairs agents with random siblings.

use std::{collections::HashSet, rc::Rc};

use habitat_core::{seeded_rng, DefaultRng, Lineage, Locator, Result};
use rand::{seq::SliceRandom, Rng};

/// Strategy for simulations without spatial semantics.
///
/// Membership belongs to each agent's parent collection, so the locator
/// owns no placement state: it has no slots, placement always succeeds and
/// removal does nothing.
#[derive(Debug)]
pub struct RandomLocator<R = DefaultRng> {
    rng: R,
}

impl RandomLocator<DefaultRng> {
    /// Creates a locator whose choices derive from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(seeded_rng(seed))
    }
}

impl<R: Rng> RandomLocator<R> {
    /// Creates a locator drawing from the provided random source.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<A: Lineage, R: Rng> Locator<A> for RandomLocator<R> {
    type Slot = ();

    fn get_neighbour(&mut self, agent: &Rc<A>) -> Option<Rc<A>> {
        let siblings = agent.siblings();
        if siblings.len() < 2 {
            return None;
        }
        let others: Vec<Rc<A>> = siblings
            .into_iter()
            .filter(|sibling| !Rc::ptr_eq(sibling, agent))
            .collect();
        others.choose(&mut self.rng).cloned()
    }

    fn get_empty_slots(&self) -> Vec<()> {
        Vec::new()
    }

    fn add_agent(&mut self, _agent: &Rc<A>, _slot: Option<()>) -> Result<()> {
        Ok(())
    }

    fn remove_agent(&mut self, _agent: &Rc<A>) -> Result<()> {
        Ok(())
    }

    fn get_allowed_moves(&mut self, _agent: &Rc<A>) -> Result<HashSet<()>> {
        Ok(HashSet::new())
    }
}
