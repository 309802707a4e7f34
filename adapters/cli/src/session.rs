use std::{fmt, rc::Rc};

use habitat_core::Locator;
use habitat_system_initializer::{PointGenotype, Population, Specimen};
use tracing::{info, warn};

type Member = Specimen<PointGenotype>;

/// Seeds a population into a locator and drives interaction rounds.
pub(crate) struct Session<L> {
    locator: L,
    members: Vec<Rc<Member>>,
}

impl<L: Locator<Member>> Session<L> {
    pub(crate) fn new(locator: L, population: &Population<PointGenotype>) -> Self {
        Self {
            locator,
            members: population.members(),
        }
    }

    pub(crate) fn run(mut self, rounds: usize) -> Report {
        let placement = self.locator.add_all(&self.members);
        let placed = placement.placed();
        info!(placed, requested = self.members.len(), "agents placed");

        let mut encounters = 0;
        let mut open_moves = 0;
        for _ in 0..rounds {
            for member in &self.members[..placed] {
                if self.locator.get_neighbour(member).is_some() {
                    encounters += 1;
                }
                match self.locator.get_allowed_moves(member) {
                    Ok(moves) => open_moves += moves.len(),
                    Err(error) => warn!(address = %member.address(), %error, "no moves resolved"),
                }
            }
        }

        Report {
            requested: self.members.len(),
            placed,
            rounds,
            encounters,
            open_moves,
            empty_slots: self.locator.get_empty_slots().len(),
        }
    }
}

/// Summary printed once a session finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Report {
    requested: usize,
    placed: usize,
    rounds: usize,
    encounters: usize,
    open_moves: usize,
    empty_slots: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "placed {} of {} agents", self.placed, self.requested)?;
        writeln!(
            f,
            "{} rounds: {} encounters, {} open moves",
            self.rounds, self.encounters, self.open_moves
        )?;
        write!(f, "{} empty slots remain", self.empty_slots)
    }
}
