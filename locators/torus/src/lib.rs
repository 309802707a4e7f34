#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Toroidal grid locator.
//!
//! Agents live in a fixed-size grid whose edges wrap around. The grid keeps
//! no reverse index from agent to slot: resolving an agent scans the cells
//! with the column as the outer index, and an agent that cannot be found is placed at a
//! random empty slot on the spot. Every neighbourhood query first sweeps the
//! whole grid and clears the slots of agents that died or were dropped.

use std::{
    collections::HashSet,
    fmt,
    rc::{Rc, Weak},
};

use habitat_core::{seeded_rng, Agent, DefaultRng, Locator, LocatorError, Position, Result};
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, trace};

/// Locator backed by a wraparound grid with radius-bounded neighbourhoods.
pub struct TorusLocator<A, R = DefaultRng> {
    width: u32,
    height: u32,
    radius: u32,
    cells: Vec<Option<Weak<A>>>,
    rng: R,
}

impl<A: Agent> TorusLocator<A, DefaultRng> {
    /// Creates a locator whose random choices derive from `seed`.
    pub fn seeded(width: u32, height: u32, radius: u32, seed: u64) -> Result<Self> {
        Self::new(width, height, radius, seeded_rng(seed))
    }
}

impl<A: Agent, R: Rng> TorusLocator<A, R> {
    /// Creates an empty grid of `width` columns and `height` rows.
    ///
    /// Both dimensions must be at least `2 * radius + 1` so that no
    /// neighbourhood wraps onto itself.
    pub fn new(width: u32, height: u32, radius: u32, rng: R) -> Result<Self> {
        let invalid = LocatorError::InvalidDimensions {
            width,
            height,
            radius,
        };
        let extent = u64::from(radius) * 2 + 1;
        if u64::from(width) < extent || u64::from(height) < extent {
            return Err(invalid);
        }
        let capacity =
            usize::try_from(u64::from(width) * u64::from(height)).map_err(|_| invalid)?;

        Ok(Self {
            width,
            height,
            radius,
            cells: vec![None; capacity],
            rng,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Chebyshev radius of every neighbourhood.
    #[must_use]
    pub const fn radius(&self) -> u32 {
        self.radius
    }

    /// Returns the live agent held at `position`, if any.
    #[must_use]
    pub fn occupant(&self, position: Position) -> Option<Rc<A>> {
        self.index(position)
            .and_then(|index| self.cells[index].as_ref())
            .and_then(Weak::upgrade)
    }

    /// Finds the slot held by `agent` without placing it when absent.
    #[must_use]
    pub fn position_of(&self, agent: &Rc<A>) -> Option<Position> {
        self.cells
            .iter()
            .position(|cell| holds(cell, agent))
            .and_then(|index| self.position_at(index))
    }

    /// Number of occupied slots, including ones not yet swept.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.x() < self.width && position.y() < self.height {
            let column = usize::try_from(position.x()).ok()?;
            let row = usize::try_from(position.y()).ok()?;
            let height = usize::try_from(self.height).ok()?;
            Some(column * height + row)
        } else {
            None
        }
    }

    fn position_at(&self, index: usize) -> Option<Position> {
        let height = usize::try_from(self.height).ok()?;
        let column = u32::try_from(index / height).ok()?;
        let row = u32::try_from(index % height).ok()?;
        Some(Position::new(column, row))
    }

    fn is_vacant(&self, position: Position) -> bool {
        self.index(position)
            .map_or(false, |index| self.cells[index].is_none())
    }

    fn resolve(&mut self, agent: &Rc<A>) -> Result<Position> {
        if let Some(position) = self.position_of(agent) {
            return Ok(position);
        }
        let position = self.add_agent(agent, None)?;
        debug!(%position, "placed previously unseen agent");
        Ok(position)
    }

    fn neighbour_positions(&self, center: Position) -> Vec<Position> {
        let radius = i64::from(self.radius);
        let width = i64::from(self.width);
        let height = i64::from(self.height);
        let x = i64::from(center.x());
        let y = i64::from(center.y());

        let mut positions = Vec::new();
        for i in (x - radius)..=(x + radius) {
            for j in (y - radius)..=(y + radius) {
                if i == x && j == y {
                    continue;
                }
                positions.push(Position::new(
                    i.rem_euclid(width) as u32,
                    j.rem_euclid(height) as u32,
                ));
            }
        }
        positions
    }

    fn remove_dead(&mut self) {
        let mut evicted = 0_usize;
        for cell in &mut self.cells {
            let dead = cell
                .as_ref()
                .map_or(false, |weak| weak.upgrade().map_or(true, |agent| agent.is_dead()));
            if dead {
                *cell = None;
                evicted += 1;
            }
        }
        if evicted > 0 {
            debug!(evicted, "evicted dead agents from torus");
        }
    }
}

impl<A: Agent, R: Rng> Locator<A> for TorusLocator<A, R> {
    type Slot = Position;

    fn get_neighbour(&mut self, agent: &Rc<A>) -> Option<Rc<A>> {
        self.remove_dead();
        let center = match self.resolve(agent) {
            Ok(position) => position,
            Err(error) => {
                debug!(%error, "could not resolve agent on torus");
                return None;
            }
        };
        let neighbours: Vec<Rc<A>> = self
            .neighbour_positions(center)
            .into_iter()
            .filter_map(|position| self.occupant(position))
            .collect();
        neighbours.choose(&mut self.rng).cloned()
    }

    fn get_empty_slots(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .filter_map(|(index, _)| self.position_at(index))
            .collect()
    }

    /// Placing an agent that already holds a slot moves it to the new one.
    fn add_agent(&mut self, agent: &Rc<A>, slot: Option<Position>) -> Result<Position> {
        let position = match slot {
            Some(position) => position,
            None => *self
                .get_empty_slots()
                .choose(&mut self.rng)
                .ok_or(LocatorError::FullSpace)?,
        };
        let index = self.index(position).ok_or(LocatorError::OutOfBounds {
            position,
            width: self.width,
            height: self.height,
        })?;
        if self.cells[index].is_some() {
            return Err(LocatorError::OccupiedSlot { position });
        }

        if let Some(previous) = self.position_of(agent) {
            if let Some(previous_index) = self.index(previous) {
                self.cells[previous_index] = None;
            }
        }
        self.cells[index] = Some(Rc::downgrade(agent));
        trace!(%position, "placed agent on torus");
        Ok(position)
    }

    /// Removing an agent the grid does not hold is a no-op.
    fn remove_agent(&mut self, agent: &Rc<A>) -> Result<()> {
        if let Some(index) = self.cells.iter().position(|cell| holds(cell, agent)) {
            self.cells[index] = None;
        }
        Ok(())
    }

    fn get_allowed_moves(&mut self, agent: &Rc<A>) -> Result<HashSet<Position>> {
        self.remove_dead();
        let center = self.resolve(agent)?;
        Ok(self
            .neighbour_positions(center)
            .into_iter()
            .filter(|position| self.is_vacant(*position))
            .collect())
    }
}

impl<A, R> fmt::Debug for TorusLocator<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TorusLocator")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("radius", &self.radius)
            .field(
                "occupied",
                &self.cells.iter().filter(|cell| cell.is_some()).count(),
            )
            .finish_non_exhaustive()
    }
}

fn holds<A>(cell: &Option<Weak<A>>, agent: &Rc<A>) -> bool {
    cell.as_ref()
        .map_or(false, |weak| std::ptr::eq(weak.as_ptr(), Rc::as_ptr(agent)))
}
