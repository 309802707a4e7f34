#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the habitat spatial substrate.
//!
//! This crate defines the surface that connects simulations to the
//! strategies tracking where their agents live. Agents are shared through
//! [`Rc`] handles and compared by identity; strategies implement the
//! [`Locator`] capability set and keep only non-owning references to the
//! agents they place, evicting the ones that report themselves dead.

use std::{collections::HashSet, fmt, hash::Hash, rc::Rc};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Random source used by locators unless a caller injects another one.
pub type DefaultRng = ChaCha8Rng;

/// Creates the deterministic random source associated with `seed`.
#[must_use]
pub fn seeded_rng(seed: u64) -> DefaultRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Location of a single grid slot expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the position.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row of the position.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Capability every entity must expose to be tracked by a locator.
pub trait Agent {
    /// Reports whether the agent should no longer be considered present.
    fn is_dead(&self) -> bool;
}

/// Access to the collection an agent was spawned into.
///
/// Strategies without spatial state use it to pick interaction partners.
pub trait Lineage: Agent {
    /// Returns every member of the agent's parent collection, itself included.
    fn siblings(&self) -> Vec<Rc<Self>>;
}

/// Errors emitted by locator implementations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LocatorError {
    /// An explicit placement targeted a slot that already holds an agent.
    #[error("position occupied: {position}")]
    OccupiedSlot {
        /// Slot that was requested.
        position: Position,
    },
    /// A random placement was requested but no empty slot remains.
    #[error("could not add agent to a full space")]
    FullSpace,
    /// An explicit placement targeted a slot outside the grid.
    #[error("position {position} lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Slot that was requested.
        position: Position,
        /// Number of columns in the grid.
        width: u32,
        /// Number of rows in the grid.
        height: u32,
    },
    /// Grid dimensions cannot host a neighbourhood of the configured radius.
    #[error("a {width}x{height} grid cannot host neighbourhoods of radius {radius}")]
    InvalidDimensions {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
        /// Requested neighbourhood radius.
        radius: u32,
    },
}

/// Result alias used by locator operations.
pub type Result<T> = std::result::Result<T, LocatorError>;

/// Outcome of placing a batch of agents.
///
/// Placement stops at the first failure and never rolls back the agents
/// that were already placed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct BulkPlacement {
    placed: usize,
    error: Option<LocatorError>,
}

impl BulkPlacement {
    /// Describes a batch in which every agent was placed.
    pub const fn complete(placed: usize) -> Self {
        Self {
            placed,
            error: None,
        }
    }

    /// Describes a batch that stopped after `placed` agents because of `error`.
    pub const fn interrupted(placed: usize, error: LocatorError) -> Self {
        Self {
            placed,
            error: Some(error),
        }
    }

    /// Number of agents placed before the batch finished or stopped.
    #[must_use]
    pub const fn placed(&self) -> usize {
        self.placed
    }

    /// Failure that stopped the batch, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&LocatorError> {
        self.error.as_ref()
    }

    /// Reports whether every agent in the batch was placed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Capability set every spatial strategy implements.
///
/// Agents are identified by the allocation behind their [`Rc`] handle, never
/// by value. Implementations hold non-owning references only.
pub trait Locator<A: Agent> {
    /// Address of a single place an agent can occupy.
    type Slot: Copy + Eq + Hash + fmt::Debug;

    /// Returns one valid neighbour of `agent`, chosen uniformly at random.
    fn get_neighbour(&mut self, agent: &Rc<A>) -> Option<Rc<A>>;

    /// Enumerates every unoccupied slot in a stable order.
    fn get_empty_slots(&self) -> Vec<Self::Slot>;

    /// Places `agent` at `slot`, or at a random empty slot when `slot` is `None`.
    fn add_agent(&mut self, agent: &Rc<A>, slot: Option<Self::Slot>) -> Result<Self::Slot>;

    /// Places every agent at a random slot, stopping at the first failure.
    fn add_all(&mut self, agents: &[Rc<A>]) -> BulkPlacement {
        for (placed, agent) in agents.iter().enumerate() {
            if let Err(error) = self.add_agent(agent, None) {
                warn!(
                    placed,
                    requested = agents.len(),
                    %error,
                    "could not add all agents to locator"
                );
                return BulkPlacement::interrupted(placed, error);
            }
        }
        BulkPlacement::complete(agents.len())
    }

    /// Clears the slot held by `agent`.
    fn remove_agent(&mut self, agent: &Rc<A>) -> Result<()>;

    /// Returns the empty neighbouring slots `agent` could move into.
    fn get_allowed_moves(&mut self, agent: &Rc<A>) -> Result<HashSet<Self::Slot>>;
}

const DEFAULT_EXTENT: u32 = 10;
const DEFAULT_RADIUS: u32 = 1;

/// Selects the locator strategy a simulation run is assembled with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum LocatorConfig {
    /// Fixed-size grid with wraparound edges.
    Torus {
        /// Number of columns in the grid.
        #[serde(default = "default_extent")]
        width: u32,
        /// Number of rows in the grid.
        #[serde(default = "default_extent")]
        height: u32,
        /// Chebyshev radius of every neighbourhood.
        #[serde(default = "default_radius")]
        radius: u32,
        /// Seed for neighbour and placement selection.
        #[serde(default)]
        seed: u64,
    },
    /// Non-spatial strategy picking partners among siblings.
    Random {
        /// Seed for neighbour selection.
        #[serde(default)]
        seed: u64,
    },
}

impl LocatorConfig {
    /// Seed feeding the random source of the configured strategy.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        match self {
            Self::Torus { seed, .. } | Self::Random { seed } => *seed,
        }
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self::Torus {
            width: DEFAULT_EXTENT,
            height: DEFAULT_EXTENT,
            radius: DEFAULT_RADIUS,
            seed: 0,
        }
    }
}

const fn default_extent() -> u32 {
    DEFAULT_EXTENT
}

const fn default_radius() -> u32 {
    DEFAULT_RADIUS
}
