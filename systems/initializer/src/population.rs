use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    fmt,
    rc::{Rc, Weak},
};

use habitat_core::{Agent, Lineage};

/// Unique address assigned to a specimen within its population.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentAddress(u64);

impl AgentAddress {
    /// Creates an address with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the address.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AgentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent.{}", self.0)
    }
}

/// Agent carrying a genotype and its starting energy.
///
/// The dead flag is set from outside; locators observe it and drop the
/// specimen from their slots.
#[derive(Debug)]
pub struct Specimen<G> {
    address: AgentAddress,
    genotype: G,
    energy: f64,
    dead: Cell<bool>,
    parent: Weak<Population<G>>,
}

impl<G> Specimen<G> {
    /// Address of the specimen within its population.
    #[must_use]
    pub const fn address(&self) -> AgentAddress {
        self.address
    }

    /// Genotype the specimen was created with.
    #[must_use]
    pub const fn genotype(&self) -> &G {
        &self.genotype
    }

    /// Energy the specimen was created with.
    #[must_use]
    pub const fn energy(&self) -> f64 {
        self.energy
    }

    /// Marks the specimen as dead.
    pub fn kill(&self) {
        self.dead.set(true);
    }
}

impl<G> Agent for Specimen<G> {
    fn is_dead(&self) -> bool {
        self.dead.get()
    }
}

impl<G> Lineage for Specimen<G> {
    fn siblings(&self) -> Vec<Rc<Self>> {
        self.parent
            .upgrade()
            .map(|population| population.members())
            .unwrap_or_default()
    }
}

/// Shared collection owning the specimens of a simulation run.
#[derive(Debug)]
pub struct Population<G> {
    members: RefCell<BTreeMap<AgentAddress, Rc<Specimen<G>>>>,
    next_address: Cell<u64>,
}

impl<G> Population<G> {
    /// Creates an empty population.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            members: RefCell::new(BTreeMap::new()),
            next_address: Cell::new(0),
        })
    }

    /// Creates a specimen owned by this population and returns its handle.
    pub fn spawn(self: &Rc<Self>, genotype: G, energy: f64) -> Rc<Specimen<G>> {
        let address = AgentAddress::new(self.next_address.get());
        self.next_address.set(address.get() + 1);
        let specimen = Rc::new(Specimen {
            address,
            genotype,
            energy,
            dead: Cell::new(false),
            parent: Rc::downgrade(self),
        });
        let _ = self
            .members
            .borrow_mut()
            .insert(address, Rc::clone(&specimen));
        specimen
    }

    /// Handles to every member, ordered by address.
    #[must_use]
    pub fn members(&self) -> Vec<Rc<Specimen<G>>> {
        self.members.borrow().values().cloned().collect()
    }

    /// Looks up a member by address.
    #[must_use]
    pub fn get(&self, address: AgentAddress) -> Option<Rc<Specimen<G>>> {
        self.members.borrow().get(&address).cloned()
    }

    /// Detaches a member from the population.
    pub fn remove(&self, address: AgentAddress) -> Option<Rc<Specimen<G>>> {
        self.members.borrow_mut().remove(&address)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    /// Reports whether the population has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.borrow().is_empty()
    }
}
