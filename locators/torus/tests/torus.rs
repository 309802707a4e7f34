use std::{cell::Cell, collections::HashSet, rc::Rc};

use habitat_core::{seeded_rng, Agent, Locator, LocatorError, Position};
use habitat_locator_torus::TorusLocator;

#[derive(Debug, Default)]
struct Critter {
    dead: Cell<bool>,
}

impl Critter {
    fn spawn() -> Rc<Self> {
        Rc::new(Self::default())
    }

    fn kill(&self) {
        self.dead.set(true);
    }
}

impl Agent for Critter {
    fn is_dead(&self) -> bool {
        self.dead.get()
    }
}

fn torus(width: u32, height: u32, radius: u32) -> TorusLocator<Critter> {
    TorusLocator::seeded(width, height, radius, 0x0bad_5eed).expect("valid torus dimensions")
}

fn positions(coords: &[(u32, u32)]) -> HashSet<Position> {
    coords.iter().map(|&(x, y)| Position::new(x, y)).collect()
}

#[test]
fn explicit_placement_resolves_to_the_same_position() {
    let mut locator = torus(5, 4, 1);

    for y in 0..4 {
        for x in 0..5 {
            let agent = Critter::spawn();
            let position = Position::new(x, y);
            let placed = locator
                .add_agent(&agent, Some(position))
                .expect("slot starts empty");

            assert_eq!(placed, position);
            assert_eq!(locator.position_of(&agent), Some(position));
            locator.remove_agent(&agent).expect("removal succeeds");
        }
    }
}

#[test]
fn placing_on_an_occupied_slot_fails_without_changes() {
    let mut locator = torus(3, 3, 1);
    let resident = Critter::spawn();
    let intruder = Critter::spawn();
    let target = Position::new(2, 1);
    let _ = locator
        .add_agent(&resident, Some(target))
        .expect("slot starts empty");
    let empty_before = locator.get_empty_slots();

    let outcome = locator.add_agent(&intruder, Some(target));

    assert_eq!(
        outcome,
        Err(LocatorError::OccupiedSlot { position: target })
    );
    assert_eq!(locator.get_empty_slots(), empty_before);
    assert_eq!(locator.position_of(&resident), Some(target));
    assert_eq!(locator.position_of(&intruder), None);
}

#[test]
fn placing_outside_the_grid_is_rejected() {
    let mut locator = torus(3, 3, 1);
    let agent = Critter::spawn();

    let outcome = locator.add_agent(&agent, Some(Position::new(3, 0)));

    assert_eq!(
        outcome,
        Err(LocatorError::OutOfBounds {
            position: Position::new(3, 0),
            width: 3,
            height: 3,
        })
    );
    assert_eq!(locator.population(), 0);
}

#[test]
fn random_placement_consumes_one_empty_slot_until_full() {
    let mut locator = torus(3, 3, 1);
    let mut residents = Vec::new();

    for remaining in (1..=9).rev() {
        assert_eq!(locator.get_empty_slots().len(), remaining);
        let agent = Critter::spawn();
        let position = locator.add_agent(&agent, None).expect("space remains");
        assert_eq!(locator.occupant(position).map(|a| Rc::ptr_eq(&a, &agent)), Some(true));
        residents.push(agent);
    }

    assert!(locator.get_empty_slots().is_empty());
    let latecomer = Critter::spawn();
    assert_eq!(
        locator.add_agent(&latecomer, None),
        Err(LocatorError::FullSpace)
    );
}

#[test]
fn empty_slots_are_enumerated_column_by_column() {
    let mut locator = torus(3, 3, 1);
    let agent = Critter::spawn();
    let _ = locator
        .add_agent(&agent, Some(Position::new(1, 0)))
        .expect("slot starts empty");

    let expected: Vec<Position> = [(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)]
        .into_iter()
        .map(|(x, y)| Position::new(x, y))
        .collect();
    assert_eq!(locator.get_empty_slots(), expected);
}

#[test]
fn allowed_moves_cover_the_whole_neighbourhood() {
    let mut locator = torus(7, 5, 2);
    let agent = Critter::spawn();
    let center = Position::new(6, 1);
    let _ = locator
        .add_agent(&agent, Some(center))
        .expect("slot starts empty");

    let moves = locator.get_allowed_moves(&agent).expect("agent is placed");

    assert_eq!(moves.len(), 24);
    for position in &moves {
        let dx = (i64::from(position.x()) - 6).rem_euclid(7);
        let dy = (i64::from(position.y()) - 1).rem_euclid(5);
        assert!(dx <= 2 || dx >= 5, "column {position} is out of reach");
        assert!(dy <= 2 || dy >= 3, "row {position} is out of reach");
        assert_ne!(*position, center);
    }
    assert!(moves.contains(&Position::new(1, 4)), "wraps across both edges");
}

#[test]
fn allowed_moves_exclude_occupied_neighbours() {
    let mut locator = torus(7, 7, 1);
    let agent = Critter::spawn();
    let neighbour = Critter::spawn();
    let stranger = Critter::spawn();
    let _ = locator
        .add_agent(&agent, Some(Position::new(3, 3)))
        .expect("slot starts empty");
    let _ = locator
        .add_agent(&neighbour, Some(Position::new(4, 4)))
        .expect("slot starts empty");
    let _ = locator
        .add_agent(&stranger, Some(Position::new(0, 0)))
        .expect("slot starts empty");

    let moves = locator.get_allowed_moves(&agent).expect("agent is placed");

    assert_eq!(moves.len(), 7);
    assert!(!moves.contains(&Position::new(4, 4)));
}

#[test]
fn three_by_three_torus_scenario() {
    let mut locator = torus(3, 3, 1);
    let a = Critter::spawn();
    let b = Critter::spawn();
    let _ = locator
        .add_agent(&a, Some(Position::new(1, 1)))
        .expect("slot starts empty");

    let moves = locator.get_allowed_moves(&a).expect("agent is placed");
    assert_eq!(
        moves,
        positions(&[(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)])
    );

    let _ = locator
        .add_agent(&b, Some(Position::new(0, 0)))
        .expect("slot starts empty");
    let moves = locator.get_allowed_moves(&a).expect("agent is placed");
    assert_eq!(moves.len(), 7);
    assert!(!moves.contains(&Position::new(0, 0)));
}

#[test]
fn neighbourhoods_that_wrap_onto_themselves_are_rejected() {
    let outcome = TorusLocator::<Critter, _>::new(1, 1, 1, seeded_rng(1));
    assert_eq!(
        outcome.err(),
        Some(LocatorError::InvalidDimensions {
            width: 1,
            height: 1,
            radius: 1,
        })
    );

    assert!(TorusLocator::<Critter>::seeded(5, 4, 2, 1).is_err());
    assert!(TorusLocator::<Critter>::seeded(0, 3, 0, 1).is_err());
}

#[test]
fn single_cell_torus_with_zero_radius_is_isolated() {
    let mut locator = torus(1, 1, 0);
    let agent = Critter::spawn();

    assert_eq!(locator.add_agent(&agent, None), Ok(Position::new(0, 0)));
    assert!(locator.get_neighbour(&agent).is_none());
    assert!(locator
        .get_allowed_moves(&agent)
        .expect("agent is placed")
        .is_empty());
}

#[test]
fn eviction_of_dead_agents_is_durable() {
    let mut locator = torus(3, 3, 1);
    let a = Critter::spawn();
    let b = Critter::spawn();
    let _ = locator
        .add_agent(&a, Some(Position::new(1, 1)))
        .expect("slot starts empty");
    let _ = locator
        .add_agent(&b, Some(Position::new(0, 0)))
        .expect("slot starts empty");

    b.kill();
    assert!(locator.get_neighbour(&a).is_none(), "dead agents are never returned");

    assert!(locator.occupant(Position::new(0, 0)).is_none());
    assert!(locator.get_empty_slots().contains(&Position::new(0, 0)));
    assert_eq!(
        locator.get_allowed_moves(&a).expect("agent is placed").len(),
        8
    );
    assert_eq!(locator.position_of(&b), None);
}

#[test]
fn dropped_agents_are_evicted_like_dead_ones() {
    let mut locator = torus(3, 3, 1);
    let a = Critter::spawn();
    let _ = locator
        .add_agent(&a, Some(Position::new(1, 1)))
        .expect("slot starts empty");
    {
        let transient = Critter::spawn();
        let _ = locator
            .add_agent(&transient, Some(Position::new(2, 2)))
            .expect("slot starts empty");
    }

    assert_eq!(
        locator.get_allowed_moves(&a).expect("agent is placed").len(),
        8
    );
    assert_eq!(locator.population(), 1);
}

#[test]
fn removed_slot_becomes_empty() {
    let mut locator = torus(4, 4, 1);
    let agent = Critter::spawn();
    let position = locator.add_agent(&agent, None).expect("space remains");
    assert!(!locator.get_empty_slots().contains(&position));

    locator.remove_agent(&agent).expect("removal succeeds");

    assert!(locator.get_empty_slots().contains(&position));
    assert_eq!(locator.position_of(&agent), None);
}

#[test]
fn removing_an_unknown_agent_is_a_no_op() {
    let mut locator = torus(3, 3, 1);
    let stranger = Critter::spawn();

    assert_eq!(locator.remove_agent(&stranger), Ok(()));
    assert_eq!(locator.population(), 0);
}

#[test]
fn queries_place_unseen_agents() {
    let mut locator = torus(4, 4, 1);
    let unseen = Critter::spawn();

    let moves = locator.get_allowed_moves(&unseen).expect("space remains");

    let position = locator
        .position_of(&unseen)
        .expect("query inserted the agent");
    assert_eq!(moves.len(), 8);
    assert!(!moves.contains(&position));

    let other = Critter::spawn();
    let _ = locator.get_neighbour(&other);
    assert!(locator.position_of(&other).is_some());
    assert_eq!(locator.population(), 2);
}

#[test]
fn unresolvable_agent_has_no_neighbour() {
    let mut locator = torus(1, 1, 0);
    let resident = Critter::spawn();
    let _ = locator.add_agent(&resident, None).expect("space remains");

    let outsider = Critter::spawn();

    assert!(locator.get_neighbour(&outsider).is_none());
    assert_eq!(
        locator.get_allowed_moves(&outsider),
        Err(LocatorError::FullSpace)
    );
}

#[test]
fn neighbour_is_drawn_from_the_neighbourhood_only() {
    let mut locator = torus(9, 9, 1);
    let agent = Critter::spawn();
    let left = Critter::spawn();
    let right = Critter::spawn();
    let far = Critter::spawn();
    for (resident, position) in [
        (&agent, Position::new(0, 4)),
        (&left, Position::new(8, 4)),
        (&right, Position::new(1, 5)),
        (&far, Position::new(4, 4)),
    ] {
        let _ = locator
            .add_agent(resident, Some(position))
            .expect("slot starts empty");
    }

    let mut seen_left = false;
    let mut seen_right = false;
    for _ in 0..64 {
        let neighbour = locator.get_neighbour(&agent).expect("neighbours exist");
        assert!(!Rc::ptr_eq(&neighbour, &far));
        assert!(!Rc::ptr_eq(&neighbour, &agent));
        seen_left |= Rc::ptr_eq(&neighbour, &left);
        seen_right |= Rc::ptr_eq(&neighbour, &right);
    }
    assert!(seen_left && seen_right, "both neighbours should be drawn");
}

#[test]
fn seeded_locators_make_identical_choices() {
    let agents: Vec<Rc<Critter>> = (0..12).map(|_| Critter::spawn()).collect();
    let mut first = torus(5, 5, 1);
    let mut second = torus(5, 5, 1);

    let first_positions: Vec<Position> = agents
        .iter()
        .map(|agent| first.add_agent(agent, None).expect("space remains"))
        .collect();
    let second_positions: Vec<Position> = agents
        .iter()
        .map(|agent| second.add_agent(agent, None).expect("space remains"))
        .collect();

    assert_eq!(first_positions, second_positions);
}

#[test]
fn bulk_placement_stops_at_first_failure() {
    let mut locator = torus(2, 2, 0);
    let agents: Vec<Rc<Critter>> = (0..6).map(|_| Critter::spawn()).collect();

    let outcome = locator.add_all(&agents);

    assert_eq!(outcome.placed(), 4);
    assert_eq!(outcome.error(), Some(&LocatorError::FullSpace));
    assert!(locator.get_empty_slots().is_empty());
    assert!(agents[..4]
        .iter()
        .all(|agent| locator.position_of(agent).is_some()));
    assert_eq!(locator.position_of(&agents[4]), None);
}

#[test]
fn bulk_placement_reports_complete_batches() {
    let mut locator = torus(4, 4, 1);
    let agents: Vec<Rc<Critter>> = (0..5).map(|_| Critter::spawn()).collect();

    let outcome = locator.add_all(&agents);

    assert!(outcome.is_complete());
    assert_eq!(outcome.placed(), 5);
    assert_eq!(locator.get_empty_slots().len(), 11);
}

#[test]
fn re_adding_an_agent_moves_it() {
    let mut locator = torus(3, 3, 1);
    let agent = Critter::spawn();
    let _ = locator
        .add_agent(&agent, Some(Position::new(0, 0)))
        .expect("slot starts empty");

    let _ = locator
        .add_agent(&agent, Some(Position::new(2, 2)))
        .expect("slot starts empty");

    assert_eq!(locator.population(), 1);
    assert_eq!(locator.position_of(&agent), Some(Position::new(2, 2)));
    assert!(locator.occupant(Position::new(0, 0)).is_none());
}

#[test]
fn empty_slots_of_a_wide_grid_follow_columns() {
    let mut locator = torus(4, 3, 1);
    let agent = Critter::spawn();
    let _ = locator
        .add_agent(&agent, Some(Position::new(0, 1)))
        .expect("slot starts empty");

    let empty = locator.get_empty_slots();

    assert_eq!(empty.len(), 11);
    assert_eq!(&empty[..3], &[Position::new(0, 0), Position::new(0, 2), Position::new(1, 0)]);
    assert_eq!(empty.last(), Some(&Position::new(3, 2)));
}
