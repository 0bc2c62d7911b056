use antsim_core::{AgentId, ColonyId, Vec2};
use antsim_grid::{ClaimOutcome, MarkerChannel, MarkerDecay, SpatialGrid};

fn grid() -> SpatialGrid {
    SpatialGrid::new(16, 16, 2.0, 2, MarkerDecay::new(0.5, 0.2, 1.0, 0.01))
}

#[test]
fn decay_multiplies_by_channel_factor() {
    let mut g = grid();
    let p = Vec2::new(3.0, 3.0);
    for channel in MarkerChannel::ALL {
        g.deposit_marker(p, channel, ColonyId(0), 10.0);
    }

    let dt = 0.25;
    g.decay_tick(dt);

    for channel in MarkerChannel::ALL {
        let expected = 10.0 * g.decay().factor(channel, dt);
        let actual = g.intensity(p, channel, ColonyId(0));
        assert!((actual - expected).abs() < 1e-5, "{channel:?}: {actual} vs {expected}");
    }
}

#[test]
fn repeated_decay_is_monotone_and_never_negative() {
    let mut g = grid();
    let p = Vec2::new(9.0, 9.0);
    g.deposit_marker(p, MarkerChannel::ToEnemy, ColonyId(1), 100.0);

    let mut previous = g.intensity(p, MarkerChannel::ToEnemy, ColonyId(1));
    for _ in 0..2_000 {
        g.decay_tick(0.1);
        let current = g.intensity(p, MarkerChannel::ToEnemy, ColonyId(1));
        assert!(current <= previous);
        assert!(current >= 0.0);
        previous = current;
    }
    assert!(previous < 1e-6);
}

#[test]
fn at_most_one_occupant_per_non_fighting_slot() {
    let mut g = grid();
    let p = Vec2::new(5.0, 5.0);
    let a = AgentId::new(0, 0);
    let b = AgentId::new(1, 0);

    assert_eq!(g.claim_occupancy(p, a, ColonyId(0), false), ClaimOutcome::Claimed);
    assert_eq!(g.claim_occupancy(p, b, ColonyId(0), false), ClaimOutcome::Claimed);
    assert_eq!(g.occupancy(p, ColonyId(0)).and_then(|o| o.agent), Some(b));

    // Stale release by `a` must not evict `b`.
    g.release_occupancy(p, a, ColonyId(0));
    assert_eq!(g.occupancy(p, ColonyId(0)).and_then(|o| o.agent), Some(b));

    g.release_occupancy(p, b, ColonyId(0));
    assert_eq!(g.occupancy(p, ColonyId(0)).and_then(|o| o.agent), None);
}

#[test]
fn fighting_slot_is_not_reassigned_to_a_third_agent() {
    let mut g = grid();
    let p = Vec2::new(5.0, 5.0);
    let fighter = AgentId::new(0, 0);
    let passer = AgentId::new(1, 0);

    assert_eq!(g.claim_occupancy(p, fighter, ColonyId(0), true), ClaimOutcome::Claimed);
    assert_eq!(g.claim_occupancy(p, passer, ColonyId(0), false), ClaimOutcome::Blocked);
    assert_eq!(g.occupancy(p, ColonyId(0)).and_then(|o| o.agent), Some(fighter));

    // The fighter itself may clear its flag once the fight ends.
    assert_eq!(g.claim_occupancy(p, fighter, ColonyId(0), false), ClaimOutcome::Claimed);
    assert_eq!(g.claim_occupancy(p, passer, ColonyId(0), false), ClaimOutcome::Claimed);
}

#[test]
fn claim_outside_world_is_reported() {
    let mut g = grid();
    let outcome = g.claim_occupancy(Vec2::new(-1.0, 5.0), AgentId::new(0, 0), ColonyId(0), false);
    assert_eq!(outcome, ClaimOutcome::OutOfBounds);
    // Releasing outside the world is a silent no-op.
    g.release_occupancy(Vec2::new(-1.0, 5.0), AgentId::new(0, 0), ColonyId(0));
}

#[test]
fn enemies_around_skips_own_colony() {
    let mut g = grid();
    let p = Vec2::new(10.0, 10.0);
    let ally = AgentId::new(0, 0);
    let enemy = AgentId::new(4, 1);
    let _ = g.claim_occupancy(p, ally, ColonyId(0), false);
    let _ = g.claim_occupancy(Vec2::new(11.5, 10.0), enemy, ColonyId(1), false);

    let found = g.enemies_around(p, ColonyId(0));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].agent, enemy);
    assert_eq!(found[0].colony, ColonyId(1));
    assert!(g.enemies_around(Vec2::new(30.0, 30.0), ColonyId(0)).is_empty());
}
