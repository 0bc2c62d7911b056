//! Cross-colony combat: the start-of-tick roster, fight pairing and deferred
//! strikes.

use std::collections::BTreeSet;

use antsim_core::{AntRef, Vec2};

use crate::agent::{FightMode, Phase, Strike};
use crate::colony::Colony;

/// What the pairing pass may know about another agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterEntry {
    pub position: Vec2,
    pub mode: FightMode,
    pub phase: Phase,
}

/// Liveness and pre-tick state of every agent, captured before the pairing
/// pass.
///
/// Indexed like the colonies' slot tables: `colonies[c][slot]` holds the
/// generation that was live at capture time. Weak references are resolved
/// here by index + generation, never by reaching into another colony.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    colonies: Vec<Vec<Option<(u32, RosterEntry)>>>,
}

impl Roster {
    pub fn capture(colonies: &[Colony]) -> Self {
        let colonies = colonies
            .iter()
            .map(|colony| {
                let agents = colony.agents();
                let mut slots = vec![None; agents.capacity_slots()];
                for (id, agent) in agents.iter_ordered() {
                    if agent.is_dead() {
                        continue;
                    }
                    slots[id.index as usize] = Some((
                        id.generation,
                        RosterEntry {
                            position: agent.position,
                            mode: agent.combat.mode,
                            phase: agent.phase,
                        },
                    ));
                }
                slots
            })
            .collect();
        Self { colonies }
    }

    pub fn resolve(&self, r: AntRef) -> Option<&RosterEntry> {
        let (generation, entry) = self
            .colonies
            .get(r.colony.index())?
            .get(r.id.index as usize)?
            .as_ref()?;
        (*generation == r.id.generation).then_some(entry)
    }

    pub fn is_live(&self, r: AntRef) -> bool {
        self.resolve(r).is_some()
    }

    pub fn len(&self) -> usize {
        self.colonies
            .iter()
            .map(|slots| slots.iter().filter(|s| s.is_some()).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An agent asking to fight `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FightRequest {
    pub from: AntRef,
    pub target: AntRef,
}

/// Upgrades pending requests to fights, in request order.
///
/// Each agent joins at most one pair per pass; an opponent already fighting
/// before the tick is left alone. Both members receive the midpoint of their
/// pre-tick positions as anchor and opposite engagement axes. Returns the
/// number of pairs formed.
pub fn pair_fights(requests: &[FightRequest], roster: &Roster, colonies: &mut [Colony]) -> usize {
    let mut engaged: BTreeSet<AntRef> = BTreeSet::new();
    let mut pairs = 0;

    for request in requests {
        if engaged.contains(&request.from) || engaged.contains(&request.target) {
            continue;
        }
        let (Some(a), Some(b)) = (roster.resolve(request.from), roster.resolve(request.target))
        else {
            continue;
        };
        if a.mode == FightMode::Fighting || b.mode == FightMode::Fighting {
            continue;
        }

        let anchor = a.position.lerp(b.position, 0.5);
        let mut axis = (b.position - a.position).normalized();
        if axis == Vec2::ZERO {
            axis = Vec2::new(1.0, 0.0);
        }

        let Some(first) = colonies
            .get_mut(request.from.colony.index())
            .and_then(|c| c.agent_mut(request.from.id))
        else {
            continue;
        };
        first.engage(request.target, anchor, axis);

        if let Some(second) = colonies
            .get_mut(request.target.colony.index())
            .and_then(|c| c.agent_mut(request.target.id))
        {
            second.engage(request.from, anchor, -axis);
        }

        engaged.insert(request.from);
        engaged.insert(request.target);
        pairs += 1;
        tracing::debug!(
            a = ?request.from,
            b = ?request.target,
            x = anchor.x,
            y = anchor.y,
            "fight paired"
        );
    }

    pairs
}

/// Applies strikes emitted during the main pass. Strikes against agents that
/// no longer resolve are dropped.
pub fn apply_strikes(strikes: &[Strike], colonies: &mut [Colony]) -> usize {
    let mut applied = 0;
    for strike in strikes {
        let Some(target) = colonies
            .get_mut(strike.target.colony.index())
            .and_then(|c| c.agent_mut(strike.target.id))
        else {
            continue;
        };
        if target.is_dead() {
            continue;
        }
        target.fatigue += strike.damage;
        applied += 1;
    }
    applied
}
