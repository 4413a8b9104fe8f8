//! Range-limited freshness gossip between agents.
//!
//! A speaker advertises `counter + shout_range` for each base to every agent
//! inside its shout box. Any listener whose belief is staler than that bound
//! is pulled down to it. Updates happen in place on the shared arena, so an
//! agent processed later in the same tick already sees them.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{Agent, BaseId, Position};

/// A visual link between a speaker and a listener it corrected.
///
/// Drawing only; carries no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoutLink {
    pub from: Position,
    pub to: Position,
    pub target: BaseId,
}

/// Result of a single speaker's shout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShoutOutcome {
    pub listeners: usize,
    pub clamps: usize,
}

/// Lets `agents[speaker]` shout to every other agent in its range.
///
/// For each listener the A counter is tried first and the B counter only if
/// A was left alone. When the corrected base is the speaker's own target,
/// the speaker takes over the listener's heading and a link is recorded.
pub fn shout(
    agents: &mut [Agent],
    speaker: usize,
    bases: (BaseId, BaseId),
    links: &mut Vec<ShoutLink>,
) -> ShoutOutcome {
    let (base_a, base_b) = bases;
    let Some(origin) = agents.get(speaker) else {
        return ShoutOutcome::default();
    };
    let from = origin.position;
    let range = origin.shout_range;
    let target = origin.target;
    let advertised_a = origin.counter_a.saturating_add(range);
    let advertised_b = origin.counter_b.saturating_add(range);

    let mut outcome = ShoutOutcome::default();
    for index in 0..agents.len() {
        if index == speaker || !from.within_box(&agents[index].position, range) {
            continue;
        }
        outcome.listeners += 1;

        let listener = &mut agents[index];
        let corrected = if listener.counter_a > advertised_a {
            listener.counter_a = advertised_a;
            base_a
        } else if listener.counter_b > advertised_b {
            listener.counter_b = advertised_b;
            base_b
        } else {
            continue;
        };
        outcome.clamps += 1;

        let to = listener.position;
        let heading = listener.direction;
        trace!(speaker, listener = index, base = %corrected, "clamped stale counter");

        if target == corrected {
            agents[speaker].direction = heading;
            links.push(ShoutLink { from, to, target });
        }
    }

    outcome
}
