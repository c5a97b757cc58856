//! Rest-aware sequencing: reorder a batch of pending pairings so no team
//! plays too many matches back to back.

use crate::logic::league::Pairing;
use crate::models::TeamId;
use std::collections::{HashMap, HashSet};

/// Penalty per team already marked recently-played. Dominates the load term
/// so a rested pairing always beats a tired one.
const RECENT_PENALTY: u32 = 100;

/// Greedy spacing of a pending batch (one or more rounds).
///
/// Each step picks the remaining pairing minimizing
/// `100 * (teams marked recently-played) + (sum of the two teams' total
/// occurrence counts in the batch)`, ties broken by input position. Picked
/// teams are marked recently-played; once every distinct team in the batch
/// carries the mark, the mark set clears and the cycle starts over. Locally
/// optimal spacing, not a globally optimal schedule. Stable when re-applied
/// to its own output.
pub fn spread(pairings: &[Pairing]) -> Vec<Pairing> {
    let mut load: HashMap<TeamId, u32> = HashMap::new();
    let mut distinct: HashSet<TeamId> = HashSet::new();
    for p in pairings {
        *load.entry(p.team_a_id).or_insert(0) += 1;
        *load.entry(p.team_b_id).or_insert(0) += 1;
        distinct.insert(p.team_a_id);
        distinct.insert(p.team_b_id);
    }

    let mut remaining: Vec<Pairing> = pairings.to_vec();
    let mut ordered = Vec::with_capacity(remaining.len());
    let mut recent: HashSet<TeamId> = HashSet::new();

    while !remaining.is_empty() {
        if recent.len() >= distinct.len() {
            recent.clear();
        }
        let best = remaining
            .iter()
            .enumerate()
            .min_by_key(|(i, p)| {
                let tired = [p.team_a_id, p.team_b_id]
                    .iter()
                    .filter(|id| recent.contains(*id))
                    .count() as u32;
                let weight = load[&p.team_a_id] + load[&p.team_b_id];
                (RECENT_PENALTY * tired + weight, *i)
            })
            .map(|(i, _)| i)
            .unwrap_or(0);
        let picked = remaining.remove(best);
        recent.insert(picked.team_a_id);
        recent.insert(picked.team_b_id);
        ordered.push(picked);
    }
    ordered
}
