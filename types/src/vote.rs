use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{PlayerId, Round};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub voter_id: PlayerId,
    pub target_id: PlayerId,
}

pub type AllVotes = BTreeMap<Round, Vec<Vote>>;

pub fn count_votes<'a>(
    targets: impl IntoIterator<Item = &'a PlayerId>,
) -> BTreeMap<PlayerId, usize> {
    let mut counts = BTreeMap::new();
    for &target in targets {
        *counts.entry(target).or_insert(0) += 1;
    }
    counts
}

/// Plurality with a unique winner: the single candidate holding the highest
/// count is eliminated. Any tie at the top, or no votes at all, eliminates
/// nobody.
pub fn determine_elimination(counts: &BTreeMap<PlayerId, usize>) -> Option<PlayerId> {
    let max = counts.values().copied().max().filter(|&max| max > 0)?;
    let mut leaders = counts
        .iter()
        .filter(|(_, count)| **count == max)
        .map(|(target, _)| *target);
    match (leaders.next(), leaders.next()) {
        (Some(target), None) => Some(target),
        _ => None,
    }
}
