use itertools::Itertools;
use types::PlayerId;

// Decisions made during the current night. Cleared when a night begins.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NightTemp {
    pub werewolf_target: Option<PlayerId>,
    pub witch_heal_target: Option<PlayerId>,
    pub witch_poison_target: Option<PlayerId>,
}

impl NightTemp {
    /// A heal cancels the werewolf attack only when it lands on the same
    /// player. Poison always kills, heal or not.
    pub fn deaths(&self) -> Vec<PlayerId> {
        let killed = self
            .werewolf_target
            .filter(|&target| self.witch_heal_target != Some(target));
        killed
            .into_iter()
            .chain(self.witch_poison_target)
            .unique()
            .collect()
    }
}
