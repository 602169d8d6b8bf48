//! Visit tree: per-state learning statistics that persist across episodes.

use crate::engine::{Action, Reward, StateId};
use crate::error::{Error, Result};
use std::collections::btree_map::{BTreeMap, Entry};

/// Statistics for a single state identity
#[derive(Debug, Clone, PartialEq)]
pub struct StateStats {
    q: [f64; 2],
    visits: u64,
    action_visits: [u64; 2],
}

impl StateStats {
    /// Statistics of a state on its first visit
    pub fn new() -> Self {
        StateStats { q: [0.0; 2], visits: 1, action_visits: [0; 2] }
    }

    #[inline(always)]
    pub fn q(&self, action: Action) -> f64 {
        self.q[action.index()]
    }

    #[inline(always)]
    pub fn visits(&self) -> u64 {
        self.visits
    }

    #[inline(always)]
    pub fn action_visits(&self, action: Action) -> u64 {
        self.action_visits[action.index()]
    }

    /// Arg-max of Q, ties going to the earlier action in `Action::ALL`
    pub fn greedy(&self) -> Action {
        let mut best = Action::ALL[0];
        for action in Action::ALL.into_iter().skip(1) {
            if self.q(action) > self.q(best) {
                best = action;
            }
        }
        best
    }

    /// Value of the state under the greedy policy
    pub fn value(&self) -> f64 {
        self.q(self.greedy())
    }

    /// Every action except the greedy one, in `Action::ALL` order
    pub fn non_greedy(&self) -> impl Iterator<Item = Action> {
        let greedy = self.greedy();
        Action::ALL.into_iter().filter(move |&a| a != greedy)
    }
}

impl Default for StateStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Mapping from state identity to its statistics, kept for a whole training run
#[derive(Debug, Clone, Default)]
pub struct StatisticsStore {
    states: BTreeMap<StateId, StateStats>,
}

impl StatisticsStore {
    pub fn new() -> Self {
        StatisticsStore { states: BTreeMap::new() }
    }

    /// Register a visit, creating the state on first sight. Returns the visit count.
    pub fn visit(&mut self, id: StateId) -> u64 {
        match self.states.entry(id) {
            Entry::Vacant(slot) => {
                log::trace!("new state {}", id);
                slot.insert(StateStats::new()).visits
            }
            Entry::Occupied(mut slot) => {
                let stats = slot.get_mut();
                stats.visits += 1;
                stats.visits
            }
        }
    }

    /// Count one more selection of `action` from `id`
    pub fn record_action(&mut self, id: StateId, action: Action) -> Result<()> {
        let stats = self.states.get_mut(&id).ok_or(Error::UnknownState(id))?;
        stats.action_visits[action.index()] += 1;
        Ok(())
    }

    /// Every-visit incremental mean: Q += (G - Q) / N(s, a)
    pub fn update_value(&mut self, id: StateId, action: Action, ret: Reward) -> Result<()> {
        let stats = self.states.get_mut(&id).ok_or(Error::UnknownState(id))?;
        let n = stats.action_visits[action.index()];
        if n == 0 {
            return Err(Error::ZeroVisitUpdate { state: id, action });
        }
        let q = &mut stats.q[action.index()];
        *q += (ret - *q) / n as f64;
        Ok(())
    }

    #[inline]
    pub fn get(&self, id: &StateId) -> Option<&StateStats> {
        self.states.get(id)
    }

    /// Greedy action for `id`, or the first action for states never seen
    pub fn greedy(&self, id: &StateId) -> Action {
        self.get(id).map(StateStats::greedy).unwrap_or(Action::ALL[0])
    }

    /// States in identity order
    pub fn iter(&self) -> impl Iterator<Item = (&StateId, &StateStats)> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
