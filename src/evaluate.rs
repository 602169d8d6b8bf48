//! Greedy-policy evaluation.
//! Plays the learned policy without exploration, in parallel batches, leaving the store untouched.

use crate::config::Config;
use crate::deck::{Deck, InfiniteDeck};
use crate::engine::{Engine, Reward};
use crate::error::Result;
use crate::store::StatisticsStore;
use rayon::prelude::*;

pub const BATCH_SIZE: usize = 10_000;

/// Statistics over played games
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcomes {
    pub n: u64,
    pub sum_x: f64,
    pub sum_x_squared: f64,
    pub wins: u64,
    pub draws: u64,
    pub losses: u64,
}

impl Outcomes {
    #[inline(always)]
    pub fn new() -> Self {
        Outcomes::default()
    }

    #[inline(always)]
    pub fn update(&mut self, result: Reward) {
        self.n += 1;
        self.sum_x += result;
        self.sum_x_squared += result * result;
        if result > 0.0 {
            self.wins += 1;
        } else if result < 0.0 {
            self.losses += 1;
        } else {
            self.draws += 1;
        }
    }

    #[inline(always)]
    pub fn ev(&self) -> f64 {
        if self.n == 0 { 0.0 } else { self.sum_x / self.n as f64 }
    }

    #[inline(always)]
    pub fn sem(&self) -> f64 {
        if self.n < 2 {
            f64::INFINITY
        } else {
            let mean = self.sum_x / self.n as f64;
            let var = (self.sum_x_squared / self.n as f64) - (mean * mean);
            (var.max(0.0) / self.n as f64).sqrt()
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.n == 0 { 0.0 } else { self.wins as f64 / self.n as f64 }
    }

    #[inline(always)]
    pub fn merge(&mut self, other: &Outcomes) {
        self.n += other.n;
        self.sum_x += other.sum_x;
        self.sum_x_squared += other.sum_x_squared;
        self.wins += other.wins;
        self.draws += other.draws;
        self.losses += other.losses;
    }
}

/// Play `games` greedy games against the store, seeded per batch
pub fn evaluate(store: &StatisticsStore, config: &Config, games: usize, seed: u64) -> Result<Outcomes> {
    let batches = games.div_ceil(BATCH_SIZE);
    (0..batches)
        .into_par_iter()
        .map(|batch| -> Result<Outcomes> {
            let size = BATCH_SIZE.min(games - batch * BATCH_SIZE);
            let mut engine = Engine::new(InfiniteDeck::seeded(batch_seed(seed, batch)))
                .with_dealer_draw_cap(config.dealer_draw_cap);
            let mut outcomes = Outcomes::new();
            for _ in 0..size {
                outcomes.update(play_greedy(&mut engine, store, config.step_cap)?);
            }
            Ok(outcomes)
        })
        .try_reduce(Outcomes::new, |mut a, b| {
            a.merge(&b);
            Ok(a)
        })
}

/// One game following the greedy action of every state. Truncated games score 0.
pub fn play_greedy<D: Deck>(engine: &mut Engine<D>, store: &StatisticsStore, step_cap: usize) -> Result<Reward> {
    let mut state = engine.initial_state();
    let mut reward = 0.0;
    for _ in 0..step_cap {
        let (next, r) = engine.apply(&state, store.greedy(&state.id()))?;
        reward = r;
        if next.is_terminal() {
            break;
        }
        state = next;
    }
    Ok(reward)
}

#[inline]
fn batch_seed(seed: u64, batch: usize) -> u64 {
    seed.wrapping_add(batch as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Card, ScriptedDeck};
    use crate::engine::{Action, StateId, LOSS, WIN};

    #[test]
    fn outcome_counts() {
        let mut outcomes = Outcomes::new();
        for r in [1.0, -1.0, 0.0, 1.0] {
            outcomes.update(r);
        }
        assert_eq!((outcomes.wins, outcomes.draws, outcomes.losses), (2, 1, 1));
        assert_eq!(outcomes.ev(), 0.25);
        assert_eq!(outcomes.win_rate(), 0.5);
        assert!(outcomes.sem().is_finite());
    }

    #[test]
    fn merge_adds_up() {
        let mut a = Outcomes::new();
        a.update(1.0);
        let mut b = Outcomes::new();
        b.update(-1.0);
        b.update(-1.0);
        a.merge(&b);
        assert_eq!(a.n, 3);
        assert_eq!(a.losses, 2);
        assert_eq!(a.sum_x_squared, 3.0);
    }

    #[test]
    fn greedy_play_follows_the_store() {
        // dealer 10, player 10, then the dealer draws 9
        let mut store = StatisticsStore::new();
        let id = StateId::new(10, 10);
        store.visit(id);
        store.record_action(id, Action::Stick).unwrap();
        store.update_value(id, Action::Stick, 0.5).unwrap();

        let mut engine = Engine::new(ScriptedDeck::new([Card::black(10), Card::black(10), Card::black(9)]));
        assert_eq!(play_greedy(&mut engine, &store, 10).unwrap(), LOSS);

        // unknown states hit: 10 + 2 + 10 busts
        let mut engine = Engine::new(ScriptedDeck::new([Card::black(10), Card::black(10), Card::black(2)]));
        assert_eq!(play_greedy(&mut engine, &StatisticsStore::new(), 10).unwrap(), LOSS);

        let mut engine = Engine::new(ScriptedDeck::new([Card::black(10), Card::black(10), Card::black(6)]));
        // dealer 10 + 6 + 10 busts
        assert_eq!(play_greedy(&mut engine, &store, 10).unwrap(), WIN);
    }

    #[test]
    fn evaluation_is_reproducible() {
        let store = StatisticsStore::new();
        let config = Config::default();
        let a = evaluate(&store, &config, 25_000, 9).unwrap();
        let b = evaluate(&store, &config, 25_000, 9).unwrap();
        assert_eq!(a.n, 25_000);
        assert_eq!(a, b);
        assert_eq!(a.wins + a.draws + a.losses, a.n);
    }

    #[test]
    fn no_games_no_outcomes() {
        let outcomes = evaluate(&StatisticsStore::new(), &Config::default(), 0, 1).unwrap();
        assert_eq!(outcomes, Outcomes::new());
    }
}
