//! Training driver: one statistics store, many episodes.

use crate::config::Config;
use crate::control::monte_carlo_control;
use crate::deck::{Deck, InfiniteDeck};
use crate::engine::Engine;
use crate::episode::{Episode, Explore, Trajectory};
use crate::error::Result;
use crate::store::StatisticsStore;
use std::time::Instant;

/// Exploration stream is seeded apart from the cards
const EXPLORE_SEED_MIX: u64 = 0xA5A3_5625_E4F7_C1AD;

/// Running tally of training episodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    /// Episodes ended by the step cap
    pub truncated: usize,
    /// Distinct state identities discovered
    pub states: usize,
}

impl TrainingSummary {
    fn record(&mut self, trajectory: &Trajectory) {
        self.episodes += 1;
        if trajectory.truncated() {
            self.truncated += 1;
        }
        match trajectory.final_reward() {
            Some(r) if r > 0.0 => self.wins += 1,
            Some(r) if r < 0.0 => self.losses += 1,
            _ => self.draws += 1,
        }
    }
}

pub struct Trainer<D: Deck = InfiniteDeck, E: Explore = fastrand::Rng> {
    store: StatisticsStore,
    engine: Engine<D>,
    explorer: E,
    config: Config,
    summary: TrainingSummary,
}

impl Trainer {
    /// Trainer on the infinite deck, seeded from `config.seed` when present
    pub fn new(config: Config) -> Result<Self> {
        let (deck, explorer) = match config.seed {
            Some(seed) => (InfiniteDeck::seeded(seed), fastrand::Rng::with_seed(seed ^ EXPLORE_SEED_MIX)),
            None => (InfiniteDeck::new(), fastrand::Rng::new()),
        };
        Trainer::with_parts(config, deck, explorer)
    }
}

impl<D: Deck, E: Explore> Trainer<D, E> {
    pub fn with_parts(config: Config, deck: D, explorer: E) -> Result<Self> {
        config.validate()?;
        let engine = Engine::new(deck).with_dealer_draw_cap(config.dealer_draw_cap);
        Ok(Trainer {
            store: StatisticsStore::new(),
            engine,
            explorer,
            config,
            summary: TrainingSummary::default(),
        })
    }

    /// Simulate one episode and learn from it
    pub fn episode(&mut self) -> Result<Trajectory> {
        let trajectory = Episode::new(&mut self.store, &mut self.engine, &mut self.explorer, &self.config).run()?;
        monte_carlo_control(&trajectory, &mut self.store, self.config.discount)?;
        self.summary.record(&trajectory);
        self.summary.states = self.store.len();
        Ok(trajectory)
    }

    pub fn train(&mut self, episodes: usize) -> Result<&TrainingSummary> {
        let start = Instant::now();
        log::info!("training for {} episodes (n0 = {})", episodes, self.config.n0);
        for i in 1..=episodes {
            self.episode()?;
            if self.config.log_every > 0 && i % self.config.log_every == 0 {
                let s = &self.summary;
                log::info!(
                    "episode {}: {} states, {}/{}/{} w/d/l, elapsed {:.1}s",
                    s.episodes,
                    s.states,
                    s.wins,
                    s.draws,
                    s.losses,
                    start.elapsed().as_secs_f64()
                );
            }
        }
        if self.summary.truncated > 0 {
            log::warn!("{} episodes hit the step cap", self.summary.truncated);
        }
        Ok(&self.summary)
    }

    pub fn store(&self) -> &StatisticsStore {
        &self.store
    }

    pub fn into_store(self) -> StatisticsStore {
        self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }
}
