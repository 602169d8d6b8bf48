//! Easy21 Monte Carlo Control
//! Learns a tabular action-value function for Easy21 from simulated episodes,
//! exploring epsilon-greedily with a rate that decays as states are revisited.

pub mod config;
pub mod control;
pub mod deck;
pub mod engine;
pub mod episode;
pub mod error;
pub mod evaluate;
pub mod report;
pub mod store;
pub mod trainer;

pub use config::Config;
pub use control::monte_carlo_control;
pub use deck::{Card, Color, Deck, Hand, InfiniteDeck, ScriptedDeck};
pub use engine::{Action, Engine, GameState, Reward, StateId};
pub use episode::{Episode, Explore, Greedy, Phase, Step, Trajectory};
pub use error::{Error, Result};
pub use evaluate::{evaluate, Outcomes};
pub use store::{StateStats, StatisticsStore};
pub use trainer::{Trainer, TrainingSummary};
