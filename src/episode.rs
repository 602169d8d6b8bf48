//! Episode simulator: plays one game epsilon-greedily against the visit tree.

use crate::config::Config;
use crate::deck::Deck;
use crate::engine::{Action, Engine, GameState, Reward, StateId};
use crate::error::{Error, Result};
use crate::report::state_info;
use crate::store::StatisticsStore;

/// Source of exploration decisions
pub trait Explore {
    /// True with probability `epsilon`
    fn explore(&mut self, epsilon: f64) -> bool;
    /// Uniform index in `0..n`, `n >= 1`
    fn pick(&mut self, n: usize) -> usize;
}

impl Explore for fastrand::Rng {
    #[inline]
    fn explore(&mut self, epsilon: f64) -> bool {
        self.f64() < epsilon
    }

    #[inline]
    fn pick(&mut self, n: usize) -> usize {
        self.usize(..n)
    }
}

/// Never explores
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl Explore for Greedy {
    fn explore(&mut self, _: f64) -> bool {
        false
    }

    fn pick(&mut self, _: usize) -> usize {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Terminal,
}

/// One transition of an episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub state: StateId,
    pub action: Action,
    pub reward: Reward,
    pub next: StateId,
    /// Whether the game model declared `next` terminal
    pub terminal: bool,
}

/// Ordered record of a finished episode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    steps: Vec<Step>,
    truncated: bool,
}

impl Trajectory {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn rewards(&self) -> Vec<Reward> {
        self.steps.iter().map(|s| s.reward).collect()
    }

    /// Reward of the last transition, the game outcome
    pub fn final_reward(&self) -> Option<Reward> {
        self.steps.last().map(|s| s.reward)
    }

    /// True when the step cap ended the episode before the game did
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A single game bound to the training run's statistics
pub struct Episode<'a, D: Deck, E: Explore> {
    store: &'a mut StatisticsStore,
    engine: &'a mut Engine<D>,
    explorer: &'a mut E,
    config: &'a Config,
    state: GameState,
    trajectory: Trajectory,
    phase: Phase,
}

impl<'a, D: Deck, E: Explore> Episode<'a, D, E> {
    /// Deal a fresh game
    pub fn new(
        store: &'a mut StatisticsStore,
        engine: &'a mut Engine<D>,
        explorer: &'a mut E,
        config: &'a Config,
    ) -> Self {
        let state = engine.initial_state();
        Self::from_state(store, engine, explorer, config, state)
    }

    /// Start from a given position
    pub fn from_state(
        store: &'a mut StatisticsStore,
        engine: &'a mut Engine<D>,
        explorer: &'a mut E,
        config: &'a Config,
        state: GameState,
    ) -> Self {
        let phase = if state.is_terminal() { Phase::Terminal } else { Phase::Running };
        Episode {
            store,
            engine,
            explorer,
            config,
            state,
            trajectory: Trajectory::default(),
            phase,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Play one transition. Does nothing once terminal.
    pub fn step(&mut self) -> Result<Phase> {
        if self.phase == Phase::Terminal {
            return Ok(self.phase);
        }
        let id = self.state.id();
        let action = self.choose(id)?;
        self.store.record_action(id, action)?;

        let (next, reward) = self.engine.apply(&self.state, action)?;
        self.trajectory.steps.push(Step {
            state: id,
            action,
            reward,
            next: next.id(),
            terminal: next.is_terminal(),
        });
        self.state = next;

        if self.state.is_terminal() {
            self.phase = Phase::Terminal;
        } else if self.trajectory.len() >= self.config.step_cap {
            log::debug!("episode truncated after {} steps\n{}", self.trajectory.len(), state_info(&self.state));
            self.trajectory.truncated = true;
            self.phase = Phase::Terminal;
        }
        Ok(self.phase)
    }

    /// Play to the end and hand back the trajectory
    pub fn run(mut self) -> Result<Trajectory> {
        while self.step()? == Phase::Running {}
        log::trace!(
            "episode finished at {} with reward {:?} in {} steps",
            self.state.id(),
            self.trajectory.final_reward(),
            self.trajectory.len()
        );
        Ok(self.trajectory)
    }

    /// Register the visit, then pick epsilon-greedily
    fn choose(&mut self, id: StateId) -> Result<Action> {
        let visits = self.store.visit(id);
        let epsilon = self.config.epsilon(visits);
        let stats = self.store.get(&id).ok_or(Error::UnknownState(id))?;
        if self.explorer.explore(epsilon) {
            let others: Vec<Action> = stats.non_greedy().collect();
            Ok(others[self.explorer.pick(others.len())])
        } else {
            Ok(stats.greedy())
        }
    }
}
