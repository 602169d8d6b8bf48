//! Every-visit Monte Carlo control update.

use crate::engine::Reward;
use crate::episode::Trajectory;
use crate::error::Result;
use crate::store::StatisticsStore;

/// Return from each step onward: G_t = r_t + discount * G_{t+1}
pub fn returns(rewards: &[Reward], discount: f64) -> Vec<Reward> {
    let mut out = vec![0.0; rewards.len()];
    let mut acc = 0.0;
    for (t, &r) in rewards.iter().enumerate().rev() {
        acc = r + discount * acc;
        out[t] = acc;
    }
    out
}

/// Move Q(s, a) toward the observed return for every step of a finished episode,
/// in episode order.
pub fn monte_carlo_control(trajectory: &Trajectory, store: &mut StatisticsStore, discount: f64) -> Result<()> {
    let returns = returns(&trajectory.rewards(), discount);
    for (step, ret) in trajectory.steps().iter().zip(returns) {
        store.update_value(step.state, step.action, ret)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::deck::{Card, Hand, ScriptedDeck};
    use crate::engine::{Action, Engine, GameState, StateId, DRAW, LOSS};
    use crate::episode::{Episode, Greedy};
    use crate::error::Error;

    #[test]
    fn undiscounted_returns_equal_final_reward() {
        assert_eq!(returns(&[0.0, 0.0, 1.0], 1.0), vec![1.0, 1.0, 1.0]);
        assert_eq!(returns(&[0.0, -1.0], 1.0), vec![-1.0, -1.0]);
        assert!(returns(&[], 1.0).is_empty());
    }

    #[test]
    fn returns_use_every_reward() {
        assert_eq!(returns(&[1.0, 0.0, 2.0], 1.0), vec![3.0, 2.0, 2.0]);
        assert_eq!(returns(&[0.0, 0.0, 1.0], 0.5), vec![0.25, 0.5, 1.0]);
    }

    #[test]
    fn updates_every_visited_pair_with_the_outcome() {
        let mut store = StatisticsStore::new();
        let mut engine = Engine::new(ScriptedDeck::new([Card::black(6)]));
        let config = Config::default();
        let mut greedy = Greedy;
        let start = GameState::new(Hand::from_card(Card::black(4)), Hand::from_card(Card::black(10)));
        let trajectory = Episode::from_state(&mut store, &mut engine, &mut greedy, &config, start)
            .run()
            .unwrap();
        assert_eq!(trajectory.rewards(), vec![DRAW, LOSS]);

        monte_carlo_control(&trajectory, &mut store, config.discount).unwrap();
        for id in [StateId::new(4, 10), StateId::new(4, 16)] {
            let stats = store.get(&id).unwrap();
            assert_eq!(stats.q(Action::Hit), LOSS);
            assert_eq!(stats.q(Action::Stick), 0.0);
        }
        assert_eq!(store.greedy(&StateId::new(4, 16)), Action::Stick);
    }

    #[test]
    fn update_without_recorded_action_fails() {
        let mut store = StatisticsStore::new();
        let mut engine = Engine::new(ScriptedDeck::new([Card::black(6)]));
        let config = Config::default();
        let mut greedy = Greedy;
        let start = GameState::new(Hand::from_card(Card::black(4)), Hand::from_card(Card::black(10)));
        let trajectory = Episode::from_state(&mut store, &mut engine, &mut greedy, &config, start)
            .run()
            .unwrap();

        let mut fresh = StatisticsStore::new();
        assert_eq!(
            monte_carlo_control(&trajectory, &mut fresh, 1.0),
            Err(Error::UnknownState(StateId::new(4, 10)))
        );
        fresh.visit(StateId::new(4, 10));
        assert_eq!(
            monte_carlo_control(&trajectory, &mut fresh, 1.0),
            Err(Error::ZeroVisitUpdate { state: StateId::new(4, 10), action: Action::Hit })
        );
    }
}
