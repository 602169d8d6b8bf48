//! Easy21 transition model.
//! Given a state and an action, produces the successor state and its reward.
//! The engine never reads or writes learning statistics.

use crate::config::DEALER_DRAW_CAP;
use crate::deck::{Deck, Hand, InfiniteDeck};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Per-transition reward. Always one of LOSS, DRAW or WIN.
pub type Reward = f64;

pub const WIN: Reward = 1.0;
pub const DRAW: Reward = 0.0;
pub const LOSS: Reward = -1.0;

/// Dealer stops drawing once its total reaches this
pub const DEALER_STANDS_AT: i32 = 17;

/// Possible player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Hit,
    Stick,
}

impl Action {
    /// Fixed ordering, also the tie-break order for greedy selection
    pub const ALL: [Action; 2] = [Action::Hit, Action::Stick];

    #[inline(always)]
    pub fn index(&self) -> usize {
        match self {
            Action::Hit => 0,
            Action::Stick => 1,
        }
    }

    #[inline(always)]
    pub fn symbol(&self) -> &'static str {
        match self {
            Action::Hit => "H",
            Action::Stick => "S",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Hit => "hit",
            Action::Stick => "stick",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hit" => Ok(Action::Hit),
            "stick" => Ok(Action::Stick),
            other => Err(Error::InvalidAction(other.to_string())),
        }
    }
}

/// Learning identity of a state: dealer total then player total.
/// Hands with different cards but equal totals share an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId {
    pub dealer: i32,
    pub player: i32,
}

impl StateId {
    pub fn new(dealer: i32, player: i32) -> Self {
        StateId { dealer, player }
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.dealer, self.player)
    }
}

impl FromStr for StateId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::InvalidStateId(s.to_string());
        let (dealer, player) = s.split_once(' ').ok_or_else(malformed)?;
        let dealer = dealer.parse().map_err(|_| malformed())?;
        let player = player.parse().map_err(|_| malformed())?;
        Ok(StateId { dealer, player })
    }
}

/// Dealer hand and player hand, plus whether the game is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    dealer: Hand,
    player: Hand,
    terminal: bool,
}

impl GameState {
    pub fn new(dealer: Hand, player: Hand) -> Self {
        GameState { dealer, player, terminal: false }
    }

    fn terminal(dealer: Hand, player: Hand) -> Self {
        GameState { dealer, player, terminal: true }
    }

    #[inline]
    pub fn id(&self) -> StateId {
        StateId::new(self.dealer.total(), self.player.total())
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    #[inline]
    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    #[inline]
    pub fn player(&self) -> &Hand {
        &self.player
    }
}

/// Easy21 game engine
pub struct Engine<D: Deck = InfiniteDeck> {
    deck: D,
    dealer_draw_cap: usize,
}

impl Engine<InfiniteDeck> {
    pub fn seeded(seed: u64) -> Self {
        Engine::new(InfiniteDeck::seeded(seed))
    }
}

impl<D: Deck> Engine<D> {
    pub fn new(deck: D) -> Self {
        Engine { deck, dealer_draw_cap: DEALER_DRAW_CAP }
    }

    pub fn with_dealer_draw_cap(mut self, cap: usize) -> Self {
        self.dealer_draw_cap = cap;
        self
    }

    /// Deal one black card each to dealer and player
    pub fn initial_state(&mut self) -> GameState {
        let dealer = Hand::from_card(self.deck.draw_black());
        let player = Hand::from_card(self.deck.draw_black());
        GameState::new(dealer, player)
    }

    /// Take `action` from `state`, returning the successor and its reward
    pub fn apply(&mut self, state: &GameState, action: Action) -> Result<(GameState, Reward)> {
        if state.is_terminal() {
            return Err(Error::TerminalState(state.id()));
        }
        Ok(match action {
            Action::Hit => self.hit(state),
            Action::Stick => self.stick(state),
        })
    }

    #[inline]
    fn hit(&mut self, state: &GameState) -> (GameState, Reward) {
        let player = state.player.with(self.deck.draw());
        if player.is_bust() {
            (GameState::terminal(state.dealer.clone(), player), LOSS)
        } else {
            (GameState::new(state.dealer.clone(), player), DRAW)
        }
    }

    #[inline]
    fn stick(&mut self, state: &GameState) -> (GameState, Reward) {
        let dealer = self.dealer_play(&state.dealer);
        let reward = resolve(&dealer, &state.player);
        (GameState::terminal(dealer, state.player.clone()), reward)
    }

    /// Dealer draws below 17 until it stands or busts, bounded by the draw cap
    #[inline]
    fn dealer_play(&mut self, hand: &Hand) -> Hand {
        let mut dealer = hand.clone();
        let mut draws = 0;
        while dealer.total() < DEALER_STANDS_AT && !dealer.is_bust() && draws < self.dealer_draw_cap {
            dealer = dealer.with(self.deck.draw());
            draws += 1;
        }
        dealer
    }
}

/// Resolve a finished player hand against the dealer
#[inline]
fn resolve(dealer: &Hand, player: &Hand) -> Reward {
    if dealer.is_bust() {
        WIN
    } else if player.total() > dealer.total() {
        WIN
    } else if player.total() < dealer.total() {
        LOSS
    } else {
        DRAW
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Card, ScriptedDeck};

    fn state(dealer: &[Card], player: &[Card]) -> GameState {
        GameState::new(Hand::new(dealer.to_vec()), Hand::new(player.to_vec()))
    }

    #[test]
    fn initial_state_is_two_black_cards() {
        let mut engine = Engine::new(ScriptedDeck::new([Card::red(4), Card::black(9)]));
        let start = engine.initial_state();
        assert!(!start.is_terminal());
        assert_eq!(start.id(), StateId::new(4, 9));
        assert_eq!(start.dealer().len(), 1);
        assert_eq!(start.player().len(), 1);
    }

    #[test]
    fn hit_without_bust_keeps_playing() {
        let mut engine = Engine::new(ScriptedDeck::new([Card::black(5)]));
        let from = state(&[Card::black(8)], &[Card::black(10)]);
        let (next, reward) = engine.apply(&from, Action::Hit).unwrap();
        assert_eq!(reward, DRAW);
        assert!(!next.is_terminal());
        assert_eq!(next.id(), StateId::new(8, 15));
        assert_eq!(next.dealer(), from.dealer());
    }

    #[test]
    fn hit_into_bust_ends_game() {
        let mut engine = Engine::new(ScriptedDeck::new([Card::red(6)]));
        let from = state(&[Card::black(8)], &[Card::black(3)]);
        let (next, reward) = engine.apply(&from, Action::Hit).unwrap();
        assert_eq!(reward, LOSS);
        assert!(next.is_terminal());
        assert_eq!(next.player().total(), -3);
    }

    #[test]
    fn stick_dealer_draws_to_seventeen() {
        let mut engine = Engine::new(ScriptedDeck::new([Card::black(3), Card::black(2), Card::black(4)]));
        let from = state(&[Card::black(10)], &[Card::black(10), Card::black(8)]);
        let (next, reward) = engine.apply(&from, Action::Stick).unwrap();
        assert!(next.is_terminal());
        assert_eq!(next.dealer().total(), 19);
        assert_eq!(next.dealer().len(), 4);
        assert_eq!(reward, LOSS);
    }

    #[test]
    fn stick_outcomes() {
        let from = state(&[Card::black(10)], &[Card::black(10), Card::black(8)]);

        let mut bust = Engine::new(ScriptedDeck::new([Card::black(6), Card::black(9)]));
        assert_eq!(bust.apply(&from, Action::Stick).unwrap().1, WIN);

        let mut low_bust = Engine::new(ScriptedDeck::new([Card::red(10)]));
        let (next, reward) = low_bust.apply(&from, Action::Stick).unwrap();
        assert_eq!(next.dealer().total(), 0);
        assert_eq!(reward, WIN);

        let mut tie = Engine::new(ScriptedDeck::new([Card::black(8)]));
        assert_eq!(tie.apply(&from, Action::Stick).unwrap().1, DRAW);

        let mut beaten = Engine::new(ScriptedDeck::new([Card::black(7)]));
        assert_eq!(beaten.apply(&from, Action::Stick).unwrap().1, WIN);
    }

    #[test]
    fn dealer_standing_hand_does_not_draw() {
        let mut engine = Engine::new(ScriptedDeck::new([Card::black(1)]));
        let from = state(&[Card::black(10), Card::black(7)], &[Card::black(10)]);
        let (next, _) = engine.apply(&from, Action::Stick).unwrap();
        assert_eq!(next.dealer().len(), 2);
    }

    #[test]
    fn dealer_draws_are_capped() {
        // +1 -1 forever never reaches 17 or busts
        let mut engine = Engine::new(ScriptedDeck::new([Card::black(1), Card::red(1)]));
        let from = state(&[Card::black(5)], &[Card::black(10)]);
        let (next, _) = engine.apply(&from, Action::Stick).unwrap();
        assert!(next.is_terminal());
        assert_eq!(next.dealer().len(), 1 + DEALER_DRAW_CAP);

        let mut short = Engine::new(ScriptedDeck::new([Card::black(1), Card::red(1)])).with_dealer_draw_cap(3);
        let (next, _) = short.apply(&from, Action::Stick).unwrap();
        assert_eq!(next.dealer().len(), 4);
    }

    #[test]
    fn terminal_states_reject_actions() {
        let mut engine = Engine::new(ScriptedDeck::new([Card::black(9)]));
        let from = state(&[Card::black(10)], &[Card::black(10)]);
        let (done, _) = engine.apply(&from, Action::Stick).unwrap();
        assert_eq!(engine.apply(&done, Action::Hit), Err(Error::TerminalState(done.id())));
    }

    #[test]
    fn identity_ignores_card_composition() {
        let a = state(&[Card::black(7)], &[Card::black(10), Card::black(5)]);
        let b = state(&[Card::black(9), Card::red(2)], &[Card::black(8), Card::red(3), Card::black(10)]);
        assert_eq!(a.id(), b.id());
        assert_eq!(a.id().to_string(), "7 15");
    }

    #[test]
    fn identity_text_round_trip() {
        assert_eq!("7 15".parse::<StateId>().unwrap(), StateId::new(7, 15));
        assert_eq!("10 -3".parse::<StateId>().unwrap(), StateId::new(10, -3));
        assert!(matches!("7,15".parse::<StateId>(), Err(Error::InvalidStateId(_))));
        assert!(matches!("7 x".parse::<StateId>(), Err(Error::InvalidStateId(_))));
    }

    #[test]
    fn action_parsing() {
        assert_eq!("hit".parse::<Action>().unwrap(), Action::Hit);
        assert_eq!("stick".parse::<Action>().unwrap(), Action::Stick);
        assert_eq!("double".parse::<Action>(), Err(Error::InvalidAction("double".into())));
    }
}
