//! Cards, hands and the infinite Easy21 deck.
//! Every draw is independent: value uniform over 1..=10, black twice as likely as red.

use std::collections::VecDeque;
use std::fmt;

pub const MIN_CARD: u8 = 1;
pub const MAX_CARD: u8 = 10;

/// Hands totalling more than this are bust.
pub const BUST_ABOVE: i32 = 21;
/// Hands totalling less than this are bust.
pub const BUST_BELOW: i32 = 1;

/// Color weights out of 3: black 2/3, red 1/3
const RED_WEIGHT: u8 = 1;
const COLOR_WEIGHT_TOTAL: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
}

/// A single drawn card. Black cards add to a hand, red cards subtract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    value: u8,
    color: Color,
}

impl Card {
    #[inline]
    pub fn new(value: u8, color: Color) -> Self {
        debug_assert!((MIN_CARD..=MAX_CARD).contains(&value), "card value out of range: {}", value);
        Card { value, color }
    }

    #[inline]
    pub fn black(value: u8) -> Self {
        Card::new(value, Color::Black)
    }

    #[inline]
    pub fn red(value: u8) -> Self {
        Card::new(value, Color::Red)
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.value
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn signed_value(&self) -> i32 {
        match self.color {
            Color::Black => self.value as i32,
            Color::Red => -(self.value as i32),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color {
            Color::Black => write!(f, "B{}", self.value),
            Color::Red => write!(f, "R{}", self.value),
        }
    }
}

/// Check if a total is outside the playable range
#[inline]
pub fn is_bust(total: i32) -> bool {
    total > BUST_ABOVE || total < BUST_BELOW
}

/// An ordered set of cards with its signed total.
/// Hands are values: adding a card builds a new hand and leaves the old one untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
    total: i32,
}

impl Hand {
    pub fn new(cards: Vec<Card>) -> Self {
        let total = cards.iter().map(Card::signed_value).sum();
        Hand { cards, total }
    }

    pub fn from_card(card: Card) -> Self {
        Hand::new(vec![card])
    }

    /// New hand holding these cards plus `card`
    pub fn with(&self, card: Card) -> Hand {
        let mut cards = Vec::with_capacity(self.cards.len() + 1);
        cards.extend_from_slice(&self.cards);
        cards.push(card);
        Hand {
            cards,
            total: self.total + card.signed_value(),
        }
    }

    #[inline]
    pub fn total(&self) -> i32 {
        self.total
    }

    #[inline]
    pub fn is_bust(&self) -> bool {
        is_bust(self.total)
    }

    #[inline]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Source of cards for the game model.
pub trait Deck {
    /// Draw a card with the full value and color distribution
    fn draw(&mut self) -> Card;

    /// Draw a card forced to black, used for the opening deal
    fn draw_black(&mut self) -> Card {
        Card::black(self.draw().value())
    }
}

/// Infinite deck - each card drawn independently
#[derive(Clone)]
pub struct InfiniteDeck {
    rng: fastrand::Rng,
}

impl InfiniteDeck {
    pub fn new() -> Self {
        InfiniteDeck { rng: fastrand::Rng::new() }
    }

    pub fn seeded(seed: u64) -> Self {
        InfiniteDeck { rng: fastrand::Rng::with_seed(seed) }
    }

    #[inline]
    fn value(&mut self) -> u8 {
        self.rng.u8(MIN_CARD..=MAX_CARD)
    }

    #[inline]
    fn color(&mut self) -> Color {
        if self.rng.u8(0..COLOR_WEIGHT_TOTAL) < RED_WEIGHT {
            Color::Red
        } else {
            Color::Black
        }
    }
}

impl Default for InfiniteDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck for InfiniteDeck {
    #[inline]
    fn draw(&mut self) -> Card {
        let value = self.value();
        let color = self.color();
        Card::new(value, color)
    }

    #[inline]
    fn draw_black(&mut self) -> Card {
        Card::black(self.value())
    }
}

/// Deck that deals a fixed sequence of cards, cycling when it runs out.
/// Used to force specific games.
#[derive(Debug, Clone)]
pub struct ScriptedDeck {
    cards: VecDeque<Card>,
}

impl ScriptedDeck {
    /// # Panics
    ///
    /// Panics if `cards` is empty.
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        let cards: VecDeque<Card> = cards.into_iter().collect();
        assert!(!cards.is_empty(), "scripted deck needs at least one card");
        ScriptedDeck { cards }
    }
}

impl Deck for ScriptedDeck {
    fn draw(&mut self) -> Card {
        let card = self.cards[0];
        self.cards.rotate_left(1);
        card
    }
}
