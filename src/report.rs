//! Text reports over a trained store.

use crate::deck::{MAX_CARD, MIN_CARD};
use crate::engine::{Action, GameState, StateId};
use crate::evaluate::Outcomes;
use crate::store::StatisticsStore;
use crate::trainer::TrainingSummary;

const PLAYER_TOTALS: std::ops::RangeInclusive<i32> = 1..=21;

/// One line per state: identity, Q(hit), Q(stick), visits.
/// Only states visited at least `min_visits` times are listed.
pub fn value_listing(store: &StatisticsStore, min_visits: u64) -> String {
    let mut output = String::new();
    for (id, stats) in store.iter().filter(|(_, s)| s.visits() >= min_visits) {
        output.push_str(&format!(
            "{:<6} hit {:>+8.4} stick {:>+8.4} visits {}\n",
            id.to_string(),
            stats.q(Action::Hit),
            stats.q(Action::Stick),
            stats.visits()
        ));
    }
    output
}

/// Markdown tables of the greedy policy and its state values
pub fn strategy_table(store: &StatisticsStore) -> String {
    let mut output = String::new();
    let dealer: Vec<String> = (MIN_CARD..=MAX_CARD).map(|d| d.to_string()).collect();
    let header = |output: &mut String| {
        output.push_str("| Player | ");
        output.push_str(&dealer.join(" | "));
        output.push_str(" |\n");
        output.push_str("|--------|");
        output.push_str(&vec!["---"; dealer.len()].join("|"));
        output.push_str("|\n");
    };

    output.push_str("## Greedy Policy\n\n");
    header(&mut output);
    for player in PLAYER_TOTALS.rev() {
        output.push_str(&format!("| **{}** |", player));
        for d in MIN_CARD..=MAX_CARD {
            match store.get(&StateId::new(d as i32, player)) {
                Some(stats) => output.push_str(&format!(" {} |", stats.greedy().symbol())),
                None => output.push_str(" - |"),
            }
        }
        output.push('\n');
    }
    output.push('\n');

    output.push_str("## State Values\n\n");
    header(&mut output);
    for player in PLAYER_TOTALS.rev() {
        output.push_str(&format!("| **{}** |", player));
        for d in MIN_CARD..=MAX_CARD {
            match store.get(&StateId::new(d as i32, player)) {
                Some(stats) => output.push_str(&format!(" {:+.2} |", stats.value())),
                None => output.push_str(" - |"),
            }
        }
        output.push('\n');
    }
    output.push('\n');

    output.push_str("## Legend\n\n");
    output.push_str("- **H** = Hit\n");
    output.push_str("- **S** = Stick\n");
    output.push_str("- **-** = never visited\n");
    output
}

pub fn summary(training: &TrainingSummary, outcomes: Option<&Outcomes>) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Trained {} episodes: {} wins, {} draws, {} losses, {} truncated, {} states\n",
        training.episodes, training.wins, training.draws, training.losses, training.truncated, training.states
    ));
    if let Some(o) = outcomes {
        output.push_str(&format!(
            "Greedy policy over {} games: EV {:+.4} (sem {:.4}), win rate {:.1}%, {}/{}/{} w/d/l\n",
            o.n,
            o.ev(),
            o.sem(),
            100.0 * o.win_rate(),
            o.wins,
            o.draws,
            o.losses
        ));
    }
    output
}

/// Debug description of a game state
pub fn state_info(state: &GameState) -> String {
    let cards: Vec<String> = state.player().cards().iter().map(ToString::to_string).collect();
    let mut output = String::new();
    output.push_str(&format!("State ID {}\n", state.id()));
    output.push_str(&format!("Dealer Cards {}\n", state.dealer().len()));
    output.push_str(&format!("Dealer Total {}\n", state.dealer().total()));
    output.push_str(&format!("Player Cards {}\n", state.player().len()));
    output.push_str(&format!("Player Total {}\n", state.player().total()));
    output.push_str(&format!("Player Hand [{}]\n", cards.join(", ")));
    output.push_str(&format!("Terminal {}\n", state.is_terminal()));
    output
}
