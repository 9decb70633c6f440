use crate::config::RulesConfig;
use crate::model::{BankEntry, BankSource, Color, EntryId, MatchState, MatchStatus, Player, Turn, TurnPhase};

pub(crate) fn entry(id: EntryId, value: u8) -> BankEntry {
    BankEntry { id, value, source: BankSource::Base, created_at_sequence: id }
}

/// Red ("red") against Green ("green"), everything in the yard, Red to roll.
pub(crate) fn two_player() -> MatchState {
    MatchState {
        code: "TEST".into(),
        status: MatchStatus::Running,
        players: vec![Player::new("red", "Red", Color::Red), Player::new("green", "Green", Color::Green)],
        active_player_id: "red".into(),
        turn: Turn::fresh("n0".into()),
        winner_id: None,
        last_event: None,
        events_seq: 0,
        rules: RulesConfig::default(),
    }
}

/// Puts freshly numbered entries into the bank and waits for a move.
pub(crate) fn with_bank(mut state: MatchState, values: &[u8]) -> MatchState {
    for &v in values {
        state.turn.bank_sequence += 1;
        state.turn.bank.push(entry(state.turn.bank_sequence, v));
    }
    state.turn.phase = TurnPhase::AwaitingMove;
    state
}
