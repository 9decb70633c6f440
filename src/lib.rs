pub mod arrow;
pub mod board;
pub mod bot;
pub mod combat;
pub mod config;
pub mod dice;
pub mod error;
pub mod home_stretch;
pub mod model;
pub mod movegen;
pub mod resolver;
pub mod rng;
pub mod stack;

#[cfg(test)]
mod testutil;

use std::collections::HashSet;

pub use config::RulesConfig;
pub use error::{EngineError, EngineResult};
pub use model::*;
pub use resolver::{ensure_nonce, MoveResult, RollResult};
pub use rng::{Entropy, ScriptedEntropy, SeededEntropy};

/// Seats the given players in order and hands the first one the dice.
pub fn init_match(code: &str, players: Vec<Player>, rules: RulesConfig, entropy: &mut dyn Entropy) -> EngineResult<MatchState> {
    if players.len() < rules.players_min || players.len() > rules.players_max {
        return Err(EngineError::InvalidAction(format!("player_count:{}", players.len())));
    }
    let colors: HashSet<Color> = players.iter().map(|p| p.color).collect();
    let ids: HashSet<&str> = players.iter().map(|p| p.id.as_str()).collect();
    if colors.len() != players.len() || ids.len() != players.len() {
        return Err(EngineError::InvalidAction("duplicate_seat".into()));
    }
    let active_player_id = players
        .first()
        .map(|p| p.id.clone())
        .ok_or_else(|| EngineError::InvalidAction("player_count:0".into()))?;
    Ok(MatchState {
        code: code.to_string(),
        status: MatchStatus::Running,
        players,
        active_player_id,
        turn: Turn::fresh(entropy.nonce()),
        winner_id: None,
        last_event: None,
        events_seq: 0,
        rules,
    })
}

pub fn roll(state: &MatchState, player_id: &str, entropy: &mut dyn Entropy) -> EngineResult<RollResult> {
    resolver::apply_roll(state, player_id, entropy)
}

pub fn move_piece(state: &MatchState, player_id: &str, action: &Action, entropy: &mut dyn Entropy) -> EngineResult<MoveResult> {
    resolver::apply_move(state, player_id, action, entropy)
}

pub fn move_piece_auto(
    state: &MatchState,
    player_id: &str,
    piece_index: usize,
    entry_id: Option<EntryId>,
    prefer_pair: Option<bool>,
    entropy: &mut dyn Entropy,
) -> EngineResult<MoveResult> {
    resolver::apply_move_auto(state, player_id, piece_index, entry_id, prefer_pair, entropy)
}

pub fn legal_actions(state: &MatchState, player_id: &str) -> Vec<Action> {
    movegen::legal_actions(state, player_id)
}

/// Action the player's bot tier would take now. Humans get the medium tier.
pub fn best_bot_action(state: &MatchState, player_id: &str) -> Option<Action> {
    let player = state.player(player_id)?;
    if state.turn.bank.is_empty() {
        return None;
    }
    bot::choose_action(state, player_id, player.bot_level())
}

#[derive(Clone, Debug, PartialEq)]
pub enum BotStep {
    Rolled(RollResult),
    Moved(MoveResult),
}

impl BotStep {
    pub fn state(&self) -> &MatchState {
        match self {
            BotStep::Rolled(r) => &r.state,
            BotStep::Moved(m) => &m.state,
        }
    }
}

/// Plays one step for the active player when a bot drives it.
pub fn bot_step(state: &MatchState, entropy: &mut dyn Entropy) -> EngineResult<BotStep> {
    let player = state.active_player().ok_or_else(|| EngineError::invariant("unknown_active_player"))?;
    if !player.is_bot_controlled() {
        return Err(EngineError::InvalidTurn("not_bot_controlled"));
    }
    let player_id = player.id.clone();
    match state.turn.phase {
        TurnPhase::AwaitingRoll => Ok(BotStep::Rolled(roll(state, &player_id, entropy)?)),
        TurnPhase::AwaitingMove => {
            let action = best_bot_action(state, &player_id)
                .ok_or_else(|| EngineError::invariant("awaiting_move_without_actions"))?;
            Ok(BotStep::Moved(move_piece(state, &player_id, &action, entropy)?))
        }
    }
}
