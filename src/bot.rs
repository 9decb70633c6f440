//! Three opponent tiers. All of them read the live state and, for the hard
//! tier, simulate on clones through the real resolver; none of them mutate
//! the state they are given.

use std::collections::HashMap;

use crate::board::{is_lane, is_safe, is_track};
use crate::combat::can_capture;
use crate::dice::first_usable;
use crate::home_stretch::should_discard;
use crate::model::{Action, BotLevel, MatchState, Position, HOME, YARD};
use crate::movegen::{legal_actions, legal_actions_for_entry};
use crate::resolver::apply_move;
use crate::rng::{Entropy, SeededEntropy};
use crate::stack::{attacker, defenders_at};

const DISCARD_PENALTY: i64 = 200;

/// Moves for the earliest bank entry that has any.
fn first_playable(state: &MatchState, player_id: &str) -> Vec<Action> {
    first_usable(&state.turn.bank, |e| !legal_actions_for_entry(state, player_id, e).is_empty())
        .map(|e| legal_actions_for_entry(state, player_id, e))
        .unwrap_or_default()
}

/// Spends the first playable die on the token nearest the yard.
pub fn easy_policy(state: &MatchState, player_id: &str) -> Option<Action> {
    let player = state.player(player_id)?;
    first_playable(state, player_id)
        .into_iter()
        .min_by_key(|a| player.tokens[a.piece_index].position)
}

fn medium_score(state: &MatchState, player_id: &str, action: &Action) -> i64 {
    let Some(player) = state.player(player_id) else {
        return i64::MIN;
    };
    let from = player.tokens[action.piece_index].position;
    let to = action.landing();
    let mut score = 0i64;

    if is_track(to) {
        let pieces: Vec<usize> = std::iter::once(action.piece_index).chain(action.partner_index).collect();
        let def = defenders_at(&state.players, to, player_id);
        if can_capture(&attacker(player, &pieces), &def, to, player.color) {
            score += 1000;
        }
    }
    if action.glide_head.is_some() {
        score += 500;
    }
    if to == HOME {
        score += 800;
    }
    if (is_lane(to) || to == HOME) && !is_lane(from) {
        score += 400;
    }
    if is_safe(to) {
        score += 300;
    } else if is_track(to) {
        score -= 100;
    }
    score + i64::from(to)
}

/// Spends the first playable die on the move with the best weighted score;
/// ties keep token order.
pub fn medium_policy(state: &MatchState, player_id: &str) -> Option<Action> {
    let mut best: Option<(i64, Action)> = None;
    for action in first_playable(state, player_id) {
        let score = medium_score(state, player_id, &action);
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, action));
        }
    }
    best.map(|(_, a)| a)
}

pub fn score_state(state: &MatchState, player_id: &str) -> i64 {
    let Some(player) = state.player(player_id) else {
        return -1000;
    };
    if state.winner_id.as_deref() == Some(player_id) {
        return 10_000;
    }

    let mut score = i64::from(player.home_count) * 500;
    let mut per_square: HashMap<Position, u32> = HashMap::new();
    for t in &player.tokens {
        score += match t.position {
            HOME => 100,
            YARD => -50,
            p => {
                let mut s = i64::from(p) * 2;
                if is_lane(p) {
                    s += 100;
                }
                if is_safe(p) {
                    s += 20;
                }
                s
            }
        };
        if t.on_track() {
            *per_square.entry(t.position).or_default() += 1;
        }
    }
    for count in per_square.into_values() {
        score += match count {
            2 => 40,
            c if c >= 3 => 150,
            _ => 0,
        };
    }

    for other in state.players.iter().filter(|p| p.id != player_id) {
        score -= i64::from(other.home_count) * 400;
    }
    if should_discard(player, &state.turn.bank) {
        score -= 300;
    }
    score
}

/// Best score reachable from `state` within `plies` more own moves.
fn search(state: &MatchState, player_id: &str, plies: u8, entropy: &mut dyn Entropy) -> Option<(Action, i64)> {
    let mut best: Option<(Action, i64)> = None;
    for action in legal_actions(state, player_id) {
        let Ok(outcome) = apply_move(state, player_id, &action, entropy) else {
            continue;
        };
        let keeps_turn = outcome.state.active_player_id == player_id && !outcome.state.turn.bank.is_empty();
        let mut score = if keeps_turn && plies > 1 {
            search(&outcome.state, player_id, plies - 1, entropy)
                .map_or_else(|| score_state(&outcome.state, player_id), |(_, s)| s)
        } else {
            score_state(&outcome.state, player_id)
        };
        if outcome.discarded {
            score -= DISCARD_PENALTY;
        }
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((action, score));
        }
    }
    best
}

/// Looks ahead over the whole bank and returns the opening move of the best
/// line. Bonus dice drawn during simulation come from a seed tied to the
/// current bank, so the choice is reproducible for a given state.
pub fn hard_policy(state: &MatchState, player_id: &str) -> Option<Action> {
    if state.turn.bank.is_empty() {
        return None;
    }
    let seed = u64::from(state.turn.bank_sequence) ^ state.events_seq.wrapping_mul(7919);
    let mut entropy = SeededEntropy::new(seed);
    let plies = state.rules.lookahead_depth.max(1);
    search(state, player_id, plies, &mut entropy)
        .map(|(a, _)| a)
        .or_else(|| legal_actions(state, player_id).into_iter().next())
}

pub fn choose_action(state: &MatchState, player_id: &str, level: BotLevel) -> Option<Action> {
    match level {
        BotLevel::Easy => easy_policy(state, player_id),
        BotLevel::Medium => medium_policy(state, player_id),
        BotLevel::Hard => hard_policy(state, player_id),
    }
}
