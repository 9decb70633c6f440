//! Authoritative roll and move transitions. Both take the current state by
//! reference and hand back a new one; a rejected call changes nothing.

use serde_json::json;
use tracing::debug;

use crate::arrow::resolve_arrow;
use crate::board::{compute_path, is_track};
use crate::combat::{resolve_landing, Landing};
use crate::dice::{append_bonus, bank_sum, remove_entry, roll_chain};
use crate::error::{EngineError, EngineResult};
use crate::home_stretch::should_discard;
use crate::model::*;
use crate::movegen::{auto_pick_entry, legal_actions, legal_actions_for_entry};
use crate::rng::Entropy;
use crate::stack::{attacker, defenders_at};

#[derive(Clone, Debug, PartialEq)]
pub struct RollResult {
    pub state: MatchState,
    pub rolls_added: Vec<BankEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoveResult {
    pub state: MatchState,
    pub bonus_triggers: Vec<BonusTrigger>,
    pub discarded: bool,
}

const DISCARD_EXACT_SUM: &str = "home_stretch_exact_sum";
const DISCARD_NO_MOVES: &str = "no_legal_moves";

fn state_hash(s: &MatchState) -> String {
    format!("h:{}:{:?}:{}:{}", s.active_player_id, s.turn.phase, s.turn.bank.len(), s.turn.bank_sequence)
}

fn record(state: &mut MatchState, ty: EventType, player_id: &str, payload: serde_json::Value) {
    state.events_seq += 1;
    state.last_event = Some(Event {
        seq: state.events_seq,
        ty,
        player_id: player_id.to_string(),
        payload,
        state_hash: state_hash(state),
    });
}

pub fn ensure_turn(state: &MatchState, player_id: &str, phase: TurnPhase) -> EngineResult<()> {
    if state.status != MatchStatus::Running {
        return Err(EngineError::InvalidTurn("match_not_running"));
    }
    if state.active_player_id != player_id {
        return Err(EngineError::InvalidTurn("not_active_player"));
    }
    if state.turn.phase != phase {
        return Err(EngineError::InvalidTurn("wrong_phase"));
    }
    Ok(())
}

/// Rejects actions prepared against an older turn.
pub fn ensure_nonce(state: &MatchState, nonce: &str) -> EngineResult<()> {
    if state.turn.nonce == nonce { Ok(()) } else { Err(EngineError::InvalidTurn("stale_nonce")) }
}

fn pass_turn(state: &mut MatchState) -> EngineResult<()> {
    let idx = state
        .player_index(&state.active_player_id)
        .ok_or_else(|| EngineError::invariant("unknown_active_player"))?;
    let next = (idx + 1) % state.players.len();
    state.active_player_id = state.players[next].id.clone();
    state.turn.phase = TurnPhase::AwaitingRoll;
    state.turn.bank.clear();
    state.turn.bonus_chain = 0;
    Ok(())
}

/// Why the remaining bank has to go, if it does.
fn forfeit_reason(state: &MatchState, pidx: usize) -> Option<&'static str> {
    let player = &state.players[pidx];
    if state.turn.bank.is_empty() {
        None
    } else if should_discard(player, &state.turn.bank) {
        Some(DISCARD_EXACT_SUM)
    } else if legal_actions(state, &player.id).is_empty() {
        Some(DISCARD_NO_MOVES)
    } else {
        None
    }
}

pub fn apply_roll(state: &MatchState, player_id: &str, entropy: &mut dyn Entropy) -> EngineResult<RollResult> {
    ensure_turn(state, player_id, TurnPhase::AwaitingRoll)?;
    let pidx = state.player_index(player_id).ok_or_else(|| EngineError::invariant("unknown_active_player"))?;

    let mut next = state.clone();
    let rolls_added = roll_chain(&mut next.turn, next.rules.chain_cap, entropy);
    let values: Vec<u8> = rolls_added.iter().map(|e| e.value).collect();
    debug!(code = %next.code, player = player_id, ?values, "rolled");

    let forfeit = forfeit_reason(&next, pidx);
    match forfeit {
        Some(reason) => {
            debug!(code = %next.code, player = player_id, reason, "bank forfeited after roll");
            pass_turn(&mut next)?;
        }
        None => next.turn.phase = TurnPhase::AwaitingMove,
    }
    next.turn.nonce = entropy.nonce();

    let payload = json!({
        "rolls": values,
        "bank": next.turn.bank,
        "reason": forfeit,
        "nextPlayer": next.active_player_id,
    });
    let ty = if forfeit.is_some() { EventType::BankDiscarded } else { EventType::DiceRoll };
    record(&mut next, ty, player_id, payload);

    Ok(RollResult { state: next, rolls_added })
}

pub fn apply_move(state: &MatchState, player_id: &str, action: &Action, entropy: &mut dyn Entropy) -> EngineResult<MoveResult> {
    ensure_turn(state, player_id, TurnPhase::AwaitingMove)?;
    let entry = state.bank_entry(action.entry_id).ok_or(EngineError::StaleBankEntry(action.entry_id))?;
    let legal = legal_actions_for_entry(state, player_id, entry)
        .into_iter()
        .find(|a| a.piece_index == action.piece_index && a.is_pair_move() == action.is_pair_move())
        .ok_or_else(|| EngineError::InvalidAction(format!("no_legal_move:{}:{}", action.entry_id, action.piece_index)))?;
    if legal != *action {
        return Err(EngineError::InvalidAction(format!("action_mismatch:{}:{}", action.entry_id, action.piece_index)));
    }
    let pidx = state.player_index(player_id).ok_or_else(|| EngineError::invariant("unknown_active_player"))?;

    let mut next = state.clone();
    remove_entry(&mut next.turn.bank, action.entry_id)?;

    let color = next.players[pidx].color;
    let from = next.players[pidx].tokens[action.piece_index].position;
    let pieces: Vec<usize> = std::iter::once(action.piece_index).chain(action.partner_index).collect();
    let mut bonus_triggers = Vec::new();

    let mut landing = action.target;
    let glide = resolve_arrow(action.target, color);
    if let Some(arrow) = glide {
        landing = arrow.head;
        let bonus = append_bonus(&mut next.turn, BankSource::ArrowBonus, entropy);
        bonus_triggers.push(BonusTrigger { kind: arrow.kind.trigger(), value: bonus.value });
        debug!(code = %next.code, player = player_id, tail = arrow.tail, head = arrow.head, "arrow glide");
    }
    for &i in &pieces {
        next.players[pidx].tokens[i].position = landing;
    }

    let mut captured = Vec::new();
    if is_track(landing) {
        let atk = attacker(&next.players[pidx], &pieces);
        let def = defenders_at(&next.players, landing, player_id);
        match resolve_landing(&atk, &def, landing, color)? {
            Landing::Capture => {
                for victim in def.occupants {
                    if let Some(p) = next.players.iter_mut().find(|p| p.id == victim.player_id) {
                        p.tokens[victim.piece_index].position = YARD;
                    }
                    captured.push(json!({ "playerId": victim.player_id, "pieceIndex": victim.piece_index }));
                }
                let bonus = append_bonus(&mut next.turn, BankSource::KillBonus, entropy);
                bonus_triggers.push(BonusTrigger { kind: TriggerKind::Kill, value: bonus.value });
                debug!(code = %next.code, player = player_id, square = landing, victims = captured.len(), "capture");
            }
            Landing::Blocked => return Err(EngineError::invariant(format!("blocked_landing:{landing}"))),
            Landing::NormalLand | Landing::CoexistNoCapture => {}
        }
    }

    if landing == HOME {
        next.players[pidx].home_count += pieces.len() as u8;
    }

    let steps = if action.is_pair_move() { action.die_value / 2 } else { action.die_value };
    let bonus_rolls: Vec<u8> = bonus_triggers.iter().map(|t| t.value).collect();
    let glide_json = glide.map(|a| json!({ "from": a.tail, "to": a.head }));
    debug!(code = %next.code, player = player_id, entry = action.entry_id, from, to = landing, "moved");
    let mut payload = json!({
        "entryId": action.entry_id,
        "pieceIndex": action.piece_index,
        "partnerIndex": action.partner_index,
        "from": from,
        "to": landing,
        "path": compute_path(color, from, steps),
        "glide": glide_json,
        "captured": captured,
        "bonusRolls": bonus_rolls,
    });

    if usize::from(next.players[pidx].home_count) == TOKENS_PER_PLAYER {
        next.status = MatchStatus::Finished;
        next.winner_id = Some(player_id.to_string());
        next.turn.bank.clear();
        next.turn.phase = TurnPhase::AwaitingRoll;
        next.turn.nonce = entropy.nonce();
        payload["winnerId"] = json!(player_id);
        debug!(code = %next.code, winner = player_id, "match finished");
        record(&mut next, EventType::GameFinished, player_id, payload);
        return Ok(MoveResult { state: next, bonus_triggers, discarded: false });
    }

    let forfeit = forfeit_reason(&next, pidx);
    if let Some(reason) = forfeit {
        debug!(code = %next.code, player = player_id, reason, forfeited = bank_sum(&next.turn.bank), "bank forfeited after move");
        next.turn.bank.clear();
        payload["reason"] = json!(reason);
    }

    if next.turn.bank.is_empty() {
        pass_turn(&mut next)?;
    } else {
        next.turn.phase = TurnPhase::AwaitingMove;
    }
    next.turn.nonce = entropy.nonce();
    payload["nextPlayer"] = json!(next.active_player_id);

    let ty = if forfeit.is_some() { EventType::BankDiscarded } else { EventType::PieceMoved };
    record(&mut next, ty, player_id, payload);

    Ok(MoveResult { state: next, bonus_triggers, discarded: forfeit.is_some() })
}

/// Move a token by index, letting the engine choose the die when none is
/// given. A pair preference that cannot be honoured falls back to any legal
/// move of that token.
pub fn apply_move_auto(
    state: &MatchState,
    player_id: &str,
    piece_index: usize,
    entry_id: Option<EntryId>,
    prefer_pair: Option<bool>,
    entropy: &mut dyn Entropy,
) -> EngineResult<MoveResult> {
    ensure_turn(state, player_id, TurnPhase::AwaitingMove)?;
    let id = entry_id
        .or_else(|| auto_pick_entry(state, player_id, piece_index))
        .ok_or_else(|| EngineError::InvalidAction(format!("no_usable_entry:{piece_index}")))?;
    let entry = state.bank_entry(id).ok_or(EngineError::StaleBankEntry(id))?;
    let actions = legal_actions_for_entry(state, player_id, entry);
    let action = actions
        .iter()
        .find(|a| a.piece_index == piece_index && prefer_pair.map_or(true, |p| a.is_pair_move() == p))
        .or_else(|| actions.iter().find(|a| a.piece_index == piece_index))
        .ok_or_else(|| EngineError::InvalidAction(format!("no_legal_move:{id}:{piece_index}")))?;
    apply_move(state, player_id, action, entropy)
}
