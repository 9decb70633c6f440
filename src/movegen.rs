use std::collections::HashSet;

use crate::arrow::resolve_arrow;
use crate::board::{destination, is_lane, is_pair_split_safe, is_track};
use crate::combat::{resolve_landing, Landing};
use crate::dice::first_usable;
use crate::model::{Action, BankEntry, EntryId, MatchState, Player, Position, HOME, YARD};
use crate::stack::{attacker, defenders_at, pair_partner};

/// Tests a candidate against the square it would finally rest on. `None` when
/// the landing is blocked.
fn candidate(state: &MatchState, player: &Player, entry: &BankEntry, pieces: &[usize], target: Position) -> Option<Action> {
    let glide = resolve_arrow(target, player.color);
    let landing = glide.map_or(target, |a| a.head);

    if !is_lane(landing) && landing != HOME {
        let atk = attacker(player, pieces);
        let def = defenders_at(&state.players, landing, &player.id);
        // Postures here are always attack-capable, so an error cannot occur.
        match resolve_landing(&atk, &def, landing, player.color) {
            Ok(Landing::Blocked) | Err(_) => return None,
            Ok(_) => {}
        }
    }

    Some(Action {
        entry_id: entry.id,
        die_value: entry.value,
        piece_index: pieces[0],
        partner_index: pieces.get(1).copied(),
        target,
        glide_head: glide.map(|a| a.head),
    })
}

pub fn legal_actions_for_entry(state: &MatchState, player_id: &str, entry: &BankEntry) -> Vec<Action> {
    let Some(player) = state.player(player_id) else {
        return vec![];
    };
    let mut actions = Vec::new();

    for (i, token) in player.tokens.iter().enumerate() {
        let pos = token.position;
        if pos == HOME {
            continue;
        }

        if pos == YARD {
            if let Some(start) = destination(player.color, YARD, entry.value) {
                actions.extend(candidate(state, player, entry, &[i], start));
            }
            continue;
        }

        if is_track(pos) {
            match pair_partner(player, i) {
                Some(partner) => {
                    if entry.value % 2 == 0 {
                        if let Some(target) = destination(player.color, pos, entry.value / 2) {
                            actions.extend(candidate(state, player, entry, &[i, partner], target));
                        }
                    }
                    if is_pair_split_safe(pos) {
                        if let Some(target) = destination(player.color, pos, entry.value) {
                            actions.extend(candidate(state, player, entry, &[i], target));
                        }
                    }
                }
                None => {
                    if let Some(target) = destination(player.color, pos, entry.value) {
                        actions.extend(candidate(state, player, entry, &[i], target));
                    }
                }
            }
            continue;
        }

        let next = pos + entry.value as Position;
        if is_lane(pos) && next <= HOME {
            actions.push(Action {
                entry_id: entry.id,
                die_value: entry.value,
                piece_index: i,
                partner_index: None,
                target: next,
                glide_head: None,
            });
        }
    }

    dedup(actions)
}

pub fn legal_actions(state: &MatchState, player_id: &str) -> Vec<Action> {
    if state.player(player_id).is_none() {
        return vec![];
    }
    let all = state
        .turn
        .bank
        .iter()
        .flat_map(|e| legal_actions_for_entry(state, player_id, e))
        .collect();
    dedup(all)
}

fn dedup(actions: Vec<Action>) -> Vec<Action> {
    let mut seen = HashSet::new();
    actions
        .into_iter()
        .filter(|a| seen.insert((a.entry_id, a.piece_index, a.is_pair_move())))
        .collect()
}

pub fn is_legal_action(state: &MatchState, player_id: &str, entry_id: EntryId, piece_index: usize) -> bool {
    state
        .bank_entry(entry_id)
        .is_some_and(|e| legal_actions_for_entry(state, player_id, e).iter().any(|a| a.piece_index == piece_index))
}

/// First bank entry, in roll order, that can move the given token.
pub fn auto_pick_entry(state: &MatchState, player_id: &str, piece_index: usize) -> Option<EntryId> {
    first_usable(&state.turn.bank, |e| {
        legal_actions_for_entry(state, player_id, e).iter().any(|a| a.piece_index == piece_index)
    })
    .map(|e| e.id)
}
