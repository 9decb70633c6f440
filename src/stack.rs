use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::{are_allied, is_track};
use crate::model::{Color, Player, PlayerId, Position};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StackKind {
    Empty,
    Single,
    HeavyPair,
    Triple,
    Quad,
    Allied,
    MixedEnemy,
}

impl StackKind {
    /// Triples, quads and allied stacks: invincible, and one row/column of the combat matrix.
    pub fn is_strong(self) -> bool {
        matches!(self, StackKind::Triple | StackKind::Quad | StackKind::Allied)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Occupant {
    pub player_id: PlayerId,
    pub color: Color,
    pub piece_index: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StackDescriptor {
    pub kind: StackKind,
    pub occupants: Vec<Occupant>,
    pub invincible: bool,
    pub pair: bool,
}

impl StackDescriptor {
    fn new(kind: StackKind, occupants: Vec<Occupant>) -> Self {
        Self { kind, occupants, invincible: kind.is_strong(), pair: kind == StackKind::HeavyPair }
    }
}

/// Posture of whatever sits on one square. Always derived from live
/// positions; never keep the result across a transition.
pub fn classify(occupants: Vec<Occupant>) -> StackDescriptor {
    match occupants.len() {
        0 => return StackDescriptor::new(StackKind::Empty, occupants),
        1 => return StackDescriptor::new(StackKind::Single, occupants),
        _ => {}
    }

    let mut by_color: BTreeMap<Color, usize> = BTreeMap::new();
    for o in &occupants {
        *by_color.entry(o.color).or_default() += 1;
    }
    let counts: Vec<(Color, usize)> = by_color.into_iter().collect();

    let kind = match counts.as_slice() {
        [(_, 2)] => StackKind::HeavyPair,
        [(_, 3)] => StackKind::Triple,
        [(_, _)] => StackKind::Quad,
        [(a, _), (b, _)] if are_allied(*a, *b) => StackKind::Allied,
        // Covers the single-sitting-on-enemy-pair case and every other mix.
        _ => StackKind::MixedEnemy,
    };
    StackDescriptor::new(kind, occupants)
}

/// Tokens of every player resting on a shared-track square. Lane cells are
/// color-private, so they never have shared occupants.
pub fn occupants_at(players: &[Player], position: Position) -> Vec<Occupant> {
    if !is_track(position) {
        return vec![];
    }
    let mut out = Vec::new();
    for p in players {
        for (i, t) in p.tokens.iter().enumerate() {
            if t.position == position {
                out.push(Occupant { player_id: p.id.clone(), color: p.color, piece_index: i });
            }
        }
    }
    out
}

/// What a mover faces on `position`: everyone except its own tokens.
pub fn defenders_at(players: &[Player], position: Position, mover: &str) -> StackDescriptor {
    classify(occupants_at(players, position).into_iter().filter(|o| o.player_id != mover).collect())
}

/// The posture a moving token (or pair) attacks with.
pub fn attacker(player: &Player, pieces: &[usize]) -> StackDescriptor {
    classify(
        pieces
            .iter()
            .map(|&i| Occupant { player_id: player.id.clone(), color: player.color, piece_index: i })
            .collect(),
    )
}

/// Another token of the same player on the same ring square, if any.
pub fn pair_partner(player: &Player, piece_index: usize) -> Option<usize> {
    let pos = player.tokens.get(piece_index)?.position;
    if !is_track(pos) {
        return None;
    }
    player.tokens.iter().enumerate().find(|&(i, t)| i != piece_index && t.position == pos).map(|(i, _)| i)
}

/// Disjoint heavy pairs of one player on the shared track.
pub fn find_pairs(player: &Player) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    let mut used = [false; 4];
    for i in 0..player.tokens.len() {
        if used[i] || !player.tokens[i].on_track() {
            continue;
        }
        if let Some(j) = (i + 1..player.tokens.len()).find(|&j| !used[j] && player.tokens[j].position == player.tokens[i].position) {
            used[i] = true;
            used[j] = true;
            pairs.push((i, j));
        }
    }
    pairs
}
