use serde::{Deserialize, Serialize};

use crate::board::{is_safe, INNER_ARROWS, OUTER_ARROWS};
use crate::model::{Color, Position, TriggerKind};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ArrowKind { Outer, Inner }

impl ArrowKind {
    pub fn trigger(self) -> TriggerKind {
        match self {
            ArrowKind::Outer => TriggerKind::ArrowOuter,
            ArrowKind::Inner => TriggerKind::ArrowInner,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArrowEffect {
    pub kind: ArrowKind,
    pub tail: Position,
    pub head: Position,
}

pub fn outer_arrow(position: Position) -> Option<ArrowEffect> {
    OUTER_ARROWS
        .iter()
        .find(|&&(tail, _)| tail == position)
        .map(|&(tail, head)| ArrowEffect { kind: ArrowKind::Outer, tail, head })
}

/// Only the owning color glides; everyone else treats the tail as a plain square.
pub fn inner_arrow(position: Position, color: Color) -> Option<ArrowEffect> {
    INNER_ARROWS
        .iter()
        .find(|&&(tail, _, owner)| tail == position && owner == color)
        .map(|&(tail, head, _)| ArrowEffect { kind: ArrowKind::Inner, tail, head })
}

pub fn resolve_arrow(position: Position, color: Color) -> Option<ArrowEffect> {
    outer_arrow(position).or_else(|| inner_arrow(position, color))
}

/// Where a token landing on `position` finally rests.
pub fn glide_target(position: Position, color: Color) -> Position {
    resolve_arrow(position, color).map_or(position, |a| a.head)
}

pub fn head_allows_capture(head: Position) -> bool {
    !is_safe(head)
}
