//! Static board geometry. Positions are absolute: 0..52 is the shared ring,
//! 52..58 the mover's own lane, 58 the finished cell, -1 the yard.

use serde::{Deserialize, Serialize};

use crate::model::{Color, Position, HOME, YARD};

pub const TRACK_LEN: Position = 52;
pub const LANE_START: Position = 52;

pub const START_BOXES: [Position; 4] = [0, 13, 26, 39];
pub const SAFE_RHOMBUSES: [Position; 4] = [8, 21, 34, 47];

/// Outer arrows, usable by every color: (tail, head).
pub const OUTER_ARROWS: [(Position, Position); 4] = [(4, 9), (17, 22), (30, 35), (43, 48)];

/// Inner arrows sit on the corner before each lane entry and lead straight
/// into the lane, but only for the color that owns that lane.
pub const INNER_ARROWS: [(Position, Position, Color); 4] = [
    (11, LANE_START, Color::Green),
    (24, LANE_START, Color::Yellow),
    (37, LANE_START, Color::Blue),
    (50, LANE_START, Color::Red),
];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SquareKind {
    Yard,
    FinalTriangle,
    HomeStretch,
    OuterArrowTail,
    InnerArrowTail,
    StartBox,
    SafeRhombus,
    OuterTrack,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Yellow, Color::Blue];

    pub fn start_index(self) -> Position {
        match self {
            Color::Red => 0,
            Color::Green => 13,
            Color::Yellow => 26,
            Color::Blue => 39,
        }
    }

    /// Last ring cell before the color turns into its lane.
    pub fn lane_entry(self) -> Position {
        match self {
            Color::Red => 51,
            Color::Green => 12,
            Color::Yellow => 25,
            Color::Blue => 38,
        }
    }

    /// Diagonal partners: RED-YELLOW, GREEN-BLUE.
    pub fn ally(self) -> Color {
        match self {
            Color::Red => Color::Yellow,
            Color::Yellow => Color::Red,
            Color::Green => Color::Blue,
            Color::Blue => Color::Green,
        }
    }
}

pub fn are_allied(a: Color, b: Color) -> bool {
    a.ally() == b
}

pub fn is_safe(position: Position) -> bool {
    START_BOXES.contains(&position) || SAFE_RHOMBUSES.contains(&position)
}

/// A heavy pair resting here may also move its tokens one at a time.
pub fn is_pair_split_safe(position: Position) -> bool {
    is_safe(position)
}

pub fn is_track(position: Position) -> bool {
    (0..TRACK_LEN).contains(&position)
}

pub fn is_lane(position: Position) -> bool {
    (LANE_START..HOME).contains(&position)
}

pub fn square_kind(position: Position) -> SquareKind {
    match position {
        YARD => SquareKind::Yard,
        HOME => SquareKind::FinalTriangle,
        p if is_lane(p) => SquareKind::HomeStretch,
        p if !is_track(p) => SquareKind::Yard,
        p if OUTER_ARROWS.iter().any(|&(tail, _)| tail == p) => SquareKind::OuterArrowTail,
        p if INNER_ARROWS.iter().any(|&(tail, _, _)| tail == p) => SquareKind::InnerArrowTail,
        p if START_BOXES.contains(&p) => SquareKind::StartBox,
        p if SAFE_RHOMBUSES.contains(&p) => SquareKind::SafeRhombus,
        _ => SquareKind::OuterTrack,
    }
}

/// Cells visited when moving `steps` from `start`, last element is the
/// destination. Empty when the move is impossible: leaving the yard on
/// anything but a 6, overshooting the finished cell, or moving a finished token.
pub fn compute_path(color: Color, start: Position, steps: u8) -> Vec<Position> {
    let mut path = Vec::with_capacity(usize::from(steps));
    let mut cur = start;
    if start == YARD {
        if steps == 6 {
            path.push(color.start_index());
        }
        return path;
    }
    for _ in 0..steps {
        cur = if is_track(cur) {
            if cur == color.lane_entry() { LANE_START } else { (cur + 1) % TRACK_LEN }
        } else if is_lane(cur) {
            cur + 1
        } else {
            return vec![];
        };
        path.push(cur);
    }
    path
}

/// Destination of a move, if it is possible at all.
pub fn destination(color: Color, start: Position, steps: u8) -> Option<Position> {
    let path = compute_path(color, start, steps);
    let expected = if start == YARD { 1 } else { usize::from(steps) };
    if path.len() == expected { path.last().copied() } else { None }
}
