use serde::{Deserialize, Serialize};

use crate::board::is_safe;
use crate::error::{EngineError, EngineResult};
use crate::model::{Color, Position};
use crate::stack::{StackDescriptor, StackKind};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Landing {
    NormalLand,
    Capture,
    CoexistNoCapture,
    Blocked,
}

/// Rows and columns of the posture table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Weight { Single, Pair, Strong }

fn weight(kind: StackKind) -> Option<Weight> {
    match kind {
        StackKind::Single => Some(Weight::Single),
        StackKind::HeavyPair => Some(Weight::Pair),
        k if k.is_strong() => Some(Weight::Strong),
        _ => None,
    }
}

const TABLE: [[Landing; 3]; 3] = [
    // defender:  single            pair                        strong
    [Landing::Capture, Landing::CoexistNoCapture, Landing::Blocked], // single
    [Landing::Capture, Landing::Capture, Landing::Blocked],          // pair
    [Landing::Capture, Landing::Capture, Landing::Blocked],          // strong
];

/// Precedence: own color, safe square, invincible defender, mixed-enemy
/// coexistence, then the posture table.
pub fn resolve_landing(
    attacker: &StackDescriptor,
    defender: &StackDescriptor,
    square: Position,
    attacker_color: Color,
) -> EngineResult<Landing> {
    let atk = weight(attacker.kind)
        .ok_or_else(|| EngineError::invariant(format!("attacker_posture:{:?}", attacker.kind)))?;

    if defender.kind == StackKind::Empty || defender.occupants.iter().all(|o| o.color == attacker_color) {
        return Ok(Landing::NormalLand);
    }
    if is_safe(square) {
        return Ok(Landing::NormalLand);
    }
    if defender.invincible {
        return Ok(Landing::Blocked);
    }
    if defender.kind == StackKind::MixedEnemy {
        return Ok(Landing::NormalLand);
    }
    let def = weight(defender.kind)
        .ok_or_else(|| EngineError::invariant(format!("defender_posture:{:?}", defender.kind)))?;
    Ok(TABLE[atk as usize][def as usize])
}

pub fn can_capture(attacker: &StackDescriptor, defender: &StackDescriptor, square: Position, attacker_color: Color) -> bool {
    matches!(resolve_landing(attacker, defender, square, attacker_color), Ok(Landing::Capture))
}
