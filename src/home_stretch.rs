//! Strict exact-sum rule: once a player only has lane tokens left in play,
//! every die in the bank has to be spendable, or the whole bank is lost.

use std::collections::HashMap;

use crate::board::is_lane;
use crate::model::{BankEntry, Player, Position, HOME};

/// Every unfinished token sits in the lane, and at least one does. A token
/// on the ring or still in the yard switches the rule off.
pub fn is_lane_only(player: &Player) -> bool {
    let mut any = false;
    for t in player.tokens.iter().filter(|t| !t.is_home()) {
        if !t.in_lane() {
            return false;
        }
        any = true;
    }
    any
}

pub fn required_exact_steps(player: &Player) -> u32 {
    player.tokens.iter().filter(|t| t.in_lane()).map(|t| (HOME - t.position) as u32).sum()
}

type MemoKey = (Vec<Position>, Vec<u8>);

fn key(positions: &[Position], dice: &[u8]) -> MemoKey {
    let mut p = positions.to_vec();
    p.sort_unstable();
    let mut d = dice.to_vec();
    d.sort_unstable();
    (p, d)
}

/// Can every die be assigned to some lane token, in some order, without overshooting?
pub fn can_exhaust(positions: &[Position], dice: &[u8]) -> bool {
    let lane: Vec<Position> = positions.iter().copied().filter(|&p| is_lane(p)).collect();
    exhaust(&lane, dice, &mut HashMap::new())
}

fn exhaust(positions: &[Position], dice: &[u8], memo: &mut HashMap<MemoKey, bool>) -> bool {
    if dice.is_empty() {
        return true;
    }
    let k = key(positions, dice);
    if let Some(&hit) = memo.get(&k) {
        return hit;
    }

    let mut found = false;
    'outer: for di in 0..dice.len() {
        let mut rest = dice.to_vec();
        let die = rest.remove(di);
        for pi in 0..positions.len() {
            let next = positions[pi] + die as Position;
            if next > HOME {
                continue;
            }
            let mut moved = positions.to_vec();
            if next == HOME {
                moved.remove(pi);
            } else {
                moved[pi] = next;
            }
            if exhaust(&moved, &rest, memo) {
                found = true;
                break 'outer;
            }
        }
    }
    memo.insert(k, found);
    found
}

pub fn should_discard(player: &Player, bank: &[BankEntry]) -> bool {
    if bank.is_empty() || !is_lane_only(player) {
        return false;
    }
    let dice: Vec<u8> = bank.iter().map(|e| e.value).collect();
    !can_exhaust(&player.positions(), &dice)
}
