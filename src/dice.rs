use crate::error::{EngineError, EngineResult};
use crate::model::{BankEntry, BankSource, EntryId, Turn};
use crate::rng::Entropy;

fn push_entry(turn: &mut Turn, value: u8, source: BankSource) -> BankEntry {
    turn.bank_sequence += 1;
    let entry = BankEntry { id: turn.bank_sequence, value, source, created_at_sequence: turn.bank_sequence };
    turn.bank.push(entry.clone());
    if source != BankSource::Base {
        turn.bonus_chain += 1;
    }
    entry
}

/// Base roll plus one chained die per 6, at most `chain_cap` chained dice.
pub fn roll_chain(turn: &mut Turn, chain_cap: u8, entropy: &mut dyn Entropy) -> Vec<BankEntry> {
    let mut added = Vec::new();
    let mut source = BankSource::Base;
    let mut chained = 0u8;
    let mut value = entropy.roll_d6();
    loop {
        added.push(push_entry(turn, value, source));
        if value != 6 || chained >= chain_cap {
            break;
        }
        chained += 1;
        source = BankSource::ChainBonus;
        value = entropy.roll_d6();
    }
    added
}

pub fn append_bonus(turn: &mut Turn, source: BankSource, entropy: &mut dyn Entropy) -> BankEntry {
    debug_assert!(matches!(source, BankSource::ArrowBonus | BankSource::KillBonus));
    let value = entropy.roll_d6();
    push_entry(turn, value, source)
}

/// Spends an entry. A stale id means the die was already used.
pub fn remove_entry(bank: &mut Vec<BankEntry>, id: EntryId) -> EngineResult<BankEntry> {
    let idx = bank.iter().position(|e| e.id == id).ok_or(EngineError::StaleBankEntry(id))?;
    Ok(bank.remove(idx))
}

pub fn bank_sum(bank: &[BankEntry]) -> u32 {
    bank.iter().map(|e| u32::from(e.value)).sum()
}

pub fn first_usable<'a>(bank: &'a [BankEntry], mut usable: impl FnMut(&BankEntry) -> bool) -> Option<&'a BankEntry> {
    bank.iter().find(|e| usable(e))
}
