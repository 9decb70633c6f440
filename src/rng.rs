use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of every non-deterministic value the engine consumes.
pub trait Entropy {
    /// A face value in 1..=6.
    fn roll_d6(&mut self) -> u8;
    fn nonce(&mut self) -> String;
}

#[derive(Debug, Clone)]
pub struct SeededEntropy {
    rng: StdRng,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed ^ 0x5EED) }
    }
}

impl Entropy for SeededEntropy {
    fn roll_d6(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }

    fn nonce(&mut self) -> String {
        format!("{:016x}", self.rng.gen::<u64>())
    }
}

/// Replays a fixed roll sequence, cycling when exhausted. Nonces count up.
#[derive(Debug, Clone)]
pub struct ScriptedEntropy {
    rolls: VecDeque<u8>,
    issued: u64,
}

impl ScriptedEntropy {
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        Self { rolls: rolls.into_iter().collect(), issued: 0 }
    }
}

impl Entropy for ScriptedEntropy {
    fn roll_d6(&mut self) -> u8 {
        match self.rolls.pop_front() {
            Some(v) => {
                self.rolls.push_back(v);
                v.clamp(1, 6)
            }
            None => 1,
        }
    }

    fn nonce(&mut self) -> String {
        self.issued += 1;
        format!("n{}", self.issued)
    }
}
