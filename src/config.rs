use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Per-match rule knobs, persisted with the match so a running game never
/// changes rules underneath its players.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RulesConfig {
    /// Extra dice granted by consecutive sixes in one roll.
    pub chain_cap: u8,
    /// Plies of own-turn lookahead for the hard bot.
    pub lookahead_depth: u8,
    pub players_min: usize,
    pub players_max: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self { chain_cap: 5, lookahead_depth: 3, players_min: 2, players_max: 4 }
    }
}

impl RulesConfig {
    pub fn from_json(raw: &str) -> EngineResult<Self> {
        let cfg: Self = serde_json::from_str(raw).map_err(|e| EngineError::Snapshot(e.to_string()))?;
        if cfg.players_min < 2 || cfg.players_max > 4 || cfg.players_min > cfg.players_max {
            return Err(EngineError::Snapshot(format!("player bounds {}..={}", cfg.players_min, cfg.players_max)));
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = RulesConfig::from_json(r#"{"chain_cap": 2}"#).unwrap();
        assert_eq!(cfg.chain_cap, 2);
        assert_eq!(cfg.lookahead_depth, 3);
    }

    #[test]
    fn rejects_impossible_player_bounds() {
        assert!(RulesConfig::from_json(r#"{"players_min": 3, "players_max": 2}"#).is_err());
        assert!(RulesConfig::from_json(r#"{"players_max": 5}"#).is_err());
    }
}
