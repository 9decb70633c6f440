use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::error::{EngineError, EngineResult};

pub type PlayerId = String;
pub type EntryId = u32;
pub type Position = i8;

pub const YARD: Position = -1;
pub const HOME: Position = 58;
pub const TOKENS_PER_PLAYER: usize = 4;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color { Red, Green, Yellow, Blue }

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BotLevel { Easy, Medium, Hard }

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    Bot { level: Option<BotLevel> },
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchStatus { Lobby, Running, Finished }

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnPhase { AwaitingRoll, AwaitingMove }

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BankSource { Base, ChainBonus, ArrowBonus, KillBonus }

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    DiceRoll,
    PieceMoved,
    BankDiscarded,
    GameFinished,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TriggerKind { ArrowOuter, ArrowInner, Kill }

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub position: Position,
}

impl Token {
    pub fn in_yard(&self) -> bool { self.position == YARD }
    pub fn is_home(&self) -> bool { self.position == HOME }
    pub fn on_track(&self) -> bool { (0..crate::board::TRACK_LEN).contains(&self.position) }
    pub fn in_lane(&self) -> bool { (crate::board::LANE_START..HOME).contains(&self.position) }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub kind: PlayerKind,
    pub color: Color,
    pub display: String,
    pub connected: bool,
    pub tokens: [Token; TOKENS_PER_PLAYER],
    pub home_count: u8,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, display: impl Into<String>, color: Color) -> Self {
        Self {
            id: id.into(),
            kind: PlayerKind::Human,
            color,
            display: display.into(),
            connected: true,
            tokens: [Token { position: YARD }; TOKENS_PER_PLAYER],
            home_count: 0,
        }
    }

    pub fn bot(id: impl Into<PlayerId>, display: impl Into<String>, color: Color, level: BotLevel) -> Self {
        Self { kind: PlayerKind::Bot { level: Some(level) }, ..Self::new(id, display, color) }
    }

    pub fn positions(&self) -> [Position; TOKENS_PER_PLAYER] {
        self.tokens.map(|t| t.position)
    }

    /// Bots always play themselves; humans are covered by the AI while disconnected.
    pub fn is_bot_controlled(&self) -> bool {
        matches!(self.kind, PlayerKind::Bot { .. }) || !self.connected
    }

    pub fn bot_level(&self) -> BotLevel {
        match self.kind {
            PlayerKind::Bot { level: Some(level) } => level,
            _ => BotLevel::Medium,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BankEntry {
    pub id: EntryId,
    pub value: u8,
    pub source: BankSource,
    pub created_at_sequence: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub phase: TurnPhase,
    pub bank: Vec<BankEntry>,
    pub bank_sequence: u32,
    pub nonce: String,
    pub bonus_chain: u32,
}

impl Turn {
    pub fn fresh(nonce: String) -> Self {
        Self { phase: TurnPhase::AwaitingRoll, bank: vec![], bank_sequence: 0, nonce, bonus_chain: 0 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub seq: u64,
    pub ty: EventType,
    pub player_id: PlayerId,
    pub payload: serde_json::Value,
    pub state_hash: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BonusTrigger {
    pub kind: TriggerKind,
    pub value: u8,
}

/// One candidate move: which die is spent on which token, and where it ends up.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Action {
    pub entry_id: EntryId,
    pub die_value: u8,
    pub piece_index: usize,
    pub partner_index: Option<usize>,
    /// Landing square before any arrow glide.
    pub target: Position,
    pub glide_head: Option<Position>,
}

impl Action {
    pub fn is_pair_move(&self) -> bool { self.partner_index.is_some() }

    /// Square the token(s) come to rest on.
    pub fn landing(&self) -> Position { self.glide_head.unwrap_or(self.target) }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MatchState {
    pub code: String,
    pub status: MatchStatus,
    pub players: Vec<Player>,
    pub active_player_id: PlayerId,
    pub turn: Turn,
    pub winner_id: Option<PlayerId>,
    pub last_event: Option<Event>,
    pub events_seq: u64,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl MatchState {
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_index(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn active_player(&self) -> Option<&Player> {
        self.player(&self.active_player_id)
    }

    pub fn bank_entry(&self, id: EntryId) -> Option<&BankEntry> {
        self.turn.bank.iter().find(|e| e.id == id)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string(self).map_err(|e| EngineError::Snapshot(e.to_string()))
    }

    pub fn from_json(blob: &str) -> EngineResult<Self> {
        let state: Self = serde_json::from_str(blob).map_err(|e| EngineError::Snapshot(e.to_string()))?;
        state.check_invariants()?;
        Ok(state)
    }

    pub fn check_invariants(&self) -> EngineResult<()> {
        for p in &self.players {
            if let Some(t) = p.tokens.iter().find(|t| !(YARD..=HOME).contains(&t.position)) {
                return Err(EngineError::invariant(format!("token_out_of_range:{}:{}", p.id, t.position)));
            }
            let finished = p.tokens.iter().filter(|t| t.is_home()).count();
            if finished != usize::from(p.home_count) {
                return Err(EngineError::invariant(format!("home_count_mismatch:{}", p.id)));
            }
        }
        if self.active_player().is_none() {
            return Err(EngineError::invariant("unknown_active_player"));
        }
        let running = self.status == MatchStatus::Running;
        if running && self.turn.phase == TurnPhase::AwaitingMove && self.turn.bank.is_empty() {
            return Err(EngineError::invariant("awaiting_move_with_empty_bank"));
        }
        Ok(())
    }
}
