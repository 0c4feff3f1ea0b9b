use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::{format_system_time, validation::validate_display_name},
    state::game::{Game, GameCard, GameStatus, Player, PlayerRef},
};

/// Payload for joining a game lobby.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinGameRequest {
    /// Name the joining player wants to appear under.
    pub display_name: String,
}

impl Validate for JoinGameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_display_name(&self.display_name) {
            errors.add("display_name", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Result of a join operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinGameResponse {
    /// Whether the join was applied.
    pub success: bool,
}

/// Result of a start operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct StartGameResponse {
    /// Whether the game was started.
    pub success: bool,
}

/// Payload for playing a card.
///
/// Fields are optional so absence can be told apart from legitimate values
/// like card id `0`; the service rejects missing ones explicitly.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlayCardRequest {
    /// Identifier of the card to play from the caller's hand.
    #[serde(default)]
    pub card_id: Option<u32>,
    /// Player the card is aimed at, recorded for notification context.
    #[serde(default)]
    pub target_uid: Option<String>,
    /// Turn sequence the caller read before playing. When present, a stale
    /// value is rejected instead of overwriting a newer turn.
    #[serde(default)]
    pub turn_sequence: Option<u64>,
}

/// Result of a play operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayCardResponse {
    /// Whether the play was applied.
    pub success: bool,
    /// Whether this play ended the game.
    pub game_over: bool,
    /// Human-readable outcome ("New turn: ..." or "Game Over").
    pub message: String,
}

/// Lifecycle status as exposed to clients.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatusDto {
    /// Players may still join.
    PreLobby,
    /// The game is running.
    InProgress,
    /// The game has finished.
    Over,
}

/// Identity pair exposed for the host and the turn holder.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerRefDto {
    /// Stable identifier of the referenced user.
    pub uid: String,
    /// Display name of the referenced user.
    pub display_name: String,
}

/// One card in the caller's own hand.
#[derive(Debug, Serialize, ToSchema)]
pub struct CardDto {
    /// Identifier of the card within its pack.
    pub id: u32,
    /// Short card title.
    pub title: String,
    /// Longer card prompt.
    pub description: String,
}

/// Roster entry with the hand reduced to its size. Other players' cards are
/// never exposed.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Stable identifier of the player.
    pub uid: String,
    /// Display name of the player.
    pub display_name: String,
    /// Number of cards the player holds.
    pub card_count: usize,
}

/// Persisted game state as returned to a (re)connecting client.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSummary {
    /// Primary key of the game.
    pub game_id: String,
    /// Human-shareable join code.
    pub join_code: String,
    /// Display name of the match.
    pub display_name: String,
    /// Player who created the game.
    pub host: PlayerRefDto,
    /// Creation timestamp, RFC 3339 formatted.
    pub created_at: String,
    /// Identifier of the card pack in use.
    pub card_pack: String,
    /// Number of cards dealt to each player at start.
    pub card_amount: usize,
    /// Current lifecycle status.
    pub status: GameStatusDto,
    /// Roster in turn order, hands reduced to counts.
    pub players: Vec<PlayerSummary>,
    /// Player whose turn it is, while the game is in progress.
    pub current_turn: Option<PlayerRefDto>,
    /// Concurrency token to echo back in the next play request.
    pub turn_sequence: u64,
    /// The caller's own hand; empty when the caller is not in the roster.
    pub your_hand: Vec<CardDto>,
}

impl GameSummary {
    /// Project a game for one caller, attaching only that caller's hand.
    pub fn for_caller(game: Game, caller_uid: &str) -> Self {
        let your_hand = game
            .players
            .iter()
            .find(|player| player.uid == caller_uid)
            .map(|player| player.cards.iter().cloned().map(Into::into).collect())
            .unwrap_or_default();

        Self {
            game_id: game.game_id,
            join_code: game.join_code,
            display_name: game.display_name,
            host: game.host.into(),
            created_at: format_system_time(game.created_at),
            card_pack: game.card_pack,
            card_amount: game.card_amount,
            status: game.status.into(),
            players: game.players.into_iter().map(Into::into).collect(),
            current_turn: game.current_turn.map(Into::into),
            turn_sequence: game.turn_sequence,
            your_hand,
        }
    }
}

impl From<GameStatus> for GameStatusDto {
    fn from(value: GameStatus) -> Self {
        match value {
            GameStatus::PreLobby => GameStatusDto::PreLobby,
            GameStatus::InProgress => GameStatusDto::InProgress,
            GameStatus::Over => GameStatusDto::Over,
        }
    }
}

impl From<PlayerRef> for PlayerRefDto {
    fn from(value: PlayerRef) -> Self {
        Self {
            uid: value.uid,
            display_name: value.display_name,
        }
    }
}

impl From<GameCard> for CardDto {
    fn from(value: GameCard) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
        }
    }
}

impl From<Player> for PlayerSummary {
    fn from(value: Player) -> Self {
        Self {
            uid: value.uid,
            display_name: value.display_name,
            card_count: value.cards.len(),
        }
    }
}
