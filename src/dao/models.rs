use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Lifecycle of a persisted game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatusEntity {
    /// Players may still join; no cards have been dealt.
    PreLobby,
    /// Turn order is fixed and players are playing cards.
    InProgress,
    /// The game has finished; no further mutation is accepted.
    Over,
}

/// Single `{uid, display_name}` pair used for the host and the turn holder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRefEntity {
    /// Stable identifier of the referenced user.
    pub uid: String,
    /// Display name the user chose for this game.
    pub display_name: String,
}

/// One card as dealt into a player's hand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameCardEntity {
    /// Identifier of the card, unique within its pack.
    pub id: u32,
    /// Short card title.
    pub title: String,
    /// Longer card prompt shown when the card is played.
    pub description: String,
}

/// Participant of a game together with their current hand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier of the owning user.
    pub uid: String,
    /// Display name supplied when the player joined.
    pub display_name: String,
    /// Cards currently held, in deal order.
    pub cards: Vec<GameCardEntity>,
}

/// Aggregate game document persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the game.
    pub game_id: String,
    /// Human-shareable code used to find and join the game.
    pub join_code: String,
    /// Display name of the match.
    pub display_name: String,
    /// Player who created the game.
    pub host: PlayerRefEntity,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Identifier of the card pack cards are dealt from.
    pub card_pack: String,
    /// Number of cards dealt to each player at start.
    pub card_amount: usize,
    /// Current lifecycle status.
    pub status: GameStatusEntity,
    /// Identifiers of every player, in join order.
    pub player_ids: Vec<String>,
    /// Participants in turn order (join order until the game starts).
    pub players: Vec<PlayerEntity>,
    /// Player whose turn it is; only set while the game is in progress.
    pub current_turn: Option<PlayerRefEntity>,
    /// Monotonic counter bumped on every persisted mutation, used as an
    /// optimistic concurrency token by the play operation.
    #[serde(default)]
    pub turn_sequence: u64,
}

/// Immutable named collection of cards available for dealing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardPackEntity {
    /// Primary key of the pack.
    pub pack_id: String,
    /// Display name of the pack.
    pub display_name: String,
    /// Short description shown when choosing a pack.
    pub description: String,
    /// Cards contained in the pack.
    pub cards: Vec<GameCardEntity>,
}

/// User record owned by the account system; read here only to resolve
/// push-notification device tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntity {
    /// Stable identifier of the user.
    pub uid: String,
    /// Phone number the account was registered with.
    pub phone_number: String,
    /// Device token push notifications are delivered to.
    pub fcm_token: String,
}
