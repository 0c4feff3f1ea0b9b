use std::time::SystemTime;

use crate::dao::models::{
    CardPackEntity, GameCardEntity, GameEntity, GameStatusEntity, PlayerEntity, PlayerRefEntity,
};

/// Lifecycle of a game.
///
/// Transitions only move forward: [`PreLobby`] to [`InProgress`] when the host
/// starts the game, [`InProgress`] to [`Over`] when turn order reaches a
/// player with an empty hand.
///
/// [`PreLobby`]: GameStatus::PreLobby
/// [`InProgress`]: GameStatus::InProgress
/// [`Over`]: GameStatus::Over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Players may still join; no cards have been dealt.
    PreLobby,
    /// Turn order is fixed and players are playing cards.
    InProgress,
    /// The game has finished; no further mutation is accepted.
    Over,
}

/// Reference to a player by identity, used for the host and the turn holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRef {
    /// Stable identifier of the referenced user.
    pub uid: String,
    /// Display name the user chose for this game.
    pub display_name: String,
}

impl PlayerRef {
    /// Reference the given player.
    pub fn of(player: &Player) -> Self {
        Self {
            uid: player.uid.clone(),
            display_name: player.display_name.clone(),
        }
    }
}

/// One card as dealt into a player's hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCard {
    /// Identifier of the card, unique within its pack.
    pub id: u32,
    /// Short card title.
    pub title: String,
    /// Longer card prompt shown when the card is played.
    pub description: String,
}

/// Participant of a game together with their current hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable identifier of the owning user.
    pub uid: String,
    /// Display name supplied when the player joined.
    pub display_name: String,
    /// Cards currently held, in deal order.
    pub cards: Vec<GameCard>,
}

/// Aggregate root of one match.
///
/// The `players` order doubles as turn order once the game starts; the
/// separate `player_ids` list keeps join order and is what notification
/// recipient sets are computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// Primary key of the game.
    pub game_id: String,
    /// Human-shareable code used to find and join the game.
    pub join_code: String,
    /// Display name of the match.
    pub display_name: String,
    /// Player who created the game.
    pub host: PlayerRef,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Identifier of the card pack cards are dealt from.
    pub card_pack: String,
    /// Number of cards dealt to each player at start.
    pub card_amount: usize,
    /// Current lifecycle status.
    pub status: GameStatus,
    /// Identifiers of every player, in join order.
    pub player_ids: Vec<String>,
    /// Participants; their order is turn order once the game starts.
    pub players: Vec<Player>,
    /// Player whose turn it is; only set while the game is in progress.
    pub current_turn: Option<PlayerRef>,
    /// Monotonic counter bumped on every mutation, used as an optimistic
    /// concurrency token by the play operation.
    pub turn_sequence: u64,
}

/// Immutable named collection of cards available for dealing.
///
/// Packs are never consumed: every player's hand is drawn from a fresh copy,
/// so two players may hold cards with the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPack {
    /// Primary key of the pack.
    pub pack_id: String,
    /// Display name of the pack.
    pub display_name: String,
    /// Short description shown when choosing a pack.
    pub description: String,
    /// Cards contained in the pack.
    pub cards: Vec<GameCard>,
}

impl From<GameStatusEntity> for GameStatus {
    fn from(value: GameStatusEntity) -> Self {
        match value {
            GameStatusEntity::PreLobby => GameStatus::PreLobby,
            GameStatusEntity::InProgress => GameStatus::InProgress,
            GameStatusEntity::Over => GameStatus::Over,
        }
    }
}

impl From<GameStatus> for GameStatusEntity {
    fn from(value: GameStatus) -> Self {
        match value {
            GameStatus::PreLobby => GameStatusEntity::PreLobby,
            GameStatus::InProgress => GameStatusEntity::InProgress,
            GameStatus::Over => GameStatusEntity::Over,
        }
    }
}

impl From<PlayerRefEntity> for PlayerRef {
    fn from(value: PlayerRefEntity) -> Self {
        Self {
            uid: value.uid,
            display_name: value.display_name,
        }
    }
}

impl From<PlayerRef> for PlayerRefEntity {
    fn from(value: PlayerRef) -> Self {
        Self {
            uid: value.uid,
            display_name: value.display_name,
        }
    }
}

impl From<GameCardEntity> for GameCard {
    fn from(value: GameCardEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
        }
    }
}

impl From<GameCard> for GameCardEntity {
    fn from(value: GameCard) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
        }
    }
}

impl From<PlayerEntity> for Player {
    fn from(value: PlayerEntity) -> Self {
        Self {
            uid: value.uid,
            display_name: value.display_name,
            cards: value.cards.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Player> for PlayerEntity {
    fn from(value: Player) -> Self {
        Self {
            uid: value.uid,
            display_name: value.display_name,
            cards: value.cards.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<GameEntity> for Game {
    fn from(value: GameEntity) -> Self {
        Self {
            game_id: value.game_id,
            join_code: value.join_code,
            display_name: value.display_name,
            host: value.host.into(),
            created_at: value.created_at,
            card_pack: value.card_pack,
            card_amount: value.card_amount,
            status: value.status.into(),
            player_ids: value.player_ids,
            players: value.players.into_iter().map(Into::into).collect(),
            current_turn: value.current_turn.map(Into::into),
            turn_sequence: value.turn_sequence,
        }
    }
}

impl From<Game> for GameEntity {
    fn from(value: Game) -> Self {
        Self {
            game_id: value.game_id,
            join_code: value.join_code,
            display_name: value.display_name,
            host: value.host.into(),
            created_at: value.created_at,
            card_pack: value.card_pack,
            card_amount: value.card_amount,
            status: value.status.into(),
            player_ids: value.player_ids,
            players: value.players.into_iter().map(Into::into).collect(),
            current_turn: value.current_turn.map(Into::into),
            turn_sequence: value.turn_sequence,
        }
    }
}

impl From<CardPackEntity> for CardPack {
    fn from(value: CardPackEntity) -> Self {
        Self {
            pack_id: value.pack_id,
            display_name: value.display_name,
            description: value.description,
            cards: value.cards.into_iter().map(Into::into).collect(),
        }
    }
}
