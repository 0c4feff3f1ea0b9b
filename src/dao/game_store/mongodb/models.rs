use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};

use crate::dao::models::{
    CardPackEntity, GameCardEntity, GameEntity, GameStatusEntity, PlayerEntity, PlayerRefEntity,
};

/// Game document as stored in the `games` collection. Identical to
/// [`GameEntity`] except that the id becomes the document `_id` and the
/// timestamp uses the BSON datetime type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    game_id: String,
    join_code: String,
    display_name: String,
    host: PlayerRefEntity,
    created_at: DateTime,
    card_pack: String,
    card_amount: usize,
    status: GameStatusEntity,
    player_ids: Vec<String>,
    players: Vec<PlayerEntity>,
    current_turn: Option<PlayerRefEntity>,
    #[serde(default)]
    turn_sequence: u64,
}

impl From<GameEntity> for MongoGameDocument {
    fn from(value: GameEntity) -> Self {
        Self {
            game_id: value.game_id,
            join_code: value.join_code,
            display_name: value.display_name,
            host: value.host,
            created_at: DateTime::from_system_time(value.created_at),
            card_pack: value.card_pack,
            card_amount: value.card_amount,
            status: value.status,
            player_ids: value.player_ids,
            players: value.players,
            current_turn: value.current_turn,
            turn_sequence: value.turn_sequence,
        }
    }
}

impl From<MongoGameDocument> for GameEntity {
    fn from(value: MongoGameDocument) -> Self {
        Self {
            game_id: value.game_id,
            join_code: value.join_code,
            display_name: value.display_name,
            host: value.host,
            created_at: value.created_at.to_system_time(),
            card_pack: value.card_pack,
            card_amount: value.card_amount,
            status: value.status,
            player_ids: value.player_ids,
            players: value.players,
            current_turn: value.current_turn,
            turn_sequence: value.turn_sequence,
        }
    }
}

/// Card pack document stored in the `card_packs` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoCardPackDocument {
    #[serde(rename = "_id")]
    pack_id: String,
    display_name: String,
    description: String,
    cards: Vec<GameCardEntity>,
}

impl From<MongoCardPackDocument> for CardPackEntity {
    fn from(value: MongoCardPackDocument) -> Self {
        Self {
            pack_id: value.pack_id,
            display_name: value.display_name,
            description: value.description,
            cards: value.cards,
        }
    }
}

/// User document stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUserDocument {
    #[serde(rename = "_id")]
    uid: String,
    phone_number: String,
    fcm_token: String,
}

impl From<MongoUserDocument> for crate::dao::models::UserEntity {
    fn from(value: MongoUserDocument) -> Self {
        Self {
            uid: value.uid,
            phone_number: value.phone_number,
            fcm_token: value.fcm_token,
        }
    }
}

/// Selector matching a document by its string `_id`.
pub fn doc_id(id: &str) -> Document {
    doc! {"_id": id}
}
