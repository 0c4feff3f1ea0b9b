pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;

use crate::dao::models::{CardPackEntity, GameEntity, UserEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the document store holding games, card packs and users.
///
/// Writes replace the whole game document (last writer wins); operations are
/// expected to compute the complete next state before calling [`save_game`]
/// exactly once.
///
/// [`save_game`]: GameStore::save_game
pub trait GameStore: Send + Sync {
    /// Upsert a game document, replacing any previous state.
    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a game document by id.
    fn find_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Fetch a card pack by id. Packs are read-only for this service.
    fn find_card_pack(
        &self,
        id: String,
    ) -> BoxFuture<'static, StorageResult<Option<CardPackEntity>>>;
    /// Resolve the user records for the given uids; unknown uids are skipped.
    fn find_users(&self, uids: Vec<String>)
    -> BoxFuture<'static, StorageResult<Vec<UserEntity>>>;
    /// Cheap liveness probe against the backend.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the backend connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
