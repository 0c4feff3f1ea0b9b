use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;

use crate::dao::game_store::GameStore;
use crate::dao::models::{CardPackEntity, GameEntity, UserEntity};
use crate::dao::storage::StorageResult;

/// Volatile [`GameStore`] keeping every document in process memory.
///
/// Used by the test suite and as the fallback backend when no database is
/// configured. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    inner: Arc<MemoryCollections>,
}

#[derive(Default)]
struct MemoryCollections {
    games: DashMap<String, GameEntity>,
    card_packs: DashMap<String, CardPackEntity>,
    users: DashMap<String, UserEntity>,
}

impl MemoryGameStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a game document directly, bypassing the trait. Test seeding helper.
    pub fn seed_game(&self, game: GameEntity) {
        self.inner.games.insert(game.game_id.clone(), game);
    }

    /// Insert a card pack document directly. Test seeding helper.
    pub fn seed_card_pack(&self, pack: CardPackEntity) {
        self.inner.card_packs.insert(pack.pack_id.clone(), pack);
    }

    /// Insert a user record directly. Test seeding helper.
    pub fn seed_user(&self, user: UserEntity) {
        self.inner.users.insert(user.uid.clone(), user);
    }
}

impl GameStore for MemoryGameStore {
    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.games.insert(game.game_id.clone(), game);
            Ok(())
        })
    }

    fn find_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.games.get(&id).map(|entry| entry.clone())) })
    }

    fn find_card_pack(
        &self,
        id: String,
    ) -> BoxFuture<'static, StorageResult<Option<CardPackEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.card_packs.get(&id).map(|entry| entry.clone())) })
    }

    fn find_users(
        &self,
        uids: Vec<String>,
    ) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(uids
                .iter()
                .filter_map(|uid| store.inner.users.get(uid).map(|entry| entry.clone()))
                .collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::dao::models::{GameStatusEntity, PlayerEntity, PlayerRefEntity};

    fn sample_game(id: &str) -> GameEntity {
        GameEntity {
            game_id: id.to_owned(),
            join_code: "XKCD42".to_owned(),
            display_name: "Friday night".to_owned(),
            host: PlayerRefEntity {
                uid: "host-uid".to_owned(),
                display_name: "Ada".to_owned(),
            },
            created_at: SystemTime::UNIX_EPOCH,
            card_pack: "starter".to_owned(),
            card_amount: 5,
            status: GameStatusEntity::PreLobby,
            player_ids: vec!["host-uid".to_owned()],
            players: vec![PlayerEntity {
                uid: "host-uid".to_owned(),
                display_name: "Ada".to_owned(),
                cards: Vec::new(),
            }],
            current_turn: None,
            turn_sequence: 0,
        }
    }

    #[tokio::test]
    async fn save_then_find_round_trips() {
        let store = MemoryGameStore::new();
        store.save_game(sample_game("g1")).await.unwrap();

        let found = store.find_game("g1".to_owned()).await.unwrap();
        assert_eq!(found, Some(sample_game("g1")));
    }

    #[tokio::test]
    async fn find_missing_game_returns_none() {
        let store = MemoryGameStore::new();
        assert!(store.find_game("nope".to_owned()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_users_skips_unknown_uids() {
        let store = MemoryGameStore::new();
        store.seed_user(UserEntity {
            uid: "u1".to_owned(),
            phone_number: "+15550001111".to_owned(),
            fcm_token: "token-1".to_owned(),
        });

        let users = store
            .find_users(vec!["u1".to_owned(), "ghost".to_owned()])
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].fcm_token, "token-1");
    }
}
