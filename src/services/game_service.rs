//! Orchestration of the game operations: fetch, mutate, persist once, notify.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    dao::game_store::GameStore,
    dto::game::{
        GameSummary, JoinGameRequest, JoinGameResponse, PlayCardRequest, PlayCardResponse,
        StartGameResponse,
    },
    error::ServiceError,
    services::notifications,
    state::{
        SharedState,
        game::{CardPack, Game},
        machine::PlayOutcome,
    },
};

/// Add the authenticated caller to a lobby under the requested display name.
pub async fn join_game(
    state: &SharedState,
    game_id: String,
    joining_uid: String,
    request: JoinGameRequest,
) -> Result<JoinGameResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let mut game = fetch_game(&store, &game_id).await?;

    game.admit_player(&joining_uid, request.display_name.trim())?;
    store.save_game(game.clone().into()).await?;
    info!(game_id = %game.game_id, uid = %joining_uid, "player joined game");

    if state.config().notify_on_join {
        notifications::dispatch(
            store,
            state.push_sender(),
            notifications::player_joined(&game, &joining_uid),
        );
    }

    Ok(JoinGameResponse { success: true })
}

/// Start the game: randomize turn order, deal every player a hand from the
/// configured pack, and announce the start.
pub async fn start_game(
    state: &SharedState,
    game_id: String,
) -> Result<StartGameResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let mut game = fetch_game(&store, &game_id).await?;

    let pack: CardPack = store
        .find_card_pack(game.card_pack.clone())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("card pack `{}` not found", game.card_pack)))?
        .into();

    if game.card_amount > pack.cards.len() {
        warn!(
            game_id = %game.game_id,
            pack = %pack.pack_id,
            requested = game.card_amount,
            available = pack.cards.len(),
            "card amount exceeds pack size; clamping the deal"
        );
    }

    // ThreadRng is not Send, so keep it scoped away from the awaits below.
    {
        let mut rng = rand::rng();
        game.begin(&pack, &mut rng)?;
    }
    store.save_game(game.clone().into()).await?;
    info!(game_id = %game.game_id, players = game.players.len(), "game started");

    notifications::dispatch(store, state.push_sender(), notifications::game_started(&game));

    Ok(StartGameResponse { success: true })
}

/// Play one card for the authenticated caller.
///
/// The acting uid comes from the caller's verified identity, never from the
/// request body. Card and target are checked for presence explicitly so that
/// card id `0` is playable.
pub async fn play_card(
    state: &SharedState,
    game_id: String,
    acting_uid: String,
    request: PlayCardRequest,
) -> Result<PlayCardResponse, ServiceError> {
    let card_id = request
        .card_id
        .ok_or_else(|| ServiceError::InvalidArgument("card_id is required".into()))?;
    let target_uid = request
        .target_uid
        .ok_or_else(|| ServiceError::InvalidArgument("target_uid is required".into()))?;

    let store = state.require_game_store().await?;
    let mut game = fetch_game(&store, &game_id).await?;

    let outcome = game.play_card(&acting_uid, card_id, &target_uid, request.turn_sequence)?;
    store.save_game(game.clone().into()).await?;

    match outcome {
        PlayOutcome::GameOver { acted } => {
            info!(game_id = %game.game_id, uid = %acted.uid, "final card played; game over");
            Ok(PlayCardResponse {
                success: true,
                game_over: true,
                message: "Game Over".to_owned(),
            })
        }
        PlayOutcome::TurnAdvanced { acted, next } => {
            info!(
                game_id = %game.game_id,
                uid = %acted.uid,
                next = %next.uid,
                "card played; turn advanced"
            );
            let message = format!("New turn: {}", next.display_name);
            notifications::dispatch(
                store,
                state.push_sender(),
                notifications::turn_advanced(&game, &acted, &next),
            );
            Ok(PlayCardResponse {
                success: true,
                game_over: false,
                message,
            })
        }
    }
}

/// Read the persisted game, attaching the caller's own hand. Other players'
/// hands are reduced to their card counts.
pub async fn get_game(
    state: &SharedState,
    game_id: String,
    caller_uid: String,
) -> Result<GameSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let game = fetch_game(&store, &game_id).await?;
    Ok(GameSummary::for_caller(game, &caller_uid))
}

async fn fetch_game(
    store: &Arc<dyn GameStore>,
    game_id: &str,
) -> Result<Game, ServiceError> {
    if game_id.trim().is_empty() {
        return Err(ServiceError::InvalidArgument(
            "game id must not be empty".into(),
        ));
    }

    let entity = store
        .find_game(game_id.to_owned())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game `{game_id}` not found")))?;

    Ok(entity.into())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::SystemTime;

    use futures::future::BoxFuture;

    use super::*;
    use crate::config::AppConfig;
    use crate::dao::game_store::memory::MemoryGameStore;
    use crate::dao::models::{
        CardPackEntity, GameCardEntity, GameEntity, GameStatusEntity, PlayerEntity,
        PlayerRefEntity, UserEntity,
    };
    use crate::services::notifications::{PushError, PushSender};
    use crate::state::AppState;
    use crate::state::game::GameStatus;

    #[derive(Default)]
    struct RecordingPushSender {
        sent: Mutex<Vec<(Vec<String>, String, String)>>,
    }

    impl PushSender for Arc<RecordingPushSender> {
        fn send(
            &self,
            tokens: Vec<String>,
            title: String,
            body: String,
        ) -> BoxFuture<'static, Result<(), PushError>> {
            let recorder = self.clone();
            Box::pin(async move {
                recorder.sent.lock().unwrap().push((tokens, title, body));
                Ok(())
            })
        }
    }

    struct Fixture {
        state: SharedState,
        store: MemoryGameStore,
        sender: Arc<RecordingPushSender>,
    }

    async fn fixture() -> Fixture {
        let store = MemoryGameStore::new();
        let sender = Arc::new(RecordingPushSender::default());
        let state = AppState::new(AppConfig::default(), Arc::new(sender.clone()));
        state.install_game_store(Arc::new(store.clone())).await;
        Fixture {
            state,
            store,
            sender,
        }
    }

    fn card_entity(id: u32) -> GameCardEntity {
        GameCardEntity {
            id,
            title: format!("Card {id}"),
            description: format!("Prompt for card {id}"),
        }
    }

    fn lobby_entity(uids: &[&str]) -> GameEntity {
        GameEntity {
            game_id: "g1".to_owned(),
            join_code: "XKCD42".to_owned(),
            display_name: "Friday night".to_owned(),
            host: PlayerRefEntity {
                uid: uids[0].to_owned(),
                display_name: uids[0].to_uppercase(),
            },
            created_at: SystemTime::UNIX_EPOCH,
            card_pack: "starter".to_owned(),
            card_amount: 2,
            status: GameStatusEntity::PreLobby,
            player_ids: uids.iter().map(|uid| (*uid).to_owned()).collect(),
            players: uids
                .iter()
                .map(|uid| PlayerEntity {
                    uid: (*uid).to_owned(),
                    display_name: uid.to_uppercase(),
                    cards: Vec::new(),
                })
                .collect(),
            current_turn: None,
            turn_sequence: 0,
        }
    }

    fn running_entity(hands: &[(&str, &[u32])]) -> GameEntity {
        let mut entity = lobby_entity(&hands.iter().map(|(uid, _)| *uid).collect::<Vec<_>>());
        for (player, (_, cards)) in entity.players.iter_mut().zip(hands) {
            player.cards = cards.iter().map(|id| card_entity(*id)).collect();
        }
        entity.current_turn = Some(entity.host.clone());
        entity.status = GameStatusEntity::InProgress;
        entity.turn_sequence = 2;
        entity
    }

    fn seed_users(store: &MemoryGameStore, uids: &[&str]) {
        for uid in uids {
            store.seed_user(UserEntity {
                uid: (*uid).to_owned(),
                phone_number: "+15550001111".to_owned(),
                fcm_token: format!("token-{uid}"),
            });
        }
    }

    /// Let spawned notification tasks run to completion on the test runtime.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    async fn persisted(store: &MemoryGameStore, id: &str) -> Game {
        store
            .find_game(id.to_owned())
            .await
            .unwrap()
            .expect("game should be persisted")
            .into()
    }

    #[tokio::test]
    async fn join_appends_player_and_notifies_the_rest() {
        let fx = fixture().await;
        fx.store.seed_game(lobby_entity(&["host", "ada"]));
        seed_users(&fx.store, &["host", "ada", "bob"]);

        let response = join_game(
            &fx.state,
            "g1".to_owned(),
            "bob".to_owned(),
            JoinGameRequest {
                display_name: "Bob".to_owned(),
            },
        )
        .await
        .unwrap();
        settle().await;

        assert!(response.success);
        let game = persisted(&fx.store, "g1").await;
        assert_eq!(game.player_ids, vec!["host", "ada", "bob"]);
        assert_eq!(game.players.len(), 3);

        let sent = fx.sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (tokens, _, body) = &sent[0];
        assert_eq!(tokens, &vec!["token-host", "token-ada"]);
        assert!(body.contains("Bob"));
    }

    #[tokio::test]
    async fn join_twice_fails_with_precondition_and_keeps_roster() {
        let fx = fixture().await;
        fx.store.seed_game(lobby_entity(&["host", "ada"]));

        let err = join_game(
            &fx.state,
            "g1".to_owned(),
            "ada".to_owned(),
            JoinGameRequest {
                display_name: "Ada".to_owned(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::FailedPrecondition(_)));
        let game = persisted(&fx.store, "g1").await;
        assert_eq!(game.player_ids.len(), 2);
    }

    #[tokio::test]
    async fn join_announcement_can_be_suppressed() {
        let store = MemoryGameStore::new();
        let sender = Arc::new(RecordingPushSender::default());
        let config = AppConfig {
            notify_on_join: false,
            ..AppConfig::default()
        };
        let state = AppState::new(config, Arc::new(sender.clone()));
        state.install_game_store(Arc::new(store.clone())).await;
        store.seed_game(lobby_entity(&["host"]));
        seed_users(&store, &["host", "ada"]);

        join_game(
            &state,
            "g1".to_owned(),
            "ada".to_owned(),
            JoinGameRequest {
                display_name: "Ada".to_owned(),
            },
        )
        .await
        .unwrap();
        settle().await;

        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn join_missing_game_is_not_found() {
        let fx = fixture().await;

        let err = join_game(
            &fx.state,
            "nope".to_owned(),
            "ada".to_owned(),
            JoinGameRequest {
                display_name: "Ada".to_owned(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn start_deals_hands_and_notifies_everyone_but_the_host() {
        let fx = fixture().await;
        fx.store.seed_game(lobby_entity(&["host", "ada", "bob"]));
        fx.store.seed_card_pack(CardPackEntity {
            pack_id: "starter".to_owned(),
            display_name: "Starter pack".to_owned(),
            description: "The default pack".to_owned(),
            cards: (0..10).map(card_entity).collect(),
        });
        seed_users(&fx.store, &["host", "ada", "bob"]);

        let response = start_game(&fx.state, "g1".to_owned()).await.unwrap();
        settle().await;

        assert!(response.success);
        let game = persisted(&fx.store, "g1").await;
        assert_eq!(game.status, GameStatus::InProgress);
        for player in &game.players {
            assert_eq!(player.cards.len(), 2);
        }
        let turn = game.current_turn.as_ref().unwrap();
        assert_eq!(turn.uid, game.players[0].uid);

        let sent = fx.sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (tokens, title, _) = &sent[0];
        assert_eq!(tokens, &vec!["token-ada", "token-bob"]);
        assert_eq!(title, "Friday night has started!");
    }

    #[tokio::test]
    async fn start_without_pack_is_not_found_and_leaves_lobby_untouched() {
        let fx = fixture().await;
        fx.store.seed_game(lobby_entity(&["host", "ada"]));

        let err = start_game(&fx.state, "g1".to_owned()).await.unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
        let game = persisted(&fx.store, "g1").await;
        assert_eq!(game.status, GameStatus::PreLobby);
    }

    #[tokio::test]
    async fn play_advances_turn_and_notifies_everyone_but_the_actor() {
        let fx = fixture().await;
        fx.store
            .seed_game(running_entity(&[("a", &[0, 1]), ("b", &[2, 3]), ("c", &[4, 5])]));
        seed_users(&fx.store, &["a", "b", "c"]);

        let response = play_card(
            &fx.state,
            "g1".to_owned(),
            "a".to_owned(),
            PlayCardRequest {
                card_id: Some(0),
                target_uid: Some("c".to_owned()),
                turn_sequence: None,
            },
        )
        .await
        .unwrap();
        settle().await;

        assert!(response.success);
        assert!(!response.game_over);
        let game = persisted(&fx.store, "g1").await;
        assert_eq!(game.players[0].cards.len(), 1);
        assert_eq!(game.current_turn.as_ref().unwrap().uid, "b");

        let sent = fx.sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (tokens, _, body) = &sent[0];
        assert_eq!(tokens, &vec!["token-b", "token-c"]);
        assert_eq!(body, "A just went! It's B's turn.");
    }

    #[tokio::test]
    async fn play_final_card_ends_game_without_turn_notification() {
        let fx = fixture().await;
        let mut entity = running_entity(&[("a", &[0]), ("b", &[1])]);
        entity.players[1].cards.clear();
        fx.store.seed_game(entity);
        seed_users(&fx.store, &["a", "b"]);

        let response = play_card(
            &fx.state,
            "g1".to_owned(),
            "a".to_owned(),
            PlayCardRequest {
                card_id: Some(0),
                target_uid: Some("b".to_owned()),
                turn_sequence: None,
            },
        )
        .await
        .unwrap();
        settle().await;

        assert!(response.success);
        assert!(response.game_over);
        let game = persisted(&fx.store, "g1").await;
        assert_eq!(game.status, GameStatus::Over);
        assert!(fx.sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn play_unknown_card_is_internal_and_nothing_is_persisted() {
        let fx = fixture().await;
        fx.store.seed_game(running_entity(&[("a", &[0, 1]), ("b", &[2, 3])]));
        let before = persisted(&fx.store, "g1").await;

        let err = play_card(
            &fx.state,
            "g1".to_owned(),
            "a".to_owned(),
            PlayCardRequest {
                card_id: Some(99),
                target_uid: Some("b".to_owned()),
                turn_sequence: None,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::Internal(_)));
        assert_eq!(persisted(&fx.store, "g1").await, before);
    }

    #[tokio::test]
    async fn play_without_card_id_is_invalid_argument() {
        let fx = fixture().await;
        fx.store.seed_game(running_entity(&[("a", &[0]), ("b", &[1])]));

        let err = play_card(
            &fx.state,
            "g1".to_owned(),
            "a".to_owned(),
            PlayCardRequest {
                card_id: None,
                target_uid: Some("b".to_owned()),
                turn_sequence: None,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn play_with_stale_sequence_is_conflict() {
        let fx = fixture().await;
        fx.store.seed_game(running_entity(&[("a", &[0, 1]), ("b", &[2, 3])]));

        let err = play_card(
            &fx.state,
            "g1".to_owned(),
            "a".to_owned(),
            PlayCardRequest {
                card_id: Some(0),
                target_uid: Some("b".to_owned()),
                turn_sequence: Some(1),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn operations_fail_while_degraded() {
        let sender = Arc::new(RecordingPushSender::default());
        let state = AppState::new(AppConfig::default(), Arc::new(sender));

        let err = start_game(&state, "g1".to_owned()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));
    }

    #[tokio::test]
    async fn get_game_attaches_only_the_callers_hand() {
        let fx = fixture().await;
        fx.store.seed_game(running_entity(&[("a", &[0, 1]), ("b", &[2, 3])]));

        let summary = get_game(&fx.state, "g1".to_owned(), "b".to_owned())
            .await
            .unwrap();

        assert_eq!(summary.game_id, "g1");
        let hand_ids: Vec<u32> = summary.your_hand.iter().map(|card| card.id).collect();
        assert_eq!(hand_ids, vec![2, 3]);
        assert_eq!(summary.players.len(), 2);
        for player in &summary.players {
            assert_eq!(player.card_count, 2);
        }
    }
}
