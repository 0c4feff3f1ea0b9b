//! Push-notification dispatch.
//!
//! The service layer produces a [`NotificationIntent`] (recipients plus
//! message) and hands it to [`dispatch`], which resolves device tokens and
//! delivers in a spawned task. Delivery is best effort: failures are logged
//! and never surface to the operation that triggered them.

use std::error::Error;
use std::sync::Arc;

use futures::future::BoxFuture;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    config::AppConfig,
    dao::game_store::GameStore,
    state::game::{Game, PlayerRef},
};

/// Error raised by a [`PushSender`] implementation.
#[derive(Debug, Error)]
#[error("push delivery failed: {message}")]
pub struct PushError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl PushError {
    /// Construct a delivery error wrapping a sender-specific failure.
    pub fn new(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        Self {
            message,
            source: Some(Box::new(source)),
        }
    }
}

/// Abstraction over the transport that delivers a push notification to a set
/// of device tokens.
pub trait PushSender: Send + Sync {
    /// Deliver `title`/`body` to every device in `tokens`.
    fn send(
        &self,
        tokens: Vec<String>,
        title: String,
        body: String,
    ) -> BoxFuture<'static, Result<(), PushError>>;
}

/// A notification to be delivered: who hears about it and what they read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationIntent {
    /// Uids of the players to notify.
    pub recipients: Vec<String>,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
}

/// Announce a join to everyone already in the game except the joiner.
pub fn player_joined(game: &Game, joining_uid: &str) -> NotificationIntent {
    let joiner = game
        .players
        .iter()
        .find(|player| player.uid == joining_uid)
        .map(|player| player.display_name.as_str())
        .unwrap_or("Someone");

    NotificationIntent {
        recipients: everyone_except(game, joining_uid),
        title: format!("Someone joined {}", game.display_name),
        body: format!("{joiner} is in the lobby."),
    }
}

/// Announce the start of the game to every player except the host.
pub fn game_started(game: &Game) -> NotificationIntent {
    NotificationIntent {
        recipients: everyone_except(game, &game.host.uid),
        title: format!("{} has started!", game.display_name),
        body: "Go get playing!".to_owned(),
    }
}

/// Announce whose turn it is to every player except the one who just went.
pub fn turn_advanced(game: &Game, acted: &PlayerRef, next: &PlayerRef) -> NotificationIntent {
    NotificationIntent {
        recipients: everyone_except(game, &acted.uid),
        title: format!("Something happened in {}", game.display_name),
        body: format!(
            "{} just went! It's {}'s turn.",
            acted.display_name, next.display_name
        ),
    }
}

fn everyone_except(game: &Game, excluded_uid: &str) -> Vec<String> {
    game.player_ids
        .iter()
        .filter(|uid| uid.as_str() != excluded_uid)
        .cloned()
        .collect()
}

/// Resolve device tokens for the intent's recipients and deliver, without
/// blocking the caller. Failures are logged and swallowed.
pub fn dispatch(store: Arc<dyn GameStore>, sender: Arc<dyn PushSender>, intent: NotificationIntent) {
    if intent.recipients.is_empty() {
        return;
    }

    tokio::spawn(async move {
        let users = match store.find_users(intent.recipients).await {
            Ok(users) => users,
            Err(err) => {
                warn!(error = %err, "failed to resolve push tokens; dropping notification");
                return;
            }
        };

        let tokens: Vec<String> = users.into_iter().map(|user| user.fcm_token).collect();
        if tokens.is_empty() {
            debug!(title = %intent.title, "no registered devices for notification");
            return;
        }

        if let Err(err) = sender.send(tokens, intent.title, intent.body).await {
            warn!(error = %err, "push notification delivery failed");
        }
    });
}

/// Pick the sender matching the configuration: the HTTP gateway when one is
/// configured and compiled in, a log-only sender otherwise.
pub fn sender_from_config(config: &AppConfig) -> Arc<dyn PushSender> {
    #[cfg(feature = "push-notify")]
    if let Some(url) = &config.push_gateway_url {
        info!(gateway = %url, "delivering push notifications through the gateway");
        return Arc::new(http::HttpPushSender::new(url.clone()));
    }

    #[cfg(not(feature = "push-notify"))]
    if config.push_gateway_url.is_some() {
        warn!("push gateway configured but the `push-notify` feature is off; logging instead");
    }

    Arc::new(LogPushSender)
}

/// Fallback sender that only logs what would have been delivered.
pub struct LogPushSender;

impl PushSender for LogPushSender {
    fn send(
        &self,
        tokens: Vec<String>,
        title: String,
        body: String,
    ) -> BoxFuture<'static, Result<(), PushError>> {
        Box::pin(async move {
            info!(
                devices = tokens.len(),
                %title,
                %body,
                "push notification (log-only sender)"
            );
            Ok(())
        })
    }
}

#[cfg(feature = "push-notify")]
mod http {
    use futures::future::BoxFuture;
    use serde::Serialize;

    use super::{PushError, PushSender};

    #[derive(Serialize)]
    struct MulticastMessage {
        tokens: Vec<String>,
        notification: MessageContent,
    }

    #[derive(Serialize)]
    struct MessageContent {
        title: String,
        body: String,
    }

    /// Sender posting multicast messages to an HTTP push gateway.
    pub struct HttpPushSender {
        client: reqwest::Client,
        url: String,
    }

    impl HttpPushSender {
        /// Build a sender targeting the gateway at `url`.
        pub fn new(url: String) -> Self {
            Self {
                client: reqwest::Client::new(),
                url,
            }
        }
    }

    impl PushSender for HttpPushSender {
        fn send(
            &self,
            tokens: Vec<String>,
            title: String,
            body: String,
        ) -> BoxFuture<'static, Result<(), PushError>> {
            let client = self.client.clone();
            let url = self.url.clone();

            Box::pin(async move {
                let message = MulticastMessage {
                    tokens,
                    notification: MessageContent { title, body },
                };

                let response = client
                    .post(&url)
                    .json(&message)
                    .send()
                    .await
                    .map_err(|source| {
                        PushError::new(format!("request to gateway `{url}` failed"), source)
                    })?;

                response.error_for_status().map_err(|source| {
                    PushError::new(format!("gateway `{url}` rejected the message"), source)
                })?;

                Ok(())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::state::game::{GameStatus, Player};

    fn game_with_players(uids: &[&str]) -> Game {
        let players: Vec<Player> = uids
            .iter()
            .map(|uid| Player {
                uid: (*uid).to_owned(),
                display_name: uid.to_uppercase(),
                cards: Vec::new(),
            })
            .collect();

        Game {
            game_id: "g1".to_owned(),
            join_code: "XKCD42".to_owned(),
            display_name: "Friday night".to_owned(),
            host: PlayerRef::of(&players[0]),
            created_at: SystemTime::UNIX_EPOCH,
            card_pack: "starter".to_owned(),
            card_amount: 2,
            status: GameStatus::PreLobby,
            player_ids: uids.iter().map(|uid| (*uid).to_owned()).collect(),
            players,
            current_turn: None,
            turn_sequence: 0,
        }
    }

    #[test]
    fn join_announcement_skips_the_joiner() {
        let game = game_with_players(&["host", "ada", "bob"]);

        let intent = player_joined(&game, "bob");

        assert_eq!(intent.recipients, vec!["host", "ada"]);
        assert!(intent.body.contains("BOB"));
    }

    #[test]
    fn start_announcement_skips_the_host() {
        let game = game_with_players(&["host", "ada", "bob"]);

        let intent = game_started(&game);

        assert_eq!(intent.recipients, vec!["ada", "bob"]);
        assert_eq!(intent.title, "Friday night has started!");
    }

    #[test]
    fn turn_announcement_skips_the_actor_and_names_the_next_player() {
        let game = game_with_players(&["host", "ada", "bob"]);
        let acted = PlayerRef {
            uid: "ada".to_owned(),
            display_name: "ADA".to_owned(),
        };
        let next = PlayerRef {
            uid: "bob".to_owned(),
            display_name: "BOB".to_owned(),
        };

        let intent = turn_advanced(&game, &acted, &next);

        assert_eq!(intent.recipients, vec!["host", "bob"]);
        assert_eq!(intent.body, "ADA just went! It's BOB's turn.");
    }
}
