//! Transition rules for a game: admitting players, starting, playing cards.
//!
//! Every operation validates against the current [`GameStatus`] before any
//! field is touched, so a caller that hits an error can discard its copy and
//! nothing half-mutated ever reaches storage. Persisting the returned state
//! is the caller's job and happens exactly once per operation.

use rand::Rng;
use thiserror::Error;

use crate::state::game::{CardPack, Game, GameStatus, Player, PlayerRef};
use crate::state::shuffle::shuffle;

/// Error raised when a transition cannot be applied to the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The joining user is already part of the roster.
    #[error("user `{uid}` is already a player in this game")]
    AlreadyJoined {
        /// Identifier of the duplicate user.
        uid: String,
    },
    /// The operation is not valid for the game's current status.
    #[error("cannot {action} while the game is {status:?}")]
    WrongStatus {
        /// Operation that was attempted.
        action: &'static str,
        /// Status the game was in.
        status: GameStatus,
    },
    /// A uid the operation relies on is not present in the roster. Indicates
    /// inconsistent state rather than bad input.
    #[error("cannot find player `{uid}` in game")]
    PlayerMissing {
        /// Identifier that failed to resolve.
        uid: String,
    },
    /// The played card is not in the acting player's hand.
    #[error("cannot find card `{card_id}` belonging to player `{uid}`")]
    CardMissing {
        /// Identifier of the card that was played.
        card_id: u32,
        /// Acting player.
        uid: String,
    },
    /// The caller acted on a turn sequence that is no longer current.
    #[error("turn sequence {expected} is stale, game is at {actual}")]
    StaleTurn {
        /// Sequence the caller read before acting.
        expected: u64,
        /// Sequence the game currently holds.
        actual: u64,
    },
    /// The game has no players to start with.
    #[error("game has no players")]
    EmptyRoster,
}

/// Result of a successful play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The turn passed to the next player in order.
    TurnAdvanced {
        /// Player who just played.
        acted: PlayerRef,
        /// Player whose turn it is now.
        next: PlayerRef,
    },
    /// The next player's hand was already empty, so the game ended. The turn
    /// holder is left untouched and no turn notification should go out.
    GameOver {
        /// Player who played the final card.
        acted: PlayerRef,
    },
}

impl Game {
    /// Add a player to the lobby.
    ///
    /// Only valid before the game starts; the new player joins with an empty
    /// hand at the end of the roster, keeping `players` and `player_ids` in
    /// lockstep.
    pub fn admit_player(&mut self, uid: &str, display_name: &str) -> Result<(), GameError> {
        if self.status != GameStatus::PreLobby {
            return Err(GameError::WrongStatus {
                action: "join",
                status: self.status,
            });
        }

        if self.player_ids.iter().any(|existing| existing == uid) {
            return Err(GameError::AlreadyJoined {
                uid: uid.to_owned(),
            });
        }

        self.players.push(Player {
            uid: uid.to_owned(),
            display_name: display_name.to_owned(),
            cards: Vec::new(),
        });
        self.player_ids.push(uid.to_owned());
        self.turn_sequence += 1;

        Ok(())
    }

    /// Start the game: randomize turn order, deal hands, hand the first turn
    /// to the player now at the front.
    ///
    /// Each player's hand is drawn from an independently shuffled copy of the
    /// pack, so hands may overlap. When the pack holds fewer cards than
    /// `card_amount` the deal clamps to the pack size.
    pub fn begin(&mut self, pack: &CardPack, rng: &mut impl Rng) -> Result<(), GameError> {
        if self.status != GameStatus::PreLobby {
            return Err(GameError::WrongStatus {
                action: "start",
                status: self.status,
            });
        }

        if self.players.is_empty() {
            return Err(GameError::EmptyRoster);
        }

        shuffle(&mut self.players, rng);

        let hand_size = self.card_amount.min(pack.cards.len());
        for player in &mut self.players {
            let mut deck = pack.cards.clone();
            shuffle(&mut deck, rng);
            deck.truncate(hand_size);
            player.cards = deck;
        }

        self.current_turn = Some(PlayerRef::of(&self.players[0]));
        self.status = GameStatus::InProgress;
        self.turn_sequence += 1;

        Ok(())
    }

    /// Play one card from the acting player's hand against a target.
    ///
    /// Removes exactly one copy of the card, then computes the successor in
    /// turn order, wrapping from the last seat to the first. If the successor
    /// holds no cards the game is over; otherwise the turn advances to them.
    ///
    /// `expected_sequence` is the optimistic concurrency token: when the
    /// caller passes the sequence they read, a mismatch is rejected before
    /// anything is touched. Omitting it keeps last-writer-wins semantics.
    pub fn play_card(
        &mut self,
        acting_uid: &str,
        card_id: u32,
        target_uid: &str,
        expected_sequence: Option<u64>,
    ) -> Result<PlayOutcome, GameError> {
        if let Some(expected) = expected_sequence
            && expected != self.turn_sequence
        {
            return Err(GameError::StaleTurn {
                expected,
                actual: self.turn_sequence,
            });
        }

        if self.status != GameStatus::InProgress {
            return Err(GameError::WrongStatus {
                action: "play",
                status: self.status,
            });
        }

        let acting_index = self
            .players
            .iter()
            .position(|player| player.uid == acting_uid)
            .ok_or_else(|| GameError::PlayerMissing {
                uid: acting_uid.to_owned(),
            })?;

        // The target is only recorded for notification context, but a uid
        // outside the roster still signals inconsistent state.
        if !self.players.iter().any(|player| player.uid == target_uid) {
            return Err(GameError::PlayerMissing {
                uid: target_uid.to_owned(),
            });
        }

        let card_index = self.players[acting_index]
            .cards
            .iter()
            .position(|card| card.id == card_id)
            .ok_or_else(|| GameError::CardMissing {
                card_id,
                uid: acting_uid.to_owned(),
            })?;

        // All checks passed; from here on the mutation completes as a whole.
        self.players[acting_index].cards.remove(card_index);
        self.turn_sequence += 1;

        let acted = PlayerRef::of(&self.players[acting_index]);
        let next_index = (acting_index + 1) % self.players.len();
        let next = &self.players[next_index];

        if next.cards.is_empty() {
            self.status = GameStatus::Over;
            return Ok(PlayOutcome::GameOver { acted });
        }

        let next = PlayerRef::of(next);
        self.current_turn = Some(next.clone());
        Ok(PlayOutcome::TurnAdvanced { acted, next })
    }
}
