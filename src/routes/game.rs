use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::game::{
        GameSummary, JoinGameRequest, JoinGameResponse, PlayCardRequest, PlayCardResponse,
        StartGameResponse,
    },
    error::AppError,
    routes::auth::AuthUser,
    services::game_service,
    state::SharedState,
};

/// Routes handling game lobby and turn operations.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games/{id}", get(get_game))
        .route("/games/{id}/join", post(join_game))
        .route("/games/{id}/start", post(start_game))
        .route("/games/{id}/play", post(play_card))
}

/// Join a game lobby under the given display name.
#[utoipa::path(
    post,
    path = "/games/{id}/join",
    tag = "game",
    params(("id" = String, Path, description = "Identifier of the game to join")),
    request_body = JoinGameRequest,
    responses(
        (status = 200, description = "Player joined", body = JoinGameResponse)
    )
)]
pub async fn join_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    AuthUser(uid): AuthUser,
    Valid(Json(payload)): Valid<Json<JoinGameRequest>>,
) -> Result<Json<JoinGameResponse>, AppError> {
    let response = game_service::join_game(&state, id, uid, payload).await?;
    Ok(Json(response))
}

/// Start the game, shuffling turn order and dealing cards.
#[utoipa::path(
    post,
    path = "/games/{id}/start",
    tag = "game",
    params(("id" = String, Path, description = "Identifier of the game to start")),
    responses(
        (status = 200, description = "Game started", body = StartGameResponse)
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    AuthUser(_uid): AuthUser,
) -> Result<Json<StartGameResponse>, AppError> {
    let response = game_service::start_game(&state, id).await?;
    Ok(Json(response))
}

/// Play a card from the authenticated caller's hand.
#[utoipa::path(
    post,
    path = "/games/{id}/play",
    tag = "game",
    params(("id" = String, Path, description = "Identifier of the game being played")),
    request_body = PlayCardRequest,
    responses(
        (status = 200, description = "Card played", body = PlayCardResponse)
    )
)]
pub async fn play_card(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    AuthUser(uid): AuthUser,
    Json(payload): Json<PlayCardRequest>,
) -> Result<Json<PlayCardResponse>, AppError> {
    let response = game_service::play_card(&state, id, uid, payload).await?;
    Ok(Json(response))
}

/// Read the persisted game state, with the caller's own hand attached.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "game",
    params(("id" = String, Path, description = "Identifier of the game to read")),
    responses(
        (status = 200, description = "Current game state", body = GameSummary)
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    AuthUser(uid): AuthUser,
) -> Result<Json<GameSummary>, AppError> {
    let summary = game_service::get_game(&state, id, uid).await?;
    Ok(Json(summary))
}
