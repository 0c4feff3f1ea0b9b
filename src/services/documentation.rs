use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the WhatCard backend.
#[openapi(
    paths(
        crate::routes::game::join_game,
        crate::routes::game::start_game,
        crate::routes::game::play_card,
        crate::routes::game::get_game,
        crate::routes::health::healthcheck,
    ),
    components(
        schemas(
            crate::dto::game::JoinGameRequest,
            crate::dto::game::JoinGameResponse,
            crate::dto::game::StartGameResponse,
            crate::dto::game::PlayCardRequest,
            crate::dto::game::PlayCardResponse,
            crate::dto::game::GameSummary,
            crate::dto::game::PlayerSummary,
            crate::dto::game::PlayerRefDto,
            crate::dto::game::CardDto,
            crate::dto::game::GameStatusDto,
            crate::dto::health::HealthResponse,
        )
    ),
    tags(
        (name = "game", description = "Game lobby and turn operations"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
