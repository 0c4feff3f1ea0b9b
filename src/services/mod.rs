//! Service layer orchestrating storage, game transitions and notifications.

/// OpenAPI documentation generation.
pub mod documentation;
/// Core game operations: join, start, play, read.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Push-notification intents and delivery.
pub mod notifications;
/// Storage connection supervision and degraded-mode handling.
pub mod storage_supervisor;
