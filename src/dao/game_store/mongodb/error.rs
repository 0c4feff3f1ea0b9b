use mongodb::error::Error as MongoError;
use thiserror::Error;

/// Result alias for the MongoDB backend.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures specific to the MongoDB backend.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// The connection URI could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// The offending URI.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The client could not be built from the parsed options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The initial ping never succeeded.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// Driver error from the last attempt.
        #[source]
        source: MongoError,
    },
    /// A periodic health-check ping failed.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Index bootstrap failed.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Collection carrying the index.
        collection: &'static str,
        /// Index key description.
        index: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A game document could not be written.
    #[error("failed to save game `{id}`")]
    SaveGame {
        /// Game identifier.
        id: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A game document could not be read.
    #[error("failed to load game `{id}`")]
    LoadGame {
        /// Game identifier.
        id: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A card pack document could not be read.
    #[error("failed to load card pack `{id}`")]
    LoadCardPack {
        /// Pack identifier.
        id: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The user lookup for push tokens failed.
    #[error("failed to load users for notification delivery")]
    LoadUsers {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A required environment variable was not set.
    #[error("missing environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the variable.
        var: &'static str,
    },
}
