/// Core error type for the bot.
///
/// Adapter crates map their specific failures into this type. Anything a
/// user can trigger from chat is answered through the responder port
/// instead and never surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("brain error: {0}")]
    Brain(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
