/// Errors raised by the menu core.
///
/// Every variant maps onto one of the four [`ErrorKind`]s the presentation
/// layer distinguishes; the finer variants only exist to keep the source error.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    UpstreamStatus { status: reqwest::StatusCode },

    #[error("malformed payload: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Storage,
    InvalidInput,
    Network,
    Format,
}

impl MenuError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MenuError::Storage(_) | MenuError::Migration(_) | MenuError::Io(_) => {
                ErrorKind::Storage
            }
            MenuError::InvalidInput(_) => ErrorKind::InvalidInput,
            MenuError::Network(_) | MenuError::UpstreamStatus { .. } => ErrorKind::Network,
            MenuError::Format(_) => ErrorKind::Format,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Storage => "storage",
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::Network => "network",
            ErrorKind::Format => "format",
        };
        f.write_str(name)
    }
}
