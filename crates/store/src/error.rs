use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open progress database at {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("progress database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("progress database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("progress database is unavailable")]
    Unavailable,
}
