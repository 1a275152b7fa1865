// Error types for cubik storage

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("Could not find application data directory for the session store"))]
    NoDataDir,
    #[snafu(display("Error creating the session store directory"))]
    StoreDir { source: io::Error },
    #[snafu(display("Session store query failed"))]
    Sqlite { source: rusqlite::Error },
    #[snafu(display("Error serializing records for session {session}"))]
    Serialize {
        session: String,
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
