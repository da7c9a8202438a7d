use serde::{Deserialize, Serialize};

/// The two raw path strings a backup attempt starts from.
///
/// Values are kept exactly as the caller supplied them (they may be empty or
/// carry a leading `~`); interpretation happens during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRequest {
    pub source_path: String,
    pub destination_path: String,
}

impl BackupRequest {
    #[must_use]
    pub fn new(source_path: impl Into<String>, destination_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            destination_path: destination_path.into(),
        }
    }
}
