use serde::{Deserialize, Serialize};

use crate::enums::FailureKind;

/// Terminal state of one backup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure(FailureKind),
}

impl Outcome {
    /// Exit code calling automation branches on: `0` on success, `1..=5` otherwise.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure(kind) => kind.exit_code(),
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<FailureKind> for Outcome {
    fn from(kind: FailureKind) -> Self {
        Self::Failure(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_zero_and_failures_are_distinct() {
        assert_eq!(Outcome::Success.exit_code(), 0);

        let codes = [
            FailureKind::InvalidSource,
            FailureKind::InvalidDestination,
            FailureKind::DestinationUnwritable,
            FailureKind::ArchiveCreationFailed,
            FailureKind::RelocationFailed,
        ]
        .map(|kind| Outcome::from(kind).exit_code());

        assert_eq!(codes, [1, 2, 3, 4, 5]);
        assert!(!Outcome::Failure(FailureKind::RelocationFailed).is_success());
    }
}
