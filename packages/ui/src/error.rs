use api::{ApiError, Resolution};

use crate::collection::Action;

/// Failure of a dashboard action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("{0} is already in progress")]
    Busy(Action),
    #[error("Note {0} is no longer in the list")]
    UnknownNote(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ActionError {
    pub fn resolution(&self) -> Resolution {
        match self {
            ActionError::Busy(_) => Resolution::Inline,
            ActionError::UnknownNote(_) => Resolution::InlineAndRefresh,
            ActionError::Api(e) => e.resolution(),
        }
    }

    pub fn api(&self) -> Option<&ApiError> {
        match self {
            ActionError::Api(e) => Some(e),
            _ => None,
        }
    }
}
