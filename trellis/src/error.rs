//! Panel tree and description error types.

use thiserror::Error;

use crate::panel::PanelId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("unknown panel: {0}")]
    UnknownPanel(PanelId),

    #[error("panel {child} is already a child of {parent}")]
    AlreadyAttached { child: PanelId, parent: PanelId },

    #[error("adding {child} to {parent} would create a cycle")]
    Cycle { child: PanelId, parent: PanelId },

    #[error("panel {child} is not a child of {parent}")]
    NotAChild { child: PanelId, parent: PanelId },
}

#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate panel name: {0}")]
    DuplicateName(String),

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
}
