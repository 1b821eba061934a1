use thiserror::Error;

use crate::NodeId;

/// Setup-time failures of a list controller. Everything recoverable during a
/// frame (unseen identities, malformed edits) is absorbed where it happens and
/// never shows up here.
#[derive(Debug, Error, PartialEq)]
pub enum ListError {
    #[error("no template registered for kind `{0}`")]
    UnknownTemplate(String),
    #[error("template kind `{0}` registered twice")]
    DuplicateTemplate(String),
    #[error("identity {0} appears more than once in the data set")]
    DuplicateNode(NodeId),
    #[error("node {0} is not part of the current data set")]
    NodeNotFound(NodeId),
    #[error("array length {len} exceeds the limit of {max}")]
    ArrayTooLarge { len: usize, max: usize },
    #[error("invalid list bounds: {0}")]
    InvalidBounds(String),
}

pub type ListResult<T> = Result<T, ListError>;
