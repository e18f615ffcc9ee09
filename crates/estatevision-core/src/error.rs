use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid NodeKind value: {0}")]
    InvalidNodeKind(String),
    #[error("Invalid EdgeKind value: {0}")]
    InvalidEdgeKind(String),
    #[error("Invalid depth {0}, expected a value between 1 and 3")]
    InvalidDepth(i64),
    #[error("Invalid spacing {0}, expected a value between 50 and 200")]
    InvalidSpacing(f32),
    #[error("Failed to parse asset record: {0}")]
    Parse(#[from] serde_json::Error),
}
