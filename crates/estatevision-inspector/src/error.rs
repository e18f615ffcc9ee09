use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectorError {
    #[error("Inspector is not mounted")]
    NotMounted,
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
