use thiserror::Error;

#[derive(Error, Debug)]
pub enum NovellaError {
    #[error("Document has no text to segment")]
    EmptyInput,

    #[error("Invalid segmentation policy: target_size={target_size}, hard_max={hard_max} (both must be non-zero)")]
    InvalidPolicy { target_size: usize, hard_max: usize },

    #[error("Speech synthesis failed for segment {index}: {message}")]
    Synthesis { index: usize, message: String },

    #[error("Failed to join audio clips: {0}")]
    Join(String),

    #[error("No audio clips were produced")]
    NoClips,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NovellaError>;
