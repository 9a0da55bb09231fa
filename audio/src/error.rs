use thiserror::Error;

/// Errors returned while decoding audio.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("wav: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported sample format: {bits}-bit {format}")]
    UnsupportedFormat { bits: u16, format: &'static str },

    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),
}
