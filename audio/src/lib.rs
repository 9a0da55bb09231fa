//! Audio primitives for voice analysis.
//!
//! This crate provides:
//!
//! - [`Sound`]: a mono waveform decoded from a WAV file
//! - [`fft`]: in-place radix-2 FFT, power spectra and FFT autocorrelation
//! - [`window`]: analysis windows (Hanning, Gaussian)
//!
//! # Example
//!
//! ```no_run
//! use parkvoice_audio::Sound;
//!
//! let sound = Sound::from_wav_file("ahhh.wav").unwrap();
//! println!("{} Hz, {:.2}s", sound.sample_rate(), sound.duration());
//! ```

mod error;
pub mod fft;
mod sound;
pub mod window;

pub use error::AudioError;
pub use sound::Sound;
