use std::io::{Cursor, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::AudioError;

/// A mono waveform with samples in [-1, 1].
///
/// Multi-channel input is averaged to a single channel when decoded.
#[derive(Debug, Clone)]
pub struct Sound {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl Sound {
    /// Creates a sound from raw samples.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Decodes a WAV file from disk.
    pub fn from_wav_file(path: impl AsRef<Path>) -> Result<Self, AudioError> {
        let reader = WavReader::open(path)?;
        Self::from_wav_reader(reader)
    }

    /// Decodes a WAV file held in memory (e.g. an HTTP upload).
    pub fn from_wav_bytes(data: &[u8]) -> Result<Self, AudioError> {
        let reader = WavReader::new(Cursor::new(data))?;
        Self::from_wav_reader(reader)
    }

    /// Decodes all samples from an open WAV reader.
    pub fn from_wav_reader<R: Read>(mut reader: WavReader<R>) -> Result<Self, AudioError> {
        let spec = reader.spec();
        let interleaved: Vec<f64> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => reader
                .samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<Result<_, _>>()?,
            (SampleFormat::Int, bits @ 1..=32) => {
                let scale = (1u64 << (bits - 1)) as f64;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f64 / scale))
                    .collect::<Result<_, _>>()?
            }
            (SampleFormat::Float, bits) => {
                return Err(AudioError::UnsupportedFormat {
                    bits,
                    format: "float",
                });
            }
            (SampleFormat::Int, bits) => {
                return Err(AudioError::UnsupportedFormat { bits, format: "int" });
            }
        };

        let channels = spec.channels.max(1) as usize;
        let samples = if channels == 1 {
            interleaved
        } else {
            interleaved
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f64>() / channels as f64)
                .collect()
        };

        Self::new(samples, spec.sample_rate)
    }

    /// Returns the samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Returns the sampling frequency in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the sampling period in seconds.
    pub fn dx(&self) -> f64 {
        1.0 / self.sample_rate as f64
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Returns the largest absolute deviation from the signal mean.
    pub fn peak(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mean = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        self.samples
            .iter()
            .fold(0.0f64, |acc, &s| acc.max((s - mean).abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use std::f64::consts::PI;

    type MemWriter<'a> = WavWriter<&'a mut Cursor<Vec<u8>>>;

    fn wav_bytes(spec: WavSpec, frames: usize, write: impl Fn(&mut MemWriter<'_>, usize)) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for i in 0..frames {
                write(&mut writer, i);
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_int16_mono() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let data = wav_bytes(spec, 8000, |w, i| {
            let s = (2.0 * PI * 220.0 * i as f64 / 16000.0).sin() * 16384.0;
            w.write_sample(s as i16).unwrap();
        });

        let sound = Sound::from_wav_bytes(&data).unwrap();
        assert_eq!(sound.sample_rate(), 16000);
        assert_eq!(sound.len(), 8000);
        assert!((sound.duration() - 0.5).abs() < 1e-12);
        assert!((sound.peak() - 0.5).abs() < 0.01, "peak {}", sound.peak());
    }

    #[test]
    fn test_decode_stereo_averages_channels() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let data = wav_bytes(spec, 100, |w, _| {
            w.write_sample(16384i16).unwrap();
            w.write_sample(0i16).unwrap();
        });

        let sound = Sound::from_wav_bytes(&data).unwrap();
        assert_eq!(sound.len(), 100);
        for &s in sound.samples() {
            assert!((s - 0.25).abs() < 1e-9);
        }
    }

    #[test]
    fn test_decode_float32() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let data = wav_bytes(spec, 10, |w, i| {
            w.write_sample(i as f32 * 0.1).unwrap();
        });

        let sound = Sound::from_wav_bytes(&data).unwrap();
        assert_eq!(sound.len(), 10);
        assert!((sound.samples()[5] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_decode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..1600 {
            writer.write_sample(1000i16).unwrap();
        }
        writer.finalize().unwrap();

        let sound = Sound::from_wav_file(&path).unwrap();
        assert!((sound.duration() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Sound::from_wav_bytes(b"definitely not a wav file"),
            Err(AudioError::Wav(_))
        ));
    }

    #[test]
    fn test_zero_sample_rate() {
        assert!(matches!(
            Sound::new(vec![0.0; 10], 0),
            Err(AudioError::InvalidSampleRate(0))
        ));
    }

    #[test]
    fn test_silence_has_zero_peak() {
        let sound = Sound::new(vec![0.0; 100], 8000).unwrap();
        assert_eq!(sound.peak(), 0.0);
        assert!(Sound::new(Vec::new(), 8000).unwrap().is_empty());
    }
}
