//! Synthetic signals for tests.

use std::f64::consts::PI;

use parkvoice_audio::Sound;

/// A vowel-like tone: the first six harmonics of `f0` with 1/h amplitudes.
pub(crate) fn harmonic_tone(f0: f64, seconds: f64, rate: u32) -> Sound {
    let n = (seconds * rate as f64).round() as usize;
    let samples = (0..n)
        .map(|i| {
            let t = i as f64 / rate as f64;
            0.3 * (1..=6)
                .map(|h| (2.0 * PI * f0 * h as f64 * t).sin() / h as f64)
                .sum::<f64>()
        })
        .collect();
    Sound::new(samples, rate).unwrap()
}

/// Adds deterministic uniform noise of the given amplitude.
pub(crate) fn with_noise(sound: &Sound, amplitude: f64) -> Sound {
    let mut state: u32 = 0x2545_f491;
    let samples = sound
        .samples()
        .iter()
        .map(|&s| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            s + amplitude * (state as f64 / u32::MAX as f64 * 2.0 - 1.0)
        })
        .collect();
    Sound::new(samples, sound.sample_rate()).unwrap()
}

pub(crate) fn silence(seconds: f64, rate: u32) -> Sound {
    let n = (seconds * rate as f64).round() as usize;
    Sound::new(vec![0.0; n], rate).unwrap()
}
