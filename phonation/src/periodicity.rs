//! Short-term periodicity analysis shared by pitch and harmonicity.
//!
//! Every frame yields candidate periods (local maxima of a normalized
//! correlation function, refined by parabolic interpolation) plus one
//! unvoiced candidate. A Viterbi pass over all frames then picks a single
//! candidate per frame, trading local strength against octave jumps and
//! voiced/unvoiced transitions.

use std::iter;

use parkvoice_audio::{Sound, fft, window};

use crate::frames::FrameGrid;

/// How the per-frame correlation function is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    /// Hanning-windowed autocorrelation, divided by the window's own
    /// autocorrelation.
    Autocorrelation,
    /// Forward cross-correlation between a window and its lagged copy.
    CrossCorrelation,
}

#[derive(Debug, Clone)]
pub(crate) struct Params {
    pub method: Method,
    pub time_step: f64,
    pub min_pitch: f64,
    pub max_pitch: f64,
    pub periods_per_window: f64,
    pub max_candidates: usize,
    pub silence_threshold: f64,
    pub voicing_threshold: f64,
    pub octave_cost: f64,
    pub octave_jump_cost: f64,
    pub voiced_unvoiced_cost: f64,
}

/// One period hypothesis for a frame. A zero frequency means unvoiced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    /// Frequency in Hz, or 0 for the unvoiced candidate.
    pub frequency: f64,
    /// Normalized correlation at the candidate's period, in [0, 1].
    pub strength: f64,
}

impl Candidate {
    pub(crate) const UNVOICED: Candidate = Candidate {
        frequency: 0.0,
        strength: 0.0,
    };

    pub(crate) fn is_voiced(&self) -> bool {
        self.frequency > 0.0
    }
}

struct Frame {
    /// Local peak relative to the global peak, in [0, 1].
    intensity: f64,
    /// Voiced candidates, strongest first.
    candidates: Vec<Candidate>,
}

/// Frame times (seconds) and the candidate chosen for each frame.
#[derive(Debug, Clone, Default)]
pub(crate) struct Track {
    pub times: Vec<f64>,
    pub path: Vec<Candidate>,
}

pub(crate) fn analyze(sound: &Sound, p: &Params) -> Track {
    let fs = sound.sample_rate() as f64;
    let samples = sound.samples();

    let window_samples = (p.periods_per_window / p.min_pitch * fs).round() as usize;
    let max_pitch = p.max_pitch.min(fs / 2.0);
    let min_lag = ((fs / max_pitch).floor() as usize).max(2);
    let mut max_lag = (fs / p.min_pitch).ceil() as usize;
    let span = match p.method {
        Method::Autocorrelation => {
            max_lag = max_lag.min(window_samples / 2);
            window_samples
        }
        Method::CrossCorrelation => window_samples + max_lag,
    };
    if window_samples < 2 || min_lag + 1 >= max_lag || p.time_step <= 0.0 {
        return Track::default();
    }

    let grid = FrameGrid::new(samples.len(), span, p.time_step * fs);
    let global_peak = sound.peak();
    let threshold = 0.5 * p.voicing_threshold;
    let limit = p.max_candidates.saturating_sub(1).max(1);

    let hann = window::hanning(window_samples);
    let nfft = fft::next_pow2(window_samples + max_lag + 1);
    let window_acf = match p.method {
        Method::Autocorrelation => normalize(fft::autocorrelation(&hann, nfft, max_lag)),
        Method::CrossCorrelation => Vec::new(),
    };

    let mut seg = vec![0.0f64; span];
    let frames: Vec<Frame> = (0..grid.count())
        .map(|i| {
            let start = grid.start(i);
            seg.copy_from_slice(&samples[start..start + span]);
            let mean = seg.iter().sum::<f64>() / span as f64;
            for s in seg.iter_mut() {
                *s -= mean;
            }

            let local_peak = seg.iter().fold(0.0f64, |acc, &s| acc.max(s.abs()));
            let intensity = if global_peak > 0.0 {
                (local_peak / global_peak).min(1.0)
            } else {
                0.0
            };
            if local_peak <= 0.0 {
                return Frame {
                    intensity,
                    candidates: Vec::new(),
                };
            }

            let r = match p.method {
                Method::Autocorrelation => {
                    window::apply(&mut seg, &hann);
                    let r = normalize(fft::autocorrelation(&seg, nfft, max_lag));
                    r.iter()
                        .zip(&window_acf)
                        .map(|(&x, &w)| if w > 0.0 { x / w } else { 0.0 })
                        .collect()
                }
                Method::CrossCorrelation => cross_correlation(&seg, window_samples, max_lag),
            };

            Frame {
                intensity,
                candidates: peaks(&r, min_lag, max_lag, threshold, fs, limit),
            }
        })
        .collect();

    Track {
        times: (0..grid.count()).map(|i| grid.time(i, fs)).collect(),
        path: find_path(&frames, p, max_pitch),
    }
}

/// Scales `r` so that `r[0] == 1`; an all-zero input stays zero.
fn normalize(mut r: Vec<f64>) -> Vec<f64> {
    let r0 = r.first().copied().unwrap_or(0.0);
    for v in r.iter_mut() {
        *v = if r0 > 0.0 { *v / r0 } else { 0.0 };
    }
    r
}

/// Normalized correlation between `seg[..w]` and `seg[lag..lag + w]`.
fn cross_correlation(seg: &[f64], w: usize, max_lag: usize) -> Vec<f64> {
    let head = &seg[..w];
    let e0: f64 = head.iter().map(|s| s * s).sum();
    // Energy of seg[lag..lag + w], slid one sample per lag.
    let mut e = e0;
    (0..=max_lag)
        .map(|lag| {
            if lag > 0 {
                e += seg[lag + w - 1] * seg[lag + w - 1] - seg[lag - 1] * seg[lag - 1];
                e = e.max(0.0);
            }
            let tail = &seg[lag..lag + w];
            let dot: f64 = head.iter().zip(tail).map(|(a, b)| a * b).sum();
            let denom = (e0 * e).sqrt();
            if denom > 0.0 { dot / denom } else { 0.0 }
        })
        .collect()
}

/// Local maxima of `r` within `[min_lag, max_lag)`, strongest first.
fn peaks(
    r: &[f64],
    min_lag: usize,
    max_lag: usize,
    threshold: f64,
    fs: f64,
    limit: usize,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    for k in min_lag..max_lag.min(r.len() - 1) {
        let (prev, cur, next) = (r[k - 1], r[k], r[k + 1]);
        if cur <= threshold || cur <= prev || cur < next {
            continue;
        }
        let dr = 0.5 * (next - prev);
        let d2r = 2.0 * cur - prev - next;
        let offset = dr / d2r;
        let mut strength = cur + 0.5 * dr * offset;
        if strength > 1.0 {
            strength = 1.0 / strength;
        }
        out.push(Candidate {
            frequency: fs / (k as f64 + offset),
            strength,
        });
    }
    out.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    out.truncate(limit);
    out
}

/// Viterbi search for the best candidate sequence.
fn find_path(frames: &[Frame], p: &Params, ceiling: f64) -> Vec<Candidate> {
    if frames.is_empty() {
        return Vec::new();
    }

    let correction = 0.01 / p.time_step;
    let jump_cost = p.octave_jump_cost * correction;
    let voicing_cost = p.voiced_unvoiced_cost * correction;

    let local = |frame: &Frame, c: &Candidate| -> f64 {
        if c.is_voiced() {
            return c.strength - p.octave_cost * (ceiling / c.frequency).log2();
        }
        let unvoiced = if p.silence_threshold <= 0.0 {
            0.0
        } else {
            2.0 - frame.intensity / (p.silence_threshold / (1.0 + p.voicing_threshold))
        };
        p.voicing_threshold + unvoiced.max(0.0)
    };
    let transition = |a: &Candidate, b: &Candidate| -> f64 {
        match (a.is_voiced(), b.is_voiced()) {
            (false, false) => 0.0,
            (true, true) => jump_cost * (a.frequency / b.frequency).log2().abs(),
            _ => voicing_cost,
        }
    };

    let options: Vec<Vec<Candidate>> = frames
        .iter()
        .map(|f| {
            iter::once(Candidate::UNVOICED)
                .chain(f.candidates.iter().copied())
                .collect()
        })
        .collect();

    let mut score: Vec<f64> = options[0].iter().map(|c| local(&frames[0], c)).collect();
    let mut back: Vec<Vec<usize>> = Vec::with_capacity(frames.len());
    back.push(vec![0; options[0].len()]);

    for i in 1..frames.len() {
        let mut next = Vec::with_capacity(options[i].len());
        let mut from = Vec::with_capacity(options[i].len());
        for c in &options[i] {
            let (best_prev, best) = options[i - 1]
                .iter()
                .enumerate()
                .map(|(j, prev)| (j, score[j] - transition(prev, c)))
                .fold((0, f64::NEG_INFINITY), |acc, x| if x.1 > acc.1 { x } else { acc });
            next.push(best + local(&frames[i], c));
            from.push(best_prev);
        }
        score = next;
        back.push(from);
    }

    let mut idx = argmax(&score);
    let mut path = vec![Candidate::UNVOICED; frames.len()];
    for i in (0..frames.len()).rev() {
        path[i] = options[i][idx];
        idx = back[i][idx];
    }
    path
}

fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc })
        .0
}
