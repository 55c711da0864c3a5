//! Peak detection and inter-peak interval statistics.

/// Indices of local maxima in `signal`, at least `min_distance` samples apart.
///
/// A sample is a peak if it is strictly greater than its left neighbour
/// and strictly greater than the first differing sample to its right;
/// flat tops report their middle sample. Endpoints are never peaks.
///
/// Peaks closer than `min_distance` are thinned by height: the tallest
/// peak is kept and every peak within its exclusion zone removed, then
/// the next tallest survivor, and so on. The result is sorted.
#[must_use]
pub fn find_peaks(signal: &[f64], min_distance: usize) -> Vec<usize> {
    let candidates = local_maxima(signal);
    let distance = min_distance.max(1);
    if distance == 1 || candidates.len() < 2 {
        return candidates;
    }

    let mut by_height: Vec<usize> = (0..candidates.len()).collect();
    by_height.sort_by(|&a, &b| {
        signal[candidates[b]]
            .partial_cmp(&signal[candidates[a]])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut keep = vec![true; candidates.len()];
    for &i in &by_height {
        if !keep[i] {
            continue;
        }
        let pos = candidates[i];
        let mut j = i;
        while j > 0 && pos - candidates[j - 1] < distance {
            j -= 1;
            keep[j] = false;
        }
        let mut j = i + 1;
        while j < candidates.len() && candidates[j] - pos < distance {
            keep[j] = false;
            j += 1;
        }
    }

    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(p))
        .collect()
}

fn local_maxima(signal: &[f64]) -> Vec<usize> {
    let n = signal.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }

    let mut i = 1;
    while i < n - 1 {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < n - 1 && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }
    peaks
}

/// Minimum peak spacing, in samples, for a band whose fastest
/// oscillation is `max_hz`: `max(1, floor(sample_rate / max_hz))`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn min_peak_distance(sample_rate: f64, max_hz: f64) -> usize {
    if !(sample_rate > 0.0) || !(max_hz > 0.0) {
        return 1;
    }
    ((sample_rate / max_hz) as usize).max(1)
}

/// Peaks whose prominence is below this fraction of the window's
/// peak-to-peak range are ripple, not events.
pub const MIN_RELATIVE_PROMINENCE: f64 = 0.25;

/// Height of the peak at `peak` above the higher of the lowest points
/// reachable on each side before the signal climbs above it.
#[must_use]
pub fn prominence(signal: &[f64], peak: usize) -> f64 {
    let Some(&height) = signal.get(peak) else {
        return 0.0;
    };
    let left = signal[..peak]
        .iter()
        .rev()
        .take_while(|&&v| v <= height)
        .fold(height, |m, &v| m.min(v));
    let right = signal[peak + 1..]
        .iter()
        .take_while(|&&v| v <= height)
        .fold(height, |m, &v| m.min(v));
    height - left.max(right)
}

/// Peaks of a zero-phase filtered window that count as events.
///
/// Runs [`find_peaks`], then drops peaks closer than `edge_guard` samples
/// to either end, where the filter has not settled, and peaks whose
/// [`prominence`] is below [`MIN_RELATIVE_PROMINENCE`] of the window's
/// range, such as out-of-band leakage riding on the slope of a slower wave.
#[must_use]
pub fn find_settled_peaks(signal: &[f64], min_distance: usize, edge_guard: usize) -> Vec<usize> {
    let n = signal.len();
    if n <= 2 * edge_guard {
        return Vec::new();
    }
    let (lo, hi) = signal
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let floor = MIN_RELATIVE_PROMINENCE * (hi - lo);

    find_peaks(signal, min_distance)
        .into_iter()
        .filter(|&p| p >= edge_guard && p < n - edge_guard)
        .filter(|&p| prominence(signal, p) >= floor)
        .collect()
}

/// Sub-sample position of the peak at `peak`, from the vertex of the
/// parabola through it and its two neighbours.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn refine_peak(signal: &[f64], peak: usize) -> f64 {
    let at = peak as f64;
    if peak == 0 || peak + 1 >= signal.len() {
        return at;
    }
    let (a, b, c) = (signal[peak - 1], signal[peak], signal[peak + 1]);
    let curvature = a - 2.0 * b + c;
    if curvature < 0.0 {
        at + 0.5 * (a - c) / curvature
    } else {
        at
    }
}

/// Rate and variability derived from a train of peaks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntervalStats {
    /// Events per minute, `60 / mean(interval)`.
    pub rate_per_min: f64,
    /// Population standard deviation of the intervals in milliseconds.
    pub sdnn_ms: f64,
    /// Number of intervals the statistics were computed from.
    pub intervals: usize,
}

impl IntervalStats {
    /// Statistics of the intervals between `peaks` sampled at `sample_rate`.
    ///
    /// Returns `None` with fewer than two peaks or a non-positive rate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_peaks(peaks: &[usize], sample_rate: f64) -> Option<Self> {
        let positions: Vec<f64> = peaks.iter().map(|&p| p as f64).collect();
        Self::from_positions(&positions, sample_rate)
    }

    /// Like [`Self::from_peaks`], with every peak position refined to
    /// sub-sample precision on `signal`.
    #[must_use]
    pub fn from_refined_peaks(signal: &[f64], peaks: &[usize], sample_rate: f64) -> Option<Self> {
        let positions: Vec<f64> = peaks.iter().map(|&p| refine_peak(signal, p)).collect();
        Self::from_positions(&positions, sample_rate)
    }

    /// Statistics of the intervals between increasing sample positions.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_positions(positions: &[f64], sample_rate: f64) -> Option<Self> {
        if positions.len() < 2 || !(sample_rate > 0.0) {
            return None;
        }
        let intervals: Vec<f64> = positions
            .windows(2)
            .map(|w| (w[1] - w[0]) / sample_rate)
            .collect();
        let n = intervals.len() as f64;
        let mean = intervals.iter().sum::<f64>() / n;
        if mean <= 0.0 {
            return None;
        }
        let variance = intervals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            rate_per_min: 60.0 / mean,
            sdnn_ms: variance.sqrt() * 1000.0,
            intervals: intervals.len(),
        })
    }
}
