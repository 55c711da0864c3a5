//! rPPG domain types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mean skin colour of the region of interest for one video frame.
///
/// Channels are always in `(r, g, b)` order regardless of how the source
/// frame laid out its bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorSample {
    /// Mean red intensity.
    pub r: f64,
    /// Mean green intensity.
    pub g: f64,
    /// Mean blue intensity.
    pub b: f64,
    /// Capture time in seconds.
    pub timestamp: f64,
}

impl ColorSample {
    /// Create a sample from its channel means and capture time.
    #[must_use]
    pub fn new(r: f64, g: f64, b: f64, timestamp: f64) -> Self {
        Self { r, g, b, timestamp }
    }

    /// Whether every field is a finite number.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.timestamp.is_finite()
    }
}

/// Smoothed vital sign estimates.
///
/// Each field is either a positive estimate or `0.0`, meaning no
/// estimate is available yet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VitalMetrics {
    /// Heart rate in beats per minute.
    pub bpm: f64,
    /// Heart rate variability (SDNN) in milliseconds.
    pub hrv_sdnn: f64,
    /// Respiratory rate in breaths per minute.
    pub rr: f64,
}

impl VitalMetrics {
    /// All-unavailable metrics.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Whether at least one metric carries an estimate.
    #[must_use]
    pub fn has_estimate(&self) -> bool {
        self.bpm > 0.0 || self.hrv_sdnn > 0.0 || self.rr > 0.0
    }
}

/// Byte layout of the pixels in a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChannelOrder {
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Blue, green, red (OpenCV capture order).
    Bgr,
}

impl ChannelOrder {
    /// Reorder a raw pixel triple into `(r, g, b)`.
    #[must_use]
    pub fn to_rgb(self, raw: [f64; 3]) -> [f64; 3] {
        match self {
            ChannelOrder::Rgb => raw,
            ChannelOrder::Bgr => [raw[2], raw[1], raw[0]],
        }
    }
}

/// A facial landmark in normalised image coordinates (`[0, 1]` on both axes).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Landmark {
    /// Horizontal position, fraction of frame width.
    pub x: f64,
    /// Vertical position, fraction of frame height.
    pub y: f64,
}

impl Landmark {
    /// Create a landmark.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The full ordered landmark set detected for one face.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceLandmarks {
    /// Landmarks, indexed by the landmark model's point numbering.
    pub points: Vec<Landmark>,
}

impl FaceLandmarks {
    /// Wrap an ordered landmark list.
    #[must_use]
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Landmark at `index`, if the set is large enough.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied()
    }

    /// Number of landmarks in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A pixel-space vertex of the region-of-interest polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PixelPoint {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

impl PixelPoint {
    /// Create a pixel point.
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vital_metrics_unavailable_is_all_zero() {
        let m = VitalMetrics::unavailable();
        assert!((m.bpm - 0.0).abs() < f64::EPSILON);
        assert!((m.hrv_sdnn - 0.0).abs() < f64::EPSILON);
        assert!((m.rr - 0.0).abs() < f64::EPSILON);
        assert!(!m.has_estimate());
    }

    #[test]
    fn vital_metrics_partial_estimate() {
        let m = VitalMetrics {
            bpm: 0.0,
            hrv_sdnn: 0.0,
            rr: 14.0,
        };
        assert!(m.has_estimate());
    }

    #[test]
    fn bgr_pixels_are_reordered() {
        assert_eq!(ChannelOrder::Bgr.to_rgb([1.0, 2.0, 3.0]), [3.0, 2.0, 1.0]);
        assert_eq!(ChannelOrder::Rgb.to_rgb([1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn face_landmarks_out_of_range_index() {
        let face = FaceLandmarks::new(vec![Landmark::new(0.5, 0.5)]);
        assert_eq!(face.len(), 1);
        assert!(face.get(0).is_some());
        assert!(face.get(1).is_none());
    }

    #[test]
    fn non_finite_sample_detected() {
        assert!(ColorSample::new(1.0, 2.0, 3.0, 0.0).is_finite());
        assert!(!ColorSample::new(f64::NAN, 2.0, 3.0, 0.0).is_finite());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn color_sample_serde_roundtrip() {
        let sample = ColorSample::new(120.5, 98.25, 80.0, 1_700_000_000.5);
        let json = serde_json::to_string(&sample).unwrap();
        let parsed: ColorSample = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample);
    }
}
