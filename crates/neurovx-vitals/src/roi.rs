//! Region-of-interest colour sampling.
//!
//! Turns one video frame plus a detected face into a single mean skin
//! colour. The region is the convex hull of a fixed subset of facial
//! landmarks (by default nine forehead points), rasterised with a
//! boundary-inclusive scanline fill.

use image::RgbImage;

use crate::types::{ChannelOrder, FaceLandmarks, PixelPoint};

/// Normalised landmark coordinates are clamped to
/// `[-LANDMARK_REACH, 1 + LANDMARK_REACH]` before scaling to pixels.
pub const LANDMARK_REACH: f64 = 4.0;

/// Forehead landmark indices of the 468-point face mesh.
pub const FOREHEAD_LANDMARKS: [usize; 9] = [151, 9, 8, 107, 66, 69, 105, 104, 336];

/// Source of facial landmarks for a frame.
///
/// Landmark detection itself lives outside this crate; implementors
/// wrap whatever detector the host application uses.
pub trait LandmarkProvider {
    /// Detect at most one face in `frame`.
    ///
    /// Returns `None` when no face is visible.
    fn detect(&mut self, frame: &RgbImage) -> Option<FaceLandmarks>;
}

/// Provider that returns the same landmark set for every frame.
///
/// Useful for replays and for a head that is known to be still.
#[derive(Debug, Clone, Default)]
pub struct StaticLandmarks {
    face: Option<FaceLandmarks>,
}

impl StaticLandmarks {
    /// Always report `face`.
    #[must_use]
    pub fn new(face: FaceLandmarks) -> Self {
        Self { face: Some(face) }
    }

    /// Never report a face.
    #[must_use]
    pub fn absent() -> Self {
        Self { face: None }
    }
}

impl LandmarkProvider for StaticLandmarks {
    fn detect(&mut self, _frame: &RgbImage) -> Option<FaceLandmarks> {
        self.face.clone()
    }
}

/// Result of sampling one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiMeasurement {
    /// Mean intensity per channel, in `(r, g, b)` order.
    pub rgb: [f64; 3],
    /// Pixel-space landmark points in selection order.
    pub polygon: Vec<PixelPoint>,
    /// Number of pixels averaged.
    pub pixel_count: usize,
}

/// Samples the mean colour inside a landmark-delimited region.
#[derive(Debug, Clone)]
pub struct RoiSampler {
    indices: Vec<usize>,
}

impl Default for RoiSampler {
    fn default() -> Self {
        Self::forehead()
    }
}

impl RoiSampler {
    /// Sample the region outlined by the landmarks at `indices`.
    #[must_use]
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// Sample the nine-point forehead region.
    #[must_use]
    pub fn forehead() -> Self {
        Self::new(FOREHEAD_LANDMARKS.to_vec())
    }

    /// Landmark indices used to outline the region.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Pixel-space polygon for `face` on a `width` x `height` frame.
    ///
    /// Indices missing from the landmark set and non-finite landmarks
    /// are skipped. Points far outside the frame are pulled in to
    /// [`LANDMARK_REACH`] frame sizes beyond its edges.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn polygon(&self, face: &FaceLandmarks, width: u32, height: u32) -> Vec<PixelPoint> {
        let to_pixel = |v: f64, size: u32| {
            (v.clamp(-LANDMARK_REACH, 1.0 + LANDMARK_REACH) * f64::from(size)) as i64
        };
        self.indices
            .iter()
            .filter_map(|&i| face.get(i))
            .filter(|lm| lm.x.is_finite() && lm.y.is_finite())
            .map(|lm| PixelPoint::new(to_pixel(lm.x, width), to_pixel(lm.y, height)))
            .collect()
    }

    /// Mean colour of the region of `frame` outlined by `face`.
    ///
    /// Returns `None` when fewer than three points are usable or the
    /// region does not cover any pixel of the frame.
    #[must_use]
    pub fn sample(
        &self,
        frame: &RgbImage,
        order: ChannelOrder,
        face: &FaceLandmarks,
    ) -> Option<RoiMeasurement> {
        let (width, height) = frame.dimensions();
        let polygon = self.polygon(face, width, height);
        if polygon.len() < 3 {
            return None;
        }

        let hull = convex_hull(&polygon);
        let mut sums = [0.0_f64; 3];
        let mut count = 0_usize;

        for (x, y) in hull_pixels(&hull, width, height) {
            let px = frame.get_pixel(x, y).0;
            sums[0] += f64::from(px[0]);
            sums[1] += f64::from(px[1]);
            sums[2] += f64::from(px[2]);
            count += 1;
        }

        if count == 0 {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let n = count as f64;
        let raw = [sums[0] / n, sums[1] / n, sums[2] / n];

        Some(RoiMeasurement {
            rgb: order.to_rgb(raw),
            polygon,
            pixel_count: count,
        })
    }
}

/// Convex hull (Andrew's monotone chain), counter-clockwise, no
/// repeated endpoint. Collinear and duplicate points collapse.
fn convex_hull(points: &[PixelPoint]) -> Vec<PixelPoint> {
    let mut pts = points.to_vec();
    pts.sort_unstable();
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    fn cross(o: PixelPoint, a: PixelPoint, b: PixelPoint) -> i128 {
        let d = |p: PixelPoint, q: PixelPoint| (i128::from(p.x - q.x), i128::from(p.y - q.y));
        let ((ax, ay), (bx, by)) = (d(a, o), d(b, o));
        ax * by - ay * bx
    }

    let mut lower: Vec<PixelPoint> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<PixelPoint> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Every in-frame pixel covered by the convex polygon `hull`, boundary
/// included.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hull_pixels(hull: &[PixelPoint], width: u32, height: u32) -> Vec<(u32, u32)> {
    let mut covered = Vec::new();
    if hull.is_empty() || width == 0 || height == 0 {
        return covered;
    }

    let y_min = hull.iter().map(|p| p.y).min().unwrap_or(0).max(0);
    let y_max = hull
        .iter()
        .map(|p| p.y)
        .max()
        .unwrap_or(-1)
        .min(i64::from(height) - 1);

    for y in y_min..=y_max {
        let Some((x_lo, x_hi)) = row_span(hull, y) else {
            continue;
        };
        let start = (x_lo.ceil() as i64).max(0);
        let end = (x_hi.floor() as i64).min(i64::from(width) - 1);
        for x in start..=end {
            covered.push((x as u32, y as u32));
        }
    }
    covered
}

/// Horizontal extent of the polygon on row `y`.
#[allow(clippy::cast_precision_loss)]
fn row_span(hull: &[PixelPoint], y: i64) -> Option<(f64, f64)> {
    if hull.len() == 1 {
        let p = hull[0];
        return (p.y == y).then_some((p.x as f64, p.x as f64));
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for (i, &a) in hull.iter().enumerate() {
        let b = hull[(i + 1) % hull.len()];
        if a.y == b.y {
            if a.y == y {
                lo = lo.min(a.x.min(b.x) as f64);
                hi = hi.max(a.x.max(b.x) as f64);
            }
        } else if (a.y.min(b.y)..=a.y.max(b.y)).contains(&y) {
            let t = (y - a.y) as f64 / (b.y - a.y) as f64;
            let x = a.x as f64 + t * (b.x - a.x) as f64;
            lo = lo.min(x);
            hi = hi.max(x);
        }
    }

    (lo <= hi).then_some((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Landmark;
    use image::Rgb;

    /// Landmark set where the forehead indices outline the square
    /// `[x0, x1] x [y0, y1]` (normalised).
    fn square_face(x0: f64, y0: f64, x1: f64, y1: f64) -> FaceLandmarks {
        let mut points = vec![Landmark::new(0.0, 0.0); 400];
        let corners = [
            Landmark::new(x0, y0),
            Landmark::new(x1, y0),
            Landmark::new(x1, y1),
            Landmark::new(x0, y1),
        ];
        for (k, &idx) in FOREHEAD_LANDMARKS.iter().enumerate() {
            points[idx] = corners[k % corners.len()];
        }
        FaceLandmarks::new(points)
    }

    #[test]
    fn uniform_frame_returns_its_colour() {
        let frame = RgbImage::from_pixel(100, 100, Rgb([200, 120, 90]));
        let sampler = RoiSampler::forehead();
        let m = sampler
            .sample(&frame, ChannelOrder::Rgb, &square_face(0.2, 0.2, 0.6, 0.5))
            .unwrap();
        assert!((m.rgb[0] - 200.0).abs() < 1e-9);
        assert!((m.rgb[1] - 120.0).abs() < 1e-9);
        assert!((m.rgb[2] - 90.0).abs() < 1e-9);
        assert_eq!(m.polygon.len(), 9);
    }

    #[test]
    fn bgr_frame_is_reported_as_rgb() {
        // Bytes stored as (b, g, r).
        let frame = RgbImage::from_pixel(50, 50, Rgb([10, 20, 30]));
        let m = RoiSampler::forehead()
            .sample(&frame, ChannelOrder::Bgr, &square_face(0.1, 0.1, 0.9, 0.9))
            .unwrap();
        assert!((m.rgb[0] - 30.0).abs() < 1e-9);
        assert!((m.rgb[1] - 20.0).abs() < 1e-9);
        assert!((m.rgb[2] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn only_pixels_inside_region_are_averaged() {
        // Left half black, right half white; region entirely on the right.
        let frame = RgbImage::from_fn(100, 100, |x, _| {
            if x < 50 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let m = RoiSampler::forehead()
            .sample(&frame, ChannelOrder::Rgb, &square_face(0.6, 0.2, 0.9, 0.8))
            .unwrap();
        assert!((m.rgb[1] - 255.0).abs() < 1e-9);
    }

    #[test]
    fn square_region_pixel_count_is_inclusive() {
        let frame = RgbImage::from_pixel(100, 100, Rgb([1, 1, 1]));
        let m = RoiSampler::forehead()
            .sample(&frame, ChannelOrder::Rgb, &square_face(0.1, 0.1, 0.2, 0.2))
            .unwrap();
        // Corners at pixels 10 and 20 on both axes: 11 x 11 pixels.
        assert_eq!(m.pixel_count, 121);
    }

    #[test]
    fn fewer_than_three_points_yields_none() {
        let frame = RgbImage::from_pixel(20, 20, Rgb([5, 5, 5]));
        // Only two landmarks exist, so only indices 8 and 9 resolve.
        let face = FaceLandmarks::new(vec![Landmark::new(0.5, 0.5); 10]);
        assert!(RoiSampler::forehead()
            .sample(&frame, ChannelOrder::Rgb, &face)
            .is_none());
    }

    #[test]
    fn far_away_landmarks_are_clamped() {
        let frame = RgbImage::from_pixel(100, 100, Rgb([7, 7, 7]));
        let sampler = RoiSampler::forehead();
        let m = sampler
            .sample(&frame, ChannelOrder::Rgb, &square_face(0.2, 0.2, 1e15, 0.8))
            .unwrap();
        assert_eq!(m.polygon.iter().map(|p| p.x).max(), Some(500));
        // Columns 20..=99, rows 20..=80.
        assert_eq!(m.pixel_count, 80 * 61);

        let wild = square_face(-1e300, -1e18, 1e300, 1e18);
        let m = sampler.sample(&frame, ChannelOrder::Rgb, &wild).unwrap();
        assert_eq!(m.pixel_count, 100 * 100);
        assert!(m.polygon.iter().all(|p| p.x.abs() <= 500 && p.y.abs() <= 500));
    }

    #[test]
    fn region_outside_frame_yields_none() {
        let frame = RgbImage::from_pixel(20, 20, Rgb([5, 5, 5]));
        let face = square_face(1.5, 1.5, 2.0, 2.0);
        assert!(RoiSampler::forehead()
            .sample(&frame, ChannelOrder::Rgb, &face)
            .is_none());
    }

    #[test]
    fn hull_drops_interior_points() {
        let pts = vec![
            PixelPoint::new(0, 0),
            PixelPoint::new(10, 0),
            PixelPoint::new(10, 10),
            PixelPoint::new(0, 10),
            PixelPoint::new(5, 5),
        ];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&PixelPoint::new(5, 5)));
    }

    #[test]
    fn collinear_points_fill_a_line() {
        let hull = convex_hull(&[
            PixelPoint::new(0, 0),
            PixelPoint::new(2, 2),
            PixelPoint::new(4, 4),
        ]);
        assert_eq!(hull.len(), 2);
        let pixels = hull_pixels(&hull, 10, 10);
        assert_eq!(pixels.len(), 5);
    }

    #[test]
    fn static_provider_reports_face_or_absence() {
        let frame = RgbImage::new(4, 4);
        let mut present = StaticLandmarks::new(square_face(0.1, 0.1, 0.5, 0.5));
        assert!(present.detect(&frame).is_some());
        let mut absent = StaticLandmarks::absent();
        assert!(absent.detect(&frame).is_none());
    }
}
