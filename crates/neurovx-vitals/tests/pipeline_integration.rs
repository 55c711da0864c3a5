//! End-to-end tests of the rPPG pipeline on synthetic colour streams.

use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use image::{Rgb, RgbImage};
use neurovx_vitals::{
    ChannelOrder, ColorSample, FaceLandmarks, Landmark, PipelineConfig, RppgPipeline,
    StaticLandmarks, VitalMetrics, FOREHEAD_LANDMARKS,
};

const FS: f64 = 30.0;

/// Skin colour stream with a cardiac pulse, a breathing modulation of the
/// green channel and an optional common-mode illumination flicker.
fn skin_stream(
    heart_bpm: f64,
    breaths_per_min: f64,
    motion: f64,
    seconds: f64,
) -> Vec<ColorSample> {
    let n = (seconds * FS) as usize;
    let fh = heart_bpm / 60.0;
    let fr = breaths_per_min / 60.0;
    (0..n)
        .map(|i| {
            let t = i as f64 / FS;
            let pulse = (2.0 * PI * fh * t).sin();
            let breath = (2.0 * PI * fr * t).sin();
            let light = 1.0 + motion * (2.0 * PI * 0.3 * t).sin();
            ColorSample::new(
                (150.0 + 0.4 * pulse) * light,
                (100.0 + 0.8 * pulse + 2.0 * breath) * light,
                (80.0 + 0.2 * pulse) * light,
                t,
            )
        })
        .collect()
}

fn run(pipeline: &mut RppgPipeline, samples: &[ColorSample]) -> VitalMetrics {
    for s in samples {
        pipeline.push_sample(*s);
    }
    pipeline.vitals()
}

#[test]
fn heart_rate_tracks_synthetic_pulse() {
    let mut pipeline = RppgPipeline::new(PipelineConfig::default()).unwrap();
    let vitals = run(&mut pipeline, &skin_stream(72.0, 15.0, 0.0, 20.0));
    assert_abs_diff_eq!(vitals.bpm, 72.0, epsilon = 4.0);
}

#[test]
fn heart_rate_survives_illumination_flicker() {
    let mut pipeline = RppgPipeline::new(PipelineConfig::default()).unwrap();
    let vitals = run(&mut pipeline, &skin_stream(84.0, 15.0, 0.02, 20.0));
    assert_abs_diff_eq!(vitals.bpm, 84.0, epsilon = 5.0);
}

#[test]
fn respiratory_rate_from_long_window() {
    let config = PipelineConfig {
        window_capacity: 600,
        ..PipelineConfig::default()
    };
    let mut pipeline = RppgPipeline::new(config).unwrap();
    let vitals = run(&mut pipeline, &skin_stream(72.0, 15.0, 0.0, 30.0));
    assert_abs_diff_eq!(vitals.rr, 15.0, epsilon = 2.0);
    assert_abs_diff_eq!(vitals.bpm, 72.0, epsilon = 4.0);
}

#[test]
fn slow_breathing_is_not_misread_on_the_default_window() {
    let mut pipeline = RppgPipeline::new(PipelineConfig::default()).unwrap();
    let vitals = run(&mut pipeline, &skin_stream(72.0, 8.0, 0.0, 60.0));
    assert!(vitals.rr < 10.0, "rr = {}", vitals.rr);
    assert_abs_diff_eq!(vitals.bpm, 72.0, epsilon = 4.0);
}

#[test]
fn slow_breathing_from_long_window() {
    let config = PipelineConfig {
        window_capacity: 600,
        ..PipelineConfig::default()
    };
    let mut pipeline = RppgPipeline::new(config).unwrap();
    let vitals = run(&mut pipeline, &skin_stream(72.0, 8.0, 0.0, 60.0));
    assert_abs_diff_eq!(vitals.rr, 8.0, epsilon = 1.5);
}

#[test]
fn periodic_slow_pulse_has_low_variability() {
    // 45 BPM at 30 Hz: exactly 40 samples per beat.
    let mut pipeline = RppgPipeline::new(PipelineConfig::default()).unwrap();
    let vitals = run(&mut pipeline, &skin_stream(45.0, 15.0, 0.0, 60.0));
    assert_abs_diff_eq!(vitals.bpm, 45.0, epsilon = 2.0);
    assert!(vitals.hrv_sdnn < 10.0, "sdnn = {}", vitals.hrv_sdnn);
}

#[test]
fn exposed_waveforms_cover_the_window() {
    let mut pipeline = RppgPipeline::default();
    run(&mut pipeline, &skin_stream(72.0, 15.0, 0.0, 6.0));
    assert_eq!(pipeline.raw_pulse().len(), 150);
    assert_eq!(pipeline.filtered_pulse().len(), 150);
    let ts = pipeline.timestamps();
    assert_eq!(ts.len(), 150);
    assert!(ts.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn frames_with_static_face_feed_the_window() {
    let mut points = vec![Landmark::new(0.5, 0.5); 468];
    let outline = [
        (0.2, 0.2),
        (0.5, 0.15),
        (0.8, 0.2),
        (0.85, 0.5),
        (0.8, 0.8),
        (0.5, 0.85),
        (0.2, 0.8),
        (0.15, 0.5),
        (0.5, 0.5),
    ];
    for (&idx, (x, y)) in FOREHEAD_LANDMARKS.iter().zip(outline) {
        points[idx] = Landmark::new(x, y);
    }
    let mut provider = StaticLandmarks::new(FaceLandmarks::new(points));
    let mut pipeline = RppgPipeline::default();

    let mut recomputes = 0;
    for i in 0..300 {
        let t = f64::from(i) / FS;
        let pulse = (2.0 * PI * 1.25 * t).sin();
        let px = [
            (160.0 + 3.0 * pulse).round() as u8,
            (110.0 + 6.0 * pulse).round() as u8,
            (90.0 + 1.0 * pulse).round() as u8,
        ];
        // Stored in capture order (BGR).
        let frame = RgbImage::from_pixel(48, 48, Rgb([px[2], px[1], px[0]]));
        let out = pipeline.process_with(&mut provider, &frame, ChannelOrder::Bgr, t);
        assert!(out.sampled);
        if out.recomputed {
            recomputes += 1;
        }
    }

    assert_eq!(recomputes, 16);
    assert_eq!(pipeline.roi_polygon().len(), 9);
    let first = pipeline.window().samples().next().unwrap();
    assert!(first.r > first.g && first.g > first.b);
    assert_abs_diff_eq!(pipeline.vitals().bpm, 75.0, epsilon = 6.0);
}

#[test]
fn frames_without_face_leave_state_unchanged() {
    let mut pipeline = RppgPipeline::default();
    run(&mut pipeline, &skin_stream(72.0, 15.0, 0.0, 6.0));
    let before = pipeline.vitals();
    let len = pipeline.window().len();

    let mut provider = StaticLandmarks::absent();
    let frame = RgbImage::from_pixel(16, 16, Rgb([0, 0, 0]));
    for i in 0..30 {
        let t = 10.0 + f64::from(i);
        let out = pipeline.process_with(&mut provider, &frame, ChannelOrder::Rgb, t);
        assert!(!out.sampled);
        assert_eq!(out.vitals, before);
    }
    assert_eq!(pipeline.window().len(), len);
}

#[cfg(feature = "serde")]
#[test]
fn config_from_json_file() {
    use tempfile::tempdir;

    let tmp = tempdir().expect("tempdir must be created");
    let path = tmp.path().join("pipeline.json");
    std::fs::write(&path, r#"{ "window_capacity": 300, "recompute_stride": 5 }"#).unwrap();

    let config = PipelineConfig::from_json(&path).unwrap();
    assert_eq!(config.window_capacity, 300);
    assert_eq!(config.recompute_stride, 5);
    assert_eq!(config.filter_order, 2);
    assert!(RppgPipeline::new(config).is_ok());
}
