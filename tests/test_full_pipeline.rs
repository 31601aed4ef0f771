//! Integration test: full pipeline (generate → train → persist → serve)

use skycast::artifact::ArtifactStore;
use skycast::data::ComfortLevel;
use skycast::inference::PredictionService;
use skycast::synthetic::generate;
use skycast::training::{train, TrainingConfig, TrainingOutcome};
use std::collections::HashMap;
use std::sync::OnceLock;

fn outcome() -> &'static TrainingOutcome {
    static OUTCOME: OnceLock<TrainingOutcome> = OnceLock::new();
    OUTCOME.get_or_init(|| {
        let ds = generate(1500, 42);
        let config = TrainingConfig::with_seed(42).with_n_estimators(30);
        train(&ds, &config).unwrap()
    })
}

fn features(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_perfect_summer_day() {
    let service = PredictionService::new(outcome().artifact.clone());
    let result = service
        .predict(&features(&[
            ("temperature", 24.0),
            ("humidity", 45.0),
            ("wind_speed", 2.5),
            ("visibility", 10.0),
            ("clouds", 15.0),
            ("pressure", 1020.0),
            ("rain_1h", 0.0),
        ]))
        .unwrap();

    // None of the rain conditions trigger in this region of feature space,
    // and the comfort buckets alone score 95.
    assert!(!result.will_rain);
    assert!(
        result.rain_probability < 0.3,
        "rain probability {}",
        result.rain_probability
    );
    assert_eq!(result.comfort_level, ComfortLevel::High);
    assert!(result.explanation.contains("ideal at 24°C"));
}

#[test]
fn test_rainy_cold_day() {
    let service = PredictionService::new(outcome().artifact.clone());
    let result = service
        .predict(&features(&[
            ("temperature", 8.0),
            ("humidity", 85.0),
            ("wind_speed", 12.0),
            ("visibility", 3.0),
            ("clouds", 95.0),
            ("pressure", 995.0),
            ("rain_1h", 2.5),
        ]))
        .unwrap();

    // Heavy clouds, high humidity and low pressure all favor rain, and a
    // nonzero rain_1h only ever occurs on raining samples.
    assert!(result.will_rain);
    assert!(
        result.rain_probability > 0.6,
        "rain probability {}",
        result.rain_probability
    );
    // Comfort buckets score at most 15 here, well inside the Low band.
    assert_eq!(result.comfort_level, ComfortLevel::Low);
    assert!(result.explanation.contains("cold at 8°C"));
    assert!(result.explanation.contains("Rain is likely"));
}

#[test]
fn test_artifact_round_trip_preserves_every_prediction() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store.save(&outcome().artifact).unwrap();

    let original = PredictionService::new(outcome().artifact.clone());
    let reloaded = PredictionService::from_store(&store).unwrap();

    // Fixed probe set: reloaded artifact must agree bit-for-bit.
    let probes = generate(60, 777);
    for sample in probes.samples() {
        let o = &sample.observation;
        let map = features(&[
            ("temperature", o.temperature),
            ("humidity", o.humidity),
            ("wind_speed", o.wind_speed),
            ("visibility", o.visibility),
            ("clouds", o.clouds),
            ("pressure", o.pressure),
            ("rain_1h", o.rain_1h),
        ]);
        assert_eq!(original.predict(&map).unwrap(), reloaded.predict(&map).unwrap());
    }
}

#[test]
fn test_service_refuses_to_start_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("nope"));
    assert!(PredictionService::from_store(&store).is_err());
}

#[test]
fn test_generated_rain_amounts_track_the_rain_flag() {
    let ds = generate(3000, 42);
    for sample in ds.samples() {
        assert_eq!(sample.will_rain, sample.observation.rain_1h > 0.0);
    }
}
