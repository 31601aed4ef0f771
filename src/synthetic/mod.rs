//! Synthetic training data generation
//!
//! Draws the seven input features uniformly from realistic ranges, then
//! labels each sample with the probabilistic rain rule and the deterministic
//! comfort score from [`rules`]. The labels are computed from the unrounded
//! draws; only the stored feature values are rounded, so storage rounding
//! can never shift a label across a threshold.

mod rules;

pub use rules::{
    comfort_level_for, comfort_score, rain_probability, COMFORT_HIGH_CUTOFF,
    COMFORT_MEDIUM_CUTOFF, RAIN_PENALTY, RAIN_WEIGHT_CLOUDS, RAIN_WEIGHT_HUMIDITY,
    RAIN_WEIGHT_PRESSURE, RAIN_WEIGHT_VISIBILITY,
};

use crate::data::{Dataset, TrainingSample, WeatherObservation};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Generate `n_samples` labeled samples, deterministic for a fixed seed.
///
/// No side effects: persistence of the returned dataset is the caller's
/// concern.
pub fn generate(n_samples: usize, seed: u64) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(n_samples);

    let mut rain_count = 0usize;
    let mut comfort_counts = [0usize; 3];

    for _ in 0..n_samples {
        let temperature = rng.gen_range(-10.0..45.0);
        let humidity = rng.gen_range(10.0..100.0);
        let wind_speed = rng.gen_range(0.0..25.0);
        let visibility = rng.gen_range(0.1..10.0);
        let clouds = rng.gen_range(0.0..100.0);
        let pressure = rng.gen_range(980.0..1040.0);

        let p_rain = rain_probability(clouds, humidity, pressure, visibility);
        let will_rain = rng.gen::<f64>() < p_rain;
        // Uniform in (0, 5] when raining; the lower bound keeps rain_1h
        // strictly positive even after two-decimal rounding.
        let rain_1h = if will_rain { rng.gen_range(0.01..=5.0) } else { 0.0 };

        let score = comfort_score(temperature, humidity, wind_speed, visibility, will_rain);
        let comfort = comfort_level_for(score);

        rain_count += will_rain as usize;
        comfort_counts[comfort.class_index()] += 1;

        samples.push(TrainingSample {
            observation: WeatherObservation {
                temperature: round1(temperature),
                humidity: round1(humidity),
                wind_speed: round2(wind_speed),
                visibility: round2(visibility),
                clouds: round1(clouds),
                pressure: round1(pressure),
                rain_1h: round2(rain_1h),
            },
            will_rain,
            comfort,
        });
    }

    info!(
        n_samples,
        seed,
        rain = rain_count,
        no_rain = n_samples - rain_count,
        comfort_low = comfort_counts[0],
        comfort_medium = comfort_counts[1],
        comfort_high = comfort_counts[2],
        "generated synthetic weather samples"
    );

    Dataset::new(samples)
}
