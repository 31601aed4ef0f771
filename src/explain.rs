//! Natural-language explanation of a prediction
//!
//! Pure template logic: three sentence fragments joined with ". " and a
//! trailing period. Deterministic given inputs.

use crate::data::ComfortLevel;

/// Render the human-readable summary for a prediction.
///
/// `rain_probability` is the probability mass of the rain class in [0, 1].
pub fn explain(
    temperature: f64,
    will_rain: bool,
    rain_probability: f64,
    comfort: ComfortLevel,
) -> String {
    let mut fragments = Vec::with_capacity(3);

    if (18.0..=26.0).contains(&temperature) {
        fragments.push(format!("Temperature is ideal at {temperature}°C"));
    } else if temperature < 10.0 {
        fragments.push(format!("Temperature is cold at {temperature}°C"));
    } else if temperature > 32.0 {
        fragments.push(format!("Temperature is hot at {temperature}°C"));
    } else {
        fragments.push(format!("Temperature is moderate at {temperature}°C"));
    }

    let percent = (rain_probability * 100.0).round();
    if will_rain {
        fragments.push(format!("Rain is likely ({percent:.0}% probability)"));
    } else {
        fragments.push(format!("Low rain chance ({percent:.0}% probability)"));
    }

    fragments.push(
        match comfort {
            ComfortLevel::High => "Overall conditions are very comfortable",
            ComfortLevel::Medium => "Conditions are moderately comfortable",
            ComfortLevel::Low => "Conditions may be uncomfortable",
        }
        .to_string(),
    );

    format!("{}.", fragments.join(". "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ideal_dry_high_comfort() {
        let text = explain(24.0, false, 0.05, ComfortLevel::High);
        assert_eq!(
            text,
            "Temperature is ideal at 24°C. Low rain chance (5% probability). \
             Overall conditions are very comfortable."
        );
    }

    #[test]
    fn test_cold_rainy_low_comfort() {
        let text = explain(8.0, true, 0.87, ComfortLevel::Low);
        assert_eq!(
            text,
            "Temperature is cold at 8°C. Rain is likely (87% probability). \
             Conditions may be uncomfortable."
        );
    }

    #[test]
    fn test_temperature_bands() {
        assert!(explain(18.0, false, 0.0, ComfortLevel::High).contains("ideal at 18°C"));
        assert!(explain(26.0, false, 0.0, ComfortLevel::High).contains("ideal at 26°C"));
        assert!(explain(9.9, false, 0.0, ComfortLevel::Low).contains("cold at 9.9°C"));
        assert!(explain(33.0, false, 0.0, ComfortLevel::Low).contains("hot at 33°C"));
        assert!(explain(15.0, false, 0.0, ComfortLevel::Medium).contains("moderate at 15°C"));
        assert!(explain(30.0, false, 0.0, ComfortLevel::Medium).contains("moderate at 30°C"));
    }

    #[test]
    fn test_probability_rounds_to_whole_percent() {
        assert!(explain(20.0, true, 0.666, ComfortLevel::Medium).contains("(67% probability)"));
        assert!(explain(20.0, false, 0.004, ComfortLevel::Medium).contains("(0% probability)"));
    }

    #[test]
    fn test_deterministic() {
        let a = explain(12.3, true, 0.42, ComfortLevel::Medium);
        let b = explain(12.3, true, 0.42, ComfortLevel::Medium);
        assert_eq!(a, b);
    }
}
