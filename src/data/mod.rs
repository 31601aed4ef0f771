//! Labeled weather data
//!
//! [`Dataset`] is the tabular exchange format between generation and
//! training: an ordered sequence of samples, convertible to a polars
//! DataFrame (and CSV on disk) and projectable into a feature matrix plus
//! the two label tracks.

use crate::error::{Result, SkycastError};
use crate::schema::FEATURE_NAMES;
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;

/// Three-way comfort label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComfortLevel {
    Low,
    Medium,
    High,
}

impl ComfortLevel {
    /// All levels in class-index order.
    pub const ALL: [ComfortLevel; 3] = [ComfortLevel::Low, ComfortLevel::Medium, ComfortLevel::High];

    /// Class index used by the comfort classifier (Low=0, Medium=1, High=2).
    pub fn class_index(self) -> usize {
        match self {
            ComfortLevel::Low => 0,
            ComfortLevel::Medium => 1,
            ComfortLevel::High => 2,
        }
    }

    pub fn from_class_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(ComfortLevel::Low),
            1 => Some(ComfortLevel::Medium),
            2 => Some(ComfortLevel::High),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComfortLevel::Low => "Low",
            ComfortLevel::Medium => "Medium",
            ComfortLevel::High => "High",
        }
    }
}

impl fmt::Display for ComfortLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One reading of the seven input features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub visibility: f64,
    pub clouds: f64,
    pub pressure: f64,
    pub rain_1h: f64,
}

impl WeatherObservation {
    /// Feature values in canonical schema order.
    pub fn as_row(&self) -> [f64; 7] {
        [
            self.temperature,
            self.humidity,
            self.wind_speed,
            self.visibility,
            self.clouds,
            self.pressure,
            self.rain_1h,
        ]
    }
}

/// One labeled training sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub observation: WeatherObservation,
    pub will_rain: bool,
    pub comfort: ComfortLevel,
}

/// Ordered collection of labeled samples.
///
/// Insertion order is preserved so that a seeded train/eval split is
/// reproducible across runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    samples: Vec<TrainingSample>,
}

impl Dataset {
    pub fn new(samples: Vec<TrainingSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[TrainingSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Feature matrix in canonical schema order, one row per sample.
    pub fn feature_matrix(&self) -> Array2<f64> {
        let mut x = Array2::zeros((self.samples.len(), FEATURE_NAMES.len()));
        for (i, sample) in self.samples.iter().enumerate() {
            for (j, value) in sample.observation.as_row().into_iter().enumerate() {
                x[[i, j]] = value;
            }
        }
        x
    }

    /// Binary rain labels (0 = no rain, 1 = rain), aligned with the matrix rows.
    pub fn rain_labels(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.will_rain as usize).collect()
    }

    /// Comfort class labels, aligned with the matrix rows.
    pub fn comfort_labels(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.comfort.class_index()).collect()
    }

    /// Convert to a DataFrame with the seven feature columns followed by
    /// `will_rain` and `comfort_level` target columns.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let n = self.samples.len();
        let mut feature_cols: Vec<Vec<f64>> = vec![Vec::with_capacity(n); FEATURE_NAMES.len()];
        let mut rain: Vec<i64> = Vec::with_capacity(n);
        let mut comfort: Vec<i64> = Vec::with_capacity(n);

        for sample in &self.samples {
            for (j, value) in sample.observation.as_row().into_iter().enumerate() {
                feature_cols[j].push(value);
            }
            rain.push(sample.will_rain as i64);
            comfort.push(sample.comfort.class_index() as i64);
        }

        let mut columns: Vec<Column> = FEATURE_NAMES
            .iter()
            .zip(feature_cols)
            .map(|(name, values)| Column::new((*name).into(), values))
            .collect();
        columns.push(Column::new("will_rain".into(), rain));
        columns.push(Column::new("comfort_level".into(), comfort));

        DataFrame::new(columns).map_err(|e| SkycastError::DataError(e.to_string()))
    }

    /// Rebuild a dataset from a DataFrame.
    ///
    /// Fails with [`SkycastError::DataError`] when a required column is
    /// absent or contains nulls.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let features: Vec<Vec<f64>> = FEATURE_NAMES
            .iter()
            .map(|&name| float_column(df, name))
            .collect::<Result<_>>()?;
        let rain = int_column(df, "will_rain")?;
        let comfort = int_column(df, "comfort_level")?;

        let mut samples = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let will_rain = match rain[i] {
                0 => false,
                1 => true,
                other => {
                    return Err(SkycastError::DataError(format!(
                        "invalid will_rain value {other} at row {i}"
                    )))
                }
            };
            let comfort = ComfortLevel::from_class_index(comfort[i] as usize).ok_or_else(|| {
                SkycastError::DataError(format!(
                    "invalid comfort_level value {} at row {i}",
                    comfort[i]
                ))
            })?;

            samples.push(TrainingSample {
                observation: WeatherObservation {
                    temperature: features[0][i],
                    humidity: features[1][i],
                    wind_speed: features[2][i],
                    visibility: features[3][i],
                    clouds: features[4][i],
                    pressure: features[5][i],
                    rain_1h: features[6][i],
                },
                will_rain,
                comfort,
            });
        }

        Ok(Self { samples })
    }

    /// Save as CSV.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut df = self.to_dataframe()?;
        let mut file = File::create(path.as_ref())?;
        CsvWriter::new(&mut file)
            .finish(&mut df)
            .map_err(|e| SkycastError::DataError(e.to_string()))
    }

    /// Load from CSV.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| SkycastError::DataError(e.to_string()))?;
        Self::from_dataframe(&df)
    }
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)
        .map_err(|_| SkycastError::DataError(format!("missing required column: {name}")))?
        .as_materialized_series()
        .clone();
    let series = series
        .cast(&DataType::Float64)
        .map_err(|e| SkycastError::DataError(format!("column {name}: {e}")))?;
    let ca = series
        .f64()
        .map_err(|e| SkycastError::DataError(format!("column {name}: {e}")))?;
    if ca.null_count() > 0 {
        return Err(SkycastError::DataError(format!(
            "column {name} contains {} null values",
            ca.null_count()
        )));
    }
    Ok(ca.into_no_null_iter().collect())
}

fn int_column(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    let series = df
        .column(name)
        .map_err(|_| SkycastError::DataError(format!("missing required column: {name}")))?
        .as_materialized_series()
        .clone();
    let series = series
        .cast(&DataType::Int64)
        .map_err(|e| SkycastError::DataError(format!("column {name}: {e}")))?;
    let ca = series
        .i64()
        .map_err(|e| SkycastError::DataError(format!("column {name}: {e}")))?;
    if ca.null_count() > 0 {
        return Err(SkycastError::DataError(format!(
            "column {name} contains {} null values",
            ca.null_count()
        )));
    }
    Ok(ca.into_no_null_iter().collect())
}
