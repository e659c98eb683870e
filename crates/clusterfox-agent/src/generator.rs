// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synthetic field values for simulated sensor modules

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A single synthesized reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorValue {
    Integer(i64),
    Float(f64),
}

impl SensorValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            SensorValue::Integer(v) => v as f64,
            SensorValue::Float(v) => v,
        }
    }
}

impl std::fmt::Display for SensorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorValue::Integer(v) => write!(f, "{}", v),
            SensorValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Value category a field name maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
    Temperature,
    Humidity,
    Pressure,
    Light,
    Co2,
    Motion,
    Distance,
    Voltage,
    Current,
    Power,
    SoilMoisture,
    Ph,
    Generic,
}

impl FieldCategory {
    /// Match on the lowercase field name
    pub fn from_name(field: &str) -> Self {
        match field.to_ascii_lowercase().as_str() {
            "temp" | "temperature" => FieldCategory::Temperature,
            "humi" | "humidity" => FieldCategory::Humidity,
            "pressure" => FieldCategory::Pressure,
            "light" | "lux" => FieldCategory::Light,
            "co2" => FieldCategory::Co2,
            "motion" | "pir" => FieldCategory::Motion,
            "distance" => FieldCategory::Distance,
            "voltage" => FieldCategory::Voltage,
            "current" => FieldCategory::Current,
            "power" => FieldCategory::Power,
            "soil_moisture" => FieldCategory::SoilMoisture,
            "ph" => FieldCategory::Ph,
            _ => FieldCategory::Generic,
        }
    }

    /// Inclusive value range
    pub fn range(&self) -> (f64, f64) {
        match self {
            FieldCategory::Temperature => (15.0, 35.0),
            FieldCategory::Humidity => (30.0, 80.0),
            FieldCategory::Pressure => (980.0, 1020.0),
            FieldCategory::Light => (0.0, 1000.0),
            FieldCategory::Co2 => (400.0, 2000.0),
            FieldCategory::Motion => (0.0, 1.0),
            FieldCategory::Distance => (0.0, 400.0),
            FieldCategory::Voltage => (3.0, 5.0),
            FieldCategory::Current => (0.0, 5.0),
            FieldCategory::Power => (0.0, 100.0),
            FieldCategory::SoilMoisture => (0.0, 100.0),
            FieldCategory::Ph => (0.0, 14.0),
            FieldCategory::Generic => (0.0, 100.0),
        }
    }

    /// Decimal places kept; `None` for integer categories
    pub fn decimals(&self) -> Option<u32> {
        match self {
            FieldCategory::Co2 | FieldCategory::Motion => None,
            FieldCategory::Light | FieldCategory::Distance | FieldCategory::SoilMoisture => {
                Some(1)
            }
            FieldCategory::Current => Some(3),
            _ => Some(2),
        }
    }

    /// Draw one value for this category
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SensorValue {
        let (lo, hi) = self.range();
        match self.decimals() {
            None => SensorValue::Integer(rng.gen_range(lo as i64..=hi as i64)),
            Some(places) => SensorValue::Float(round_to(rng.gen_range(lo..=hi), places)),
        }
    }
}

/// Synthesize a value for a named field
pub fn generate_value<R: Rng + ?Sized>(field: &str, rng: &mut R) -> SensorValue {
    FieldCategory::from_name(field).sample(rng)
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
