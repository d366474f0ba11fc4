use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Region name used by the host for the national aggregate
pub const TOTAL_REGION: &str = "total";

/// A geographic ring (sequence of lon/lat coordinates)
pub type Ring = Vec<(f64, f64)>;

/// Static boundary of one federal state.
/// Each polygon is a list of rings; the first is the exterior, the rest are holes.
#[derive(Clone, Debug)]
pub struct RegionShape {
    pub name: String,
    pub polygons: Vec<Vec<Ring>>,
}

impl RegionShape {
    pub fn new(name: impl Into<String>, polygons: Vec<Vec<Ring>>) -> Self {
        Self {
            name: name.into(),
            polygons,
        }
    }
}

/// One observation for one region
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DataPoint {
    #[serde(rename = "Bundesland")]
    pub region: String,
    pub parameter: String,
    /// Raw estimate; `null` counts as missing
    #[serde(default)]
    pub est: Option<f64>,
    /// Pre-formatted estimate shown in tooltips
    #[serde(default)]
    pub est_print: Option<String>,
}

impl DataPoint {
    pub fn is_total(&self) -> bool {
        self.region == TOTAL_REGION
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    /// Clamp a value into the range, tolerating inverted bounds
    pub fn clamp(&self, value: f64) -> f64 {
        let lo = self.min.min(self.max);
        let hi = self.min.max(self.max);
        value.clamp(lo, hi)
    }
}

/// Settings for one parameter
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ParameterConfig {
    pub range: Range,
    pub label: String,
    #[serde(default)]
    pub reverse: bool,
}

/// Configuration object delivered alongside the data
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct MapConfig {
    #[serde(default)]
    pub na_label: Option<String>,
    #[serde(default)]
    pub total_label: Option<String>,
    #[serde(default)]
    pub parameter: HashMap<String, ParameterConfig>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
}

impl Language {
    pub fn toggle(self) -> Self {
        match self {
            Language::De => Language::En,
            Language::En => Language::De,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }
}

/// The unit of work pushed by the host on every render
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RenderPayload {
    #[serde(default)]
    pub data: Vec<DataPoint>,
    #[serde(default)]
    pub config: MapConfig,
    #[serde(default)]
    pub lang: Option<Language>,
}

impl RenderPayload {
    /// Parameter id of the payload, taken from its first data point
    pub fn active_parameter(&self) -> Option<&str> {
        self.data.first().map(|d| d.parameter.as_str())
    }

    pub fn language(&self) -> Language {
        self.lang.unwrap_or_default()
    }

    /// First data point for a region, if any
    pub fn find(&self, region: &str) -> Option<&DataPoint> {
        self.data.iter().find(|d| d.region == region)
    }

    pub fn total(&self) -> Option<&DataPoint> {
        self.data.iter().find(|d| d.is_total())
    }
}

/// Decode a payload file holding either one payload object or an array of them
pub fn parse_payloads(bytes: &mut [u8]) -> Result<Vec<RenderPayload>> {
    let is_array = bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'[');

    if is_array {
        simd_json::serde::from_slice(bytes).context("Failed to decode payload array")
    } else {
        let payload: RenderPayload =
            simd_json::serde::from_slice(bytes).context("Failed to decode payload")?;
        Ok(vec![payload])
    }
}
