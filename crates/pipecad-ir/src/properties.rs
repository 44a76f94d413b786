//! Open property map carried by every component instance.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::ComponentType;

/// Outer diameter used when an instance sets none (meters).
pub const DEFAULT_OD: f64 = 0.2;

/// Wall thickness used when an instance sets none (meters).
pub const DEFAULT_WALL_THICKNESS: f64 = 0.01;

/// Uniform fitting scale used when an instance sets none.
pub const DEFAULT_RADIUS_SCALE: f64 = 1.0;

/// Material used when an instance sets none.
pub const DEFAULT_MATERIAL: &str = "steel";

/// Semantic attributes of a component (`length`, `od`, `wallThickness`,
/// `radiusScale`, `material`, ...).
///
/// Each type reads the subset it cares about; anything unset falls back to
/// the per-type defaults. Keys are kept sorted so equal maps serialize
/// identically.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, Value>);

impl Properties {
    /// Create an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace a property.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a property, returning its old value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Raw value of a property.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Numeric value of a property, if present and numeric.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// String value of a property, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: &Properties) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Whether no properties are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Effective `length` for `ty`: the instance value, else the type default.
    ///
    /// Returns `None` for types that have no length.
    pub fn length(&self, ty: ComponentType) -> Option<f64> {
        let default = ty.default_length()?;
        Some(self.get_f64("length").unwrap_or(default))
    }

    /// Effective outer diameter.
    pub fn od(&self) -> f64 {
        self.get_f64("od").unwrap_or(DEFAULT_OD)
    }

    /// Effective wall thickness.
    pub fn wall_thickness(&self) -> f64 {
        self.get_f64("wallThickness").unwrap_or(DEFAULT_WALL_THICKNESS)
    }

    /// Effective uniform fitting scale.
    pub fn radius_scale(&self) -> f64 {
        self.get_f64("radiusScale").unwrap_or(DEFAULT_RADIUS_SCALE)
    }

    /// Effective material name.
    pub fn material(&self) -> &str {
        self.get_str("material").unwrap_or(DEFAULT_MATERIAL)
    }
}
