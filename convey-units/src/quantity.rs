//! Quantity type - a value with an associated unit name

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Mul, Neg};
use serde::Serialize;
use tracing::trace;
use crate::error::{Result, UnitError};
use crate::path::find_path;
use crate::ConversionRegistry;

/// Absolute tolerance used by [`Quantity::approx_eq`]
///
/// Chained multiplicative conversions drift, so equality is never exact.
pub const EPSILON: f64 = 0.001;

/// A numeric value tagged with a registered unit
///
/// Only serialized, never deserialized: every quantity is built against a
/// registry that knows its unit.
#[derive(Debug, Clone, Serialize)]
pub struct Quantity {
    value: f64,
    unit: String,
}

impl Quantity {
    /// Create a new quantity, failing if the unit is not registered
    pub fn new(value: impl Into<f64>, unit: &str, registry: &ConversionRegistry) -> Result<Self> {
        ensure_unit(registry, unit)?;
        Ok(Quantity { value: value.into(), unit: unit.to_string() })
    }

    /// Same unit, new value. The unit is already known to be valid.
    fn with_value(&self, value: f64) -> Self {
        Quantity { value, unit: self.unit.clone() }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Convert to another unit
    ///
    /// A direct edge is used when present, otherwise the value is carried
    /// hop by hop along a discovered path.
    pub fn convert_to(&self, target: &str, registry: &ConversionRegistry) -> Result<Quantity> {
        ensure_unit(registry, &self.unit)?;
        if self.unit == target {
            return Ok(self.clone());
        }
        ensure_unit(registry, target)?;

        if let Some(factor) = registry.direct_factor(&self.unit, target) {
            return Ok(Quantity { value: self.value * factor, unit: target.to_string() });
        }

        let path = find_path(registry, &self.unit, target)
            .ok_or_else(|| UnitError::no_path(&self.unit, target))?;

        let mut current = self.clone();
        for next in &path[1..] {
            // Every hop in a discovered path has a direct edge
            let factor = registry.direct_factor(&current.unit, next)
                .ok_or_else(|| UnitError::no_path(&current.unit, next.as_str()))?;
            trace!(from = %current.unit, to = %next, factor, "conversion hop");
            current = Quantity { value: current.value * factor, unit: next.clone() };
        }
        Ok(current)
    }

    /// Value of `other` expressed in this quantity's unit
    fn converted_value(&self, other: &Quantity, registry: &ConversionRegistry) -> Result<f64> {
        Ok(other.convert_to(&self.unit, registry)?.value)
    }

    /// Sum in this quantity's unit
    pub fn add(&self, other: &Quantity, registry: &ConversionRegistry) -> Result<Quantity> {
        let rhs = self.converted_value(other, registry)?;
        Ok(self.with_value(self.value + rhs))
    }

    /// Difference in this quantity's unit
    pub fn sub(&self, other: &Quantity, registry: &ConversionRegistry) -> Result<Quantity> {
        let rhs = self.converted_value(other, registry)?;
        Ok(self.with_value(self.value - rhs))
    }

    /// In-place `+=`. Left untouched on error.
    pub fn add_assign(&mut self, other: &Quantity, registry: &ConversionRegistry) -> Result<()> {
        self.value += self.converted_value(other, registry)?;
        Ok(())
    }

    /// In-place `-=`. Left untouched on error.
    pub fn sub_assign(&mut self, other: &Quantity, registry: &ConversionRegistry) -> Result<()> {
        self.value -= self.converted_value(other, registry)?;
        Ok(())
    }

    /// Equality within [`EPSILON`] after converting `other`
    pub fn approx_eq(&self, other: &Quantity, registry: &ConversionRegistry) -> Result<bool> {
        let rhs = self.converted_value(other, registry)?;
        Ok((self.value - rhs).abs() < EPSILON)
    }

    /// Negation of [`approx_eq`](Self::approx_eq)
    pub fn differs(&self, other: &Quantity, registry: &ConversionRegistry) -> Result<bool> {
        self.approx_eq(other, registry).map(|eq| !eq)
    }

    /// Order by value after converting `other` into this unit
    pub fn compare(&self, other: &Quantity, registry: &ConversionRegistry) -> Result<Ordering> {
        let rhs = self.converted_value(other, registry)?;
        Ok(self.value.total_cmp(&rhs))
    }

    pub fn lt(&self, other: &Quantity, registry: &ConversionRegistry) -> Result<bool> {
        Ok(self.value < self.converted_value(other, registry)?)
    }

    pub fn le(&self, other: &Quantity, registry: &ConversionRegistry) -> Result<bool> {
        Ok(self.value <= self.converted_value(other, registry)?)
    }

    pub fn gt(&self, other: &Quantity, registry: &ConversionRegistry) -> Result<bool> {
        Ok(self.value > self.converted_value(other, registry)?)
    }

    pub fn ge(&self, other: &Quantity, registry: &ConversionRegistry) -> Result<bool> {
        Ok(self.value >= self.converted_value(other, registry)?)
    }

    /// Unary plus
    pub fn pos(&self) -> Quantity {
        self.clone()
    }

    /// Prefix increment: add exactly 1 in the current unit
    pub fn increment(&mut self) -> &mut Self {
        self.value += 1.0;
        self
    }

    /// Prefix decrement
    pub fn decrement(&mut self) -> &mut Self {
        self.value -= 1.0;
        self
    }

    /// Postfix increment: returns the value held before the step
    pub fn post_increment(&mut self) -> Quantity {
        let before = self.clone();
        self.value += 1.0;
        before
    }

    /// Postfix decrement
    pub fn post_decrement(&mut self) -> Quantity {
        let before = self.clone();
        self.value -= 1.0;
        before
    }
}

fn ensure_unit(registry: &ConversionRegistry, unit: &str) -> Result<()> {
    if registry.has_unit(unit) {
        Ok(())
    } else {
        Err(UnitError::unknown_unit(unit))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.value, self.unit)
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity { value: -self.value, unit: self.unit }
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, factor: f64) -> Quantity {
        Quantity { value: self.value * factor, unit: self.unit }
    }
}

impl Mul<i32> for Quantity {
    type Output = Quantity;

    fn mul(self, factor: i32) -> Quantity {
        self * f64::from(factor)
    }
}

impl Mul<Quantity> for f64 {
    type Output = Quantity;

    fn mul(self, q: Quantity) -> Quantity {
        q * self
    }
}

impl Mul<Quantity> for i32 {
    type Output = Quantity;

    fn mul(self, q: Quantity) -> Quantity {
        q * f64::from(self)
    }
}
