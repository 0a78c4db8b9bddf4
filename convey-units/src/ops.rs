//! Operator syntax for quantities bound to a registry
//!
//! Cross-unit operators need the conversion graph, which plain
//! [`Quantity`] does not carry. [`Measure`] pairs a quantity with a
//! borrowed registry so `+`, `-`, `==` and `<` work directly.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Mul, Neg, Sub};
use crate::error::Result;
use crate::{ConversionRegistry, Quantity};

/// A quantity together with the registry used to convert it
///
/// Binary operators convert with the left operand's registry; both sides
/// must be bound to the same one. Through `Deref`, method calls such as
/// `lt` resolve to the operator traits. Use [`quantity`](Self::quantity)
/// to reach the registry-explicit [`Quantity`] methods.
#[derive(Debug, Clone)]
pub struct Measure<'r> {
    quantity: Quantity,
    registry: &'r ConversionRegistry,
}

impl ConversionRegistry {
    /// Create a registry-bound quantity
    pub fn measure(&self, value: impl Into<f64>, unit: &str) -> Result<Measure<'_>> {
        Ok(Quantity::new(value, unit, self)?.bind(self))
    }
}

impl Quantity {
    pub fn bind(self, registry: &ConversionRegistry) -> Measure<'_> {
        Measure { quantity: self, registry }
    }
}

impl<'r> Measure<'r> {
    pub fn quantity(&self) -> &Quantity {
        &self.quantity
    }

    pub fn into_quantity(self) -> Quantity {
        self.quantity
    }

    pub fn registry(&self) -> &'r ConversionRegistry {
        self.registry
    }

    /// Convert, keeping the binding
    pub fn to(&self, target: &str) -> Result<Measure<'r>> {
        Ok(self.quantity.convert_to(target, self.registry)?.bind(self.registry))
    }

    fn same_registry(&self, other: &Measure<'_>) -> bool {
        std::ptr::eq(self.registry, other.registry)
    }

    fn rebind(&self, quantity: Quantity) -> Measure<'r> {
        Measure { quantity, registry: self.registry }
    }
}

impl Deref for Measure<'_> {
    type Target = Quantity;

    fn deref(&self) -> &Quantity {
        &self.quantity
    }
}

impl fmt::Display for Measure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.quantity, f)
    }
}

impl<'r> Add for Measure<'r> {
    type Output = Result<Measure<'r>>;

    fn add(self, rhs: Measure<'r>) -> Self::Output {
        debug_assert!(self.same_registry(&rhs), "operands bound to different registries");
        let sum = self.quantity.add(&rhs.quantity, self.registry)?;
        Ok(self.rebind(sum))
    }
}

impl<'r> Sub for Measure<'r> {
    type Output = Result<Measure<'r>>;

    fn sub(self, rhs: Measure<'r>) -> Self::Output {
        debug_assert!(self.same_registry(&rhs), "operands bound to different registries");
        let diff = self.quantity.sub(&rhs.quantity, self.registry)?;
        Ok(self.rebind(diff))
    }
}

impl<'r> Neg for Measure<'r> {
    type Output = Measure<'r>;

    fn neg(self) -> Measure<'r> {
        Measure { quantity: -self.quantity, registry: self.registry }
    }
}

impl<'r> Mul<f64> for Measure<'r> {
    type Output = Measure<'r>;

    fn mul(self, factor: f64) -> Measure<'r> {
        Measure { quantity: self.quantity * factor, registry: self.registry }
    }
}

impl<'r> Mul<i32> for Measure<'r> {
    type Output = Measure<'r>;

    fn mul(self, factor: i32) -> Measure<'r> {
        self * f64::from(factor)
    }
}

impl<'r> Mul<Measure<'r>> for f64 {
    type Output = Measure<'r>;

    fn mul(self, m: Measure<'r>) -> Measure<'r> {
        m * self
    }
}

impl<'r> Mul<Measure<'r>> for i32 {
    type Output = Measure<'r>;

    fn mul(self, m: Measure<'r>) -> Measure<'r> {
        m * f64::from(self)
    }
}

/// Tolerant equality; operands with no conversion path are unequal
impl PartialEq for Measure<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.quantity.approx_eq(&other.quantity, self.registry).unwrap_or(false)
    }
}

/// Orders the exact converted values, without the equality tolerance.
/// `None` when the operands cannot be converted into each other.
impl PartialOrd for Measure<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.quantity.compare(&other.quantity, self.registry).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnitError;

    fn registry() -> ConversionRegistry {
        let mut registry = ConversionRegistry::new();
        registry.add_rule("km", "m", 1000.0);
        registry.add_rule("kg", "g", 1000.0);
        registry.add_rule("hour", "min", 60.0);
        registry
    }

    #[test]
    fn test_add_operator() {
        let reg = registry();
        let sum = (reg.measure(1, "km").unwrap() + reg.measure(500, "m").unwrap()).unwrap();
        assert_eq!(sum.unit(), "km");
        assert!((sum.value() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_sub_operator() {
        let reg = registry();
        let diff = (reg.measure(2500, "m").unwrap() - reg.measure(1, "km").unwrap()).unwrap();
        assert_eq!(format!("{}", diff), "1500[m]");
    }

    #[test]
    fn test_operator_error() {
        let reg = registry();
        let err = (reg.measure(1, "km").unwrap() + reg.measure(1, "kg").unwrap()).unwrap_err();
        assert_eq!(err, UnitError::no_path("kg", "km"));
    }

    #[test]
    fn test_equality_operators() {
        let reg = registry();
        let km = reg.measure(1, "km").unwrap();
        assert!(km == reg.measure(1000, "m").unwrap());
        assert!(km != reg.measure(999, "m").unwrap());
        assert!(km != reg.measure(1, "kg").unwrap());
    }

    #[test]
    fn test_ordering_operators() {
        let reg = registry();
        let hour = reg.measure(1, "hour").unwrap();
        let min = reg.measure(61, "min").unwrap();

        assert!(hour < min);
        assert!(min > hour);

        let km = reg.measure(1, "km").unwrap();
        assert!(km <= reg.measure(1000, "m").unwrap());
        assert!(km >= reg.measure(1000, "m").unwrap());

        let kg = reg.measure(1, "kg").unwrap();
        assert_eq!(hour.partial_cmp(&kg), None);
        assert!(!(hour < kg) && !(hour > kg));
    }

    #[test]
    fn test_ordering_ignores_tolerance() {
        let reg = registry();
        let a = reg.measure(1000.0, "m").unwrap();
        let b = reg.measure(1000.0005, "m").unwrap();

        // Equal within tolerance, yet strictly ordered
        assert!(a == b);
        assert!(a < b);
        assert!(b > a);
        assert!(!(a >= b));
        assert_eq!(a < b, a.quantity().lt(b.quantity(), &reg).unwrap());
        assert_eq!(a < b, a.value() < b.value());
    }

    #[test]
    fn test_scalar_and_neg() {
        let reg = registry();
        let m = reg.measure(3, "kg").unwrap();
        assert_eq!((2 * m.clone()).value(), 6.0);
        assert_eq!((m.clone() * 0.5).value(), 1.5);
        assert_eq!((-m).value(), -3.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "different registries")]
    fn test_mixed_registries() {
        let first = registry();
        let second = registry();
        let _ = first.measure(1, "km").unwrap() + second.measure(1, "m").unwrap();
    }

    #[test]
    fn test_to() {
        let reg = registry();
        let g = reg.measure(2.5, "kg").unwrap().to("g").unwrap();
        assert_eq!(g.unit(), "g");
        assert!((g.value() - 2500.0).abs() < 1e-9);
        assert_eq!(g.into_quantity().unit(), "g");
    }
}
