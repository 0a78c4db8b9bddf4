//! Convey Units - Quantities over a user-defined conversion graph
//!
//! Units are opaque names. Conversions come from rules such as
//! `1 hour = 60 min`, each stored as a pair of directed edges. Quantities
//! in units with no direct rule are converted along a discovered chain:
//! `1[day]` reaches `sec` through `hour` and `min`.
//!
//! There is no dimension checking. Any two units are compatible exactly
//! when the graph links them.

mod error;
mod registry;
mod path;
mod quantity;
mod ops;
mod parse;
mod rules;

pub use error::{UnitError, Result, codes};
pub use registry::ConversionRegistry;
pub use path::find_path;
pub use quantity::{Quantity, EPSILON};
pub use ops::Measure;
pub use parse::{parse_quantity, parse_quantities};
pub use rules::{Rule, parse_rule};
