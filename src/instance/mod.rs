//! Problem instances.
//!
//! An [`Instance`] is the immutable input of every solver in this crate: a
//! capacity and a list of [`Item`]s with profit, weight, and 1-based index.
//! Construction validates the values and precomputes the profit/weight
//! ratio order used by the bounding and search code.
//!
//! Instances come from the plain text format read by
//! [`Instance::from_lines`] (also [`Instance::load`],
//! [`Instance::from_path`] and `str::parse`) or from the seeded
//! [`InstanceGenerator`].

mod generator;
mod parse;
mod types;

pub use generator::InstanceGenerator;
pub use types::{Instance, Item};
