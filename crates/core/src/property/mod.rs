//! Property registry and ownership.

mod registry;
mod types;

pub use registry::PropertyRegistry;
pub use types::{PropertyDetails, PropertyRecord};
