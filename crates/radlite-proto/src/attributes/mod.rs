pub mod attribute;
pub mod standard;

pub use attribute::{Attribute, Value};
