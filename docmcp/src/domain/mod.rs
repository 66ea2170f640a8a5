// Domain layer module
pub mod base;
pub mod value_objects;

pub use base::*;
pub use value_objects::*;
