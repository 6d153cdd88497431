pub mod aggregate;
pub mod dimension;
pub mod sale;

pub use aggregate::*;
pub use dimension::*;
pub use sale::*;
