pub mod fakes;

pub use fakes::*;
