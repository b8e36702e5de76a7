//! Camera infrastructure module

mod synthetic;

pub use synthetic::SyntheticCamera;
