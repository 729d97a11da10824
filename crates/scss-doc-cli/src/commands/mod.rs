//! Command implementations for the scss-doc CLI
//!
//! Each command returns the JSON it wants printed; `main` owns stdout.

pub mod parse;
pub mod scan;
