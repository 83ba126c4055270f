//! Shared fixtures for the unit and integration suites.

#![allow(dead_code)]


#[allow(unused_imports)]
pub use constants::*;
#[allow(unused_imports)]
pub use factories::*;
