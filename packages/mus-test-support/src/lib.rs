//! Test support shared by the Mus crates' integration tests.

pub mod logging;
