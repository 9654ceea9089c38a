//! Shared infrastructure of the test suite.
pub mod mocks;
