//! Unit tests for svcman CLI
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod architecture;
mod install;
mod mocks;
mod property_tests;
