//! Integration tests for Lumen-Sweep
//!
//! These tests use wiremock to serve a small site and `sh -c` scripts in
//! place of the audit tool, and run full sweeps end-to-end.

mod discovery_tests;
mod sweep_tests;
