//! Integration test suite for tandem.
//!
//! These tests drive the engine through the public API against an
//! in-memory store, including fault-injecting store wrappers.
//!
//! # Test Categories
//!
//! - `scenario`: end-to-end dependency, blocking and cascade flows
//! - `assignment`: workload scoring and move validation against a project
//! - `concurrency`: racing inserts and store failure propagation
//! - `properties`: generated edge sequences keep the graph acyclic


mod assignment;
mod scenario;
