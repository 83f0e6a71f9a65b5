//! # Trustlog Testkit
//!
//! Testing utilities for trustlog.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: Helper structs for setting up logs and key material
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use trustlog_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::with_seed(1);
//! let (batch, signature) = fixture.signed_batch("doc1", "s1", &[r#"{"a":1}"#]);
//! assert_eq!(batch.len(), 1);
//! # let _ = signature;
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{two_parties, TestFixture};
