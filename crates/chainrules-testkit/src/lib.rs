//! # Chainrules Testkit
//!
//! Testing utilities for chainrules.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known compatibility scenarios and canonical encodings
//!   with their expected outcomes
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helpers for setting up stored/candidate scenarios
//!
//! ## Golden Vectors
//!
//! ```rust
//! use chainrules_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, actual) in verify_all_vectors() {
//!     assert!(matches, "{name}: {actual}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use chainrules_testkit::generators::CompatCase;
//!
//! proptest! {
//!     #[test]
//!     fn rewind_never_above_head(case: CompatCase) {
//!         if let Some(err) = case.stored.check_compatible(&case.candidate, case.head.clone()) {
//!             prop_assert!(err.rewind_to <= case.head);
//!         }
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use chainrules_core::Fork;
//! use chainrules_testkit::fixtures::CompatFixture;
//!
//! let fixture = CompatFixture::staggered().reschedule(Fork::Eip150, Some(35));
//! assert!(fixture.stored.check_compatible(&fixture.candidate, 29u64).is_none());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{config_with, reschedule, write_config_json, CompatFixture};
pub use generators::{chain_config, well_formed_config, CompatCase};
pub use vectors::{all_vectors, encoding_vectors, verify_all_vectors, CompatVector, EncodingVector};
