//! Testing utilities
//!
//!     Tools shared by unit tests and the integration tests under `tests/`.
//!
//! Rule 1: Use Fixtures for Documents
//!
//!     Block markup is easy to get slightly wrong: a missing space before `-->`, a
//!     namespace typo, a closer that does not match. A test written against such a
//!     string silently tests the recovery path instead of the one it names. Whole
//!     documents therefore come from [Fixtures], which are checked once and shared.
//!     Short inline strings are fine for tests about the grammar itself.
//!
//! Rule 2: Assert Blocks Fluently
//!
//!     Use [assert_blocks] instead of indexing into `inner_blocks` by hand. Failures
//!     name the path of the offending block:
//!
//!     ```rust,ignore
//!     let blocks = parse(&Fixtures::source("nested-group"), &sample_registry());
//!     assert_blocks(&blocks).count(1).block(0, |group| {
//!         group.name("core/group").valid().child(0, |p| {
//!             p.name("core/paragraph").attribute("content", json!("One"));
//!         });
//!     });
//!     ```
//!
//! Rule 3: Use the Sample Registry
//!
//!     [sample_registry] defines the block types fixtures are written for, including a
//!     paragraph with two deprecated versions.

mod block_assertions;
pub mod fixtures;
mod matchers;
pub mod registries;

pub use block_assertions::{assert_blocks, BlockAssertion, BlocksAssertion};
pub use fixtures::{fixture_path, Fixtures};
pub use matchers::TextMatch;
pub use registries::sample_registry;
