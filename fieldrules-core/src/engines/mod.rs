// fieldrules-core/src/engines/mod.rs
//! The two per-document engines.
//!
//! * `allow_disallow`: decides whether a document is indexed at all.
//! * `transform`: rewrites field values of accepted documents.
//!
//! Both are built from a compiled `RuleSet`, hold only immutable rules and can
//! be shared freely between threads.
//!
//! # License
//! MIT OR APACHE 2.0

pub mod allow_disallow;
pub mod transform;
