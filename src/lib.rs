//! Schema compiler: declarative data-shape documents in, typed declarations
//! plus runtime validating extractors out.
//!
//! Pipeline: raw schema document → `normalize` (validate, canonicalize map
//! order, split required/optional fields) → `codegen` (per-declaration
//! declaration + extractor emission with runtime-primitive dependency
//! tracking) → `assemble` (module text with a minimal import preamble).
//!
//! Design goals:
//! - Deterministic output: every unordered map is sorted before iteration,
//!   so equivalent documents compile byte-identically.
//! - Fail-fast errors in both domains: one schema violation aborts a
//!   compile; one extraction failure aborts a generated extractor run.
//! - The core is pure and synchronous; all I/O lives in `cli`.

pub mod assemble;
pub mod ast;
pub mod cli;
pub mod codegen;
pub mod naming;
pub mod normalize;
pub mod path_de;
pub mod templates;
