// src/semantics.rs
//! Evaluation of Go constant blocks: literal conversion, counter arithmetic,
//! per-block walking and collection of one enum type's entries.

pub mod collector;
pub mod const_walker;
pub mod counter_expr;
pub mod literal;
pub mod type_resolver;
