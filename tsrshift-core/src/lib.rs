//! Core models for tsrshift.
//!
//! Genomic regions, per-position TSS counts and named sample groups, plus
//! readers for the tab-separated count tables an upstream clustering step
//! produces.

pub mod errors;
pub mod models;
pub mod utils;
