//! markbook-core — Assessment scoring and grade lifecycle engine.
//!
//! This crate is the scoring core of the markbook assessment suite: it
//! turns rubric level selections into weighted scores, applies late-
//! submission penalties, tracks draft/final grade records across a
//! roster-ordered grading session, and rolls weighted assignment scores up
//! into course grades and class statistics. Import and export adapters
//! (rosters, Excel, HTML/PDF reports) live outside this crate and exchange
//! plain data with it.

pub mod error;
pub mod gradebook;
pub mod model;
pub mod parser;
pub mod report;
pub mod scale;
pub mod scoring;
pub mod session;
pub mod store;
