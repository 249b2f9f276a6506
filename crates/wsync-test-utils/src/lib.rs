//! Shared test utilities for the wsync workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only — never published.
//!
//! # Modules
//!
//! - [`git`] — git repository fixtures at increasing realism levels

pub mod git;
