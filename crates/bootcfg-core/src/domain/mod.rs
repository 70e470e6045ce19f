//! Domain entities for boot-config patching.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer of a Clean Architecture codebase is the **domain**.
//! Domain code has no imports from OS APIs, terminals, or configuration
//! loaders, so it can be compiled and tested anywhere.  The outer layers
//! (the `fix-pi-audio` application and infrastructure modules) read the real
//! file, hand its text to the types defined here, and write back whatever the
//! domain decides.

/// Audio-related settings inspection.
pub mod audio;

/// Backup file naming and parsing.
pub mod backup;

/// Line classification: comment marker and directive matching.
pub mod directive;

/// The line-oriented document model and the fix rule table.
///
/// See [`overlay::plan_fix`] for the main entry point.
pub mod overlay;
