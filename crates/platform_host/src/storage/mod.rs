//! Persistence capabilities.

pub mod prefs;
