//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for collaborators outside the process, currently image storage.

pub mod storage;
