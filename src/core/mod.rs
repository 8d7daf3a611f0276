//! core
//!
//! Core domain types, configuration and naming for codo.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ImageName
//! - [`naming`] - Image reference naming scheme
//! - [`config`] - Configuration schema, loading and resolution
//! - [`paths`] - Centralized path routing for codo storage
//!
//! Nothing in this module talks to the container engine.

pub mod config;
pub mod naming;
pub mod paths;
pub mod types;
