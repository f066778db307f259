//! asmview - compile-to-assembly panel engine
//!
//! Module structure:
//! - core: event bus shared by all panels in a workspace
//! - models: wire and display data types (AsmLine, CompileRequest, FilterSet)
//! - catalog/config: static compiler catalog and workspace configuration
//! - panel: panel state, debounced compile scheduling, colour correlation
//! - hub: panel ownership, id allocation, event pump, response drain
//! - services: ports plus the HTTP transport and layout persistence adapters

pub mod catalog;
pub mod config;
pub mod core;
pub mod hub;
pub mod logging;
pub mod models;
pub mod panel;
pub mod services;
