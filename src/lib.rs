//! Recruitment portal core: identity resolution, document access control,
//! and the candidate placement pipeline shared by the CLI and HTTP service.

pub mod config;
pub mod error;
pub mod infra;
pub mod portal;
pub mod telemetry;
