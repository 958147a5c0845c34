//! Shared configuration, constants and core error types for Kunai.

pub mod config;
pub mod constants;
pub mod error;
