//! Shared building blocks for the gnidump workspace.
//!
//! This crate holds what every other member needs: the row models for the
//! target tables, the GlobalNames UUIDv5 helper, the configuration struct
//! with its builder, and a couple of small string utilities used while
//! scrubbing CSV input.

mod config;
mod error;
pub mod model;
mod strings;
mod uuid5;

pub use config::{Config, ConfigBuilder, ConfigFile};
pub use error::{Error, Result};
pub use strings::{scrub_nul, scrub_one_line, short_title};
pub use uuid5::{gn_uuid, GN_NAMESPACE};
