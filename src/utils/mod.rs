//! # utils
//!
//! Utilities for the share client

pub mod fmt;
pub mod path;
#[cfg(target_family = "unix")]
pub(crate) mod smb;
