#![crate_name = "smb_share"]
#![crate_type = "lib"]

//! # smb-share
//!
//! smb-share is a client for a single SMB share, providing what a media browser
//! needs: directory listing, whole and partial (preview) downloads, uploads and
//! folder creation.
//!
//! ## Get started
//!
//! ```toml
//! smb-share = "^0.1"
//! ```
//!
//! these features are supported:
//!
//! - `no-log`: disable logging. By default, this library will log via the `log` crate.
//!
//! ### Share client
//!
//! ```rust,no_run
//! use smb_share::{ShareClient, ShareCredentials};
//! use std::io::Cursor;
//!
//! let mut client = ShareClient::new(
//!     ShareCredentials::new("192.168.1.10", "pi", "secret").share("Photos"),
//! );
//!
//! // probe the share
//! assert!(client.test_connection());
//! // list share root: directories first, then files
//! for entry in client.list_files("") {
//!     println!("{} ({} bytes)", entry.name(), entry.size());
//! }
//! // upload a file, creating the destination folder
//! client
//!     .upload_file(Cursor::new(b"hello"), "hello.txt", "2024/2024-06-01")
//!     .unwrap();
//! // read it back
//! let data = client.download_file("2024/2024-06-01/hello.txt").unwrap();
//! assert_eq!(data.as_slice(), b"hello");
//! ```
//!
//! Read operations never fail: errors collapse to an empty list, `None` or `false`
//! and are reported through the logger. Uploads return their error.
//!

// -- crates
#[macro_use]
extern crate log;

mod backend;
mod client;
mod config;
mod entry;
mod upload;

pub use backend::{Connector, Session, SmbConnector};
pub use client::{ShareClient, DEFAULT_PREVIEW_BYTES, LARGE_FILE_THRESHOLD};
pub use config::{
    ShareCredentials, ShareOptions, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT, DEFAULT_RESPONSE_TIMEOUT,
    DEFAULT_SHARE_NAME, DEFAULT_WORKGROUP,
};
pub use entry::{DirectoryEntry, MediaKind};
pub use upload::{
    dated_folder, today_folder, upload_batch, CancelToken, UploadItem, UploadProgress,
    UploadReport, UploadStage,
};
pub use utils::fmt::fmt_size;
pub use utils::path::is_valid_folder_name;

// -- utils
pub(crate) mod utils;
// -- mock
#[cfg(test)]
pub(crate) mod mock;
