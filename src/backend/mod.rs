//! # backend
//!
//! Protocol backends a share client runs on.
//!
//! A [`Connector`] builds an authenticated [`Session`]; the session exposes the
//! primitive operations on paths relative to the share root (e.g. `/2024/a.jpg`).

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use remotefs::{File, RemoteError, RemoteErrorType, RemoteResult};

use crate::config::ShareCredentials;

// -- unix backend

#[cfg(target_family = "unix")]
mod unix;
#[cfg(target_family = "unix")]
pub use unix::SmbConnector;

// -- windows backend

#[cfg(target_family = "windows")]
mod windows;
#[cfg(target_family = "windows")]
pub use windows::SmbConnector;

/// Builds protocol sessions for a share
pub trait Connector {
    type Session: Session;

    /// Negotiate and authenticate a new session with the share described by `credentials`
    fn connect(&self, credentials: &ShareCredentials) -> RemoteResult<Self::Session>;
}

/// An authenticated session on a single share
pub trait Session {
    /// Get metadata for the entry at `path`
    fn stat(&mut self, path: &str) -> RemoteResult<File>;

    /// List the immediate children of `path`.
    ///
    /// Each child carries its own result, so that a single unreadable entry
    /// doesn't fail the whole listing.
    fn list_dir(&mut self, path: &str) -> RemoteResult<Vec<RemoteResult<File>>>;

    /// Create a single directory at `path`; its parent must exist
    fn create_dir(&mut self, path: &str) -> RemoteResult<()>;

    /// Open the file at `path` for read
    fn open(&mut self, path: &str) -> RemoteResult<Box<dyn Read + '_>>;

    /// Create or truncate the file at `path` and open it for write
    fn create(&mut self, path: &str) -> RemoteResult<Box<dyn Write + '_>>;

    /// Tell whether an entry exists at `path`
    fn exists(&mut self, path: &str) -> RemoteResult<bool> {
        trace!("checking if {} exists...", path);
        match self.stat(path) {
            Ok(_) => Ok(true),
            Err(err) if err.kind == RemoteErrorType::StatFailed => {
                debug!("{} is not accessible: {}", path, err);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

/// Resolve `server` (either `host` or `host:port`) through the system resolver
/// and open a TCP connection within `timeout`.
///
/// Returns the address which accepted the connection.
pub(crate) fn probe_server(server: &str, port: u16, timeout: Duration) -> RemoteResult<SocketAddr> {
    let addrs: Vec<SocketAddr> = match server.to_socket_addrs() {
        Ok(addrs) => addrs.collect(),
        Err(_) => (server, port)
            .to_socket_addrs()
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::BadAddress, e))?
            .collect(),
    };
    if addrs.is_empty() {
        error!("could not resolve {}", server);
        return Err(RemoteError::new_ex(
            RemoteErrorType::BadAddress,
            format!("could not resolve {server}"),
        ));
    }
    let mut last_err = None;
    for addr in addrs {
        trace!("probing {} (timeout {:?})", addr, timeout);
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(_) => {
                debug!("server {} is reachable at {}", server, addr);
                return Ok(addr);
            }
            Err(err) => {
                debug!("could not reach {}: {}", addr, err);
                last_err = Some(err);
            }
        }
    }
    let err = last_err.map(|e| e.to_string()).unwrap_or_default();
    error!("server {} is unreachable: {}", server, err);
    Err(RemoteError::new_ex(RemoteErrorType::ConnectionError, err))
}
