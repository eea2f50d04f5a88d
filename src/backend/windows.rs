//! # Windows backend
//!
//! Session on a share mounted through the Windows network provider, accessed by UNC paths

use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;

use remotefs::fs::{FileType, Metadata};
use remotefs::{File, RemoteError, RemoteErrorType, RemoteResult};

use super::{probe_server, Connector, Session};
use crate::config::{ShareCredentials, ShareOptions};
use crate::utils::path as path_utils;

mod connection;

use connection::NetConnection;

/// Connector adding a network connection to the share
#[derive(Debug, Default, Clone)]
pub struct SmbConnector {
    options: ShareOptions,
}

impl SmbConnector {
    pub fn new(options: ShareOptions) -> Self {
        Self { options }
    }
}

impl Connector for SmbConnector {
    type Session = SmbSession;

    fn connect(&self, credentials: &ShareCredentials) -> RemoteResult<SmbSession> {
        probe_server(
            &credentials.server,
            self.options.port,
            self.options.connect_timeout,
        )?;
        let root = format!(r"\\{}\{}", credentials.server_host(), credentials.share);
        debug!("adding network connection to {}", root);
        let connection = NetConnection::add(&root, &credentials.username, &credentials.password)
            .map_err(|e| {
                error!("could not connect to {}: {}", root, e);
                RemoteError::new_ex(RemoteErrorType::ConnectionError, e)
            })?;
        Ok(SmbSession {
            root,
            _connection: connection,
        })
    }
}

/// Session on a share accessed by UNC paths
pub struct SmbSession {
    root: String,
    _connection: NetConnection,
}

impl SmbSession {
    fn unc_path(&self, path: &str) -> PathBuf {
        let relative = path.trim_matches('/').replace('/', "\\");
        if relative.is_empty() {
            PathBuf::from(format!(r"{}\", self.root))
        } else {
            PathBuf::from(format!(r"{}\{}", self.root, relative))
        }
    }
}

impl Session for SmbSession {
    fn stat(&mut self, path: &str) -> RemoteResult<File> {
        trace!("get stat for {}", path);
        let metadata = fs::metadata(self.unc_path(path))
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::StatFailed, e))?;
        let mut meta = match metadata.is_dir() {
            true => Metadata::default().file_type(FileType::Directory),
            false => Metadata::default()
                .file_type(FileType::File)
                .size(metadata.len()),
        };
        if let Ok(modified) = metadata.modified() {
            meta = meta.modified(modified);
        }
        Ok(File {
            path: PathBuf::from(path),
            metadata: meta,
        })
    }

    fn list_dir(&mut self, path: &str) -> RemoteResult<Vec<RemoteResult<File>>> {
        trace!("listing files at {}", path);
        let entries = fs::read_dir(self.unc_path(path))
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::StatFailed, e))?;
        Ok(entries
            .map(|entry| match entry {
                Ok(entry) => {
                    let child = path_utils::join(path, &entry.file_name().to_string_lossy());
                    self.stat(&child)
                }
                Err(e) => Err(RemoteError::new_ex(RemoteErrorType::StatFailed, e)),
            })
            .collect())
    }

    fn create_dir(&mut self, path: &str) -> RemoteResult<()> {
        trace!("making directory at {}", path);
        fs::create_dir(self.unc_path(path))
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::FileCreateDenied, e))
    }

    fn open(&mut self, path: &str) -> RemoteResult<Box<dyn Read + '_>> {
        trace!("opening file at {} for read", path);
        let file = fs::File::open(self.unc_path(path))
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::CouldNotOpenFile, e))?;
        Ok(Box::new(file))
    }

    fn create(&mut self, path: &str) -> RemoteResult<Box<dyn Write + '_>> {
        trace!("creating file at {}", path);
        let file = fs::File::create(self.unc_path(path))
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::CouldNotOpenFile, e))?;
        Ok(Box::new(file))
    }
}
