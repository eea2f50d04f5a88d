//! ## Mock
//!
//! Contains mock for test units

use std::collections::{BTreeMap, HashSet};
use std::io::{self, Cursor, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use remotefs::fs::{FileType, Metadata};
use remotefs::{File, RemoteError, RemoteErrorType, RemoteResult};

use crate::backend::{Connector, Session};
use crate::config::ShareCredentials;

// -- logger

#[allow(dead_code)]
pub fn logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// -- in-memory share

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(Vec<u8>),
}

/// In-memory share with failure injection
#[derive(Debug)]
pub struct MemoryShare {
    nodes: BTreeMap<String, Node>,
    /// Amount of sessions opened so far
    pub connects: usize,
    /// Connecting fails
    pub unreachable: bool,
    /// Listing any directory fails
    pub fail_list: bool,
    /// Writing to any file fails
    pub fail_writes: bool,
    /// Paths whose metadata can't be read
    pub broken: HashSet<String>,
}

impl Default for MemoryShare {
    fn default() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Dir);
        Self {
            nodes,
            connects: 0,
            unreachable: false,
            fail_list: false,
            fail_writes: false,
            broken: HashSet::new(),
        }
    }
}

impl MemoryShare {
    /// Get the content of the file at `path`
    pub fn file(&self, path: &str) -> Option<&[u8]> {
        match self.nodes.get(key(path).as_str()) {
            Some(Node::File(data)) => Some(data.as_slice()),
            _ => None,
        }
    }

    pub fn is_dir(&self, path: &str) -> bool {
        matches!(self.nodes.get(key(path).as_str()), Some(Node::Dir))
    }

    fn is_parent_dir(&self, path: &str) -> bool {
        self.is_dir(parent(path).as_str())
    }
}

/// Connector to an in-memory share
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    share: Arc<Mutex<MemoryShare>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory (and its ancestors)
    pub fn with_dir(self, path: &str) -> Self {
        {
            let mut share = self.share();
            for dir in crate::utils::path::ancestors(path) {
                share.nodes.insert(dir, Node::Dir);
            }
        }
        self
    }

    /// Add a file (and its ancestor directories)
    pub fn with_file(self, path: &str, data: &[u8]) -> Self {
        let this = self.with_dir(parent(path).as_str());
        this.share().nodes.insert(key(path), Node::File(data.to_vec()));
        this
    }

    pub fn share(&self) -> MutexGuard<'_, MemoryShare> {
        self.share.lock().unwrap()
    }
}

impl Connector for MemoryConnector {
    type Session = MemorySession;

    fn connect(&self, _credentials: &ShareCredentials) -> RemoteResult<MemorySession> {
        let mut share = self.share();
        if share.unreachable {
            return Err(RemoteError::new_ex(
                RemoteErrorType::ConnectionError,
                "host unreachable",
            ));
        }
        share.connects += 1;
        Ok(MemorySession {
            share: self.share.clone(),
        })
    }
}

pub struct MemorySession {
    share: Arc<Mutex<MemoryShare>>,
}

impl MemorySession {
    fn share(&self) -> RemoteResult<MutexGuard<'_, MemoryShare>> {
        let share = self.share.lock().unwrap();
        if share.unreachable {
            return Err(RemoteError::new_ex(
                RemoteErrorType::ConnectionError,
                "connection lost",
            ));
        }
        Ok(share)
    }
}

impl Session for MemorySession {
    fn stat(&mut self, path: &str) -> RemoteResult<File> {
        let share = self.share()?;
        let path = key(path);
        if share.broken.contains(&path) {
            return Err(RemoteError::new_ex(
                RemoteErrorType::ProtocolError,
                "cannot read metadata",
            ));
        }
        let metadata = match share.nodes.get(&path) {
            Some(Node::Dir) => Metadata::default().file_type(FileType::Directory),
            Some(Node::File(data)) => Metadata::default()
                .file_type(FileType::File)
                .size(data.len() as u64),
            None => {
                return Err(RemoteError::new_ex(
                    RemoteErrorType::StatFailed,
                    "no such file or directory",
                ));
            }
        };
        Ok(File {
            path: PathBuf::from(path),
            metadata,
        })
    }

    fn list_dir(&mut self, path: &str) -> RemoteResult<Vec<RemoteResult<File>>> {
        let children: Vec<String> = {
            let share = self.share()?;
            if share.fail_list {
                return Err(RemoteError::new_ex(
                    RemoteErrorType::ConnectionError,
                    "connection reset",
                ));
            }
            let path = key(path);
            if !share.is_dir(&path) {
                return Err(RemoteError::new(RemoteErrorType::StatFailed));
            }
            share
                .nodes
                .keys()
                .filter(|k| k.as_str() != "/" && parent(k) == path)
                .cloned()
                .collect()
        };
        Ok(children.iter().map(|child| self.stat(child)).collect())
    }

    fn create_dir(&mut self, path: &str) -> RemoteResult<()> {
        let mut share = self.share()?;
        let path = key(path);
        if share.nodes.contains_key(&path) || !share.is_parent_dir(&path) {
            return Err(RemoteError::new(RemoteErrorType::FileCreateDenied));
        }
        share.nodes.insert(path, Node::Dir);
        Ok(())
    }

    fn open(&mut self, path: &str) -> RemoteResult<Box<dyn Read + '_>> {
        let share = self.share()?;
        match share.nodes.get(key(path).as_str()) {
            Some(Node::File(data)) => Ok(Box::new(Cursor::new(data.clone()))),
            _ => Err(RemoteError::new(RemoteErrorType::CouldNotOpenFile)),
        }
    }

    fn create(&mut self, path: &str) -> RemoteResult<Box<dyn Write + '_>> {
        let mut share = self.share()?;
        let path = key(path);
        if share.is_dir(&path) || !share.is_parent_dir(&path) {
            return Err(RemoteError::new(RemoteErrorType::CouldNotOpenFile));
        }
        share.nodes.insert(path.clone(), Node::File(Vec::new()));
        Ok(Box::new(MemoryWriter {
            share: self.share.clone(),
            path,
        }))
    }
}

/// Writes straight into the share node
struct MemoryWriter {
    share: Arc<Mutex<MemoryShare>>,
    path: String,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut share = self.share.lock().unwrap();
        if share.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write failed"));
        }
        match share.nodes.get_mut(&self.path) {
            Some(Node::File(data)) => {
                data.extend_from_slice(buf);
                Ok(buf.len())
            }
            _ => Err(io::Error::new(io::ErrorKind::NotFound, "file removed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn key(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn parent(path: &str) -> String {
    match key(path).rsplit_once('/') {
        Some(("", _)) | None => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
    }
}
