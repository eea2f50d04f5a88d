//! # client
//!
//! Share client: one authenticated session on a single SMB share.
//!
//! Read operations fail soft: a failure collapses to an empty listing, `None` or
//! `false`, and its cause is only logged. Write operations (uploads) fail loud and
//! return the error to the caller.

use std::io::{self, Read, Write};

use remotefs::{RemoteError, RemoteErrorType, RemoteResult};

use crate::backend::{Connector, Session, SmbConnector};
use crate::config::{ShareCredentials, ShareOptions};
use crate::entry::DirectoryEntry;
use crate::utils::path as path_utils;

/// Default amount of bytes fetched for the preview of a large file
pub const DEFAULT_PREVIEW_BYTES: u64 = 500_000;
/// Files bigger than this are previewed from their first bytes only
pub const LARGE_FILE_THRESHOLD: u64 = 20_000_000;

enum ConnectionState<S> {
    Uninitialized,
    Ready(S),
}

/// Client of a single SMB share.
///
/// Operations are blocking and take `&mut self`: share an instance between threads
/// only behind external serialization, or create one client per task.
pub struct ShareClient<C: Connector = SmbConnector> {
    credentials: ShareCredentials,
    base_path: String,
    connector: C,
    state: ConnectionState<C::Session>,
}

impl ShareClient<SmbConnector> {
    /// Create a new client with default options.
    /// No network I/O is performed until the client is initialized.
    pub fn new(credentials: ShareCredentials) -> Self {
        Self::with_options(credentials, ShareOptions::default())
    }

    /// Create a new client with the provided options
    pub fn with_options(credentials: ShareCredentials, options: ShareOptions) -> Self {
        Self::with_connector(credentials, SmbConnector::new(options))
    }
}

impl<C: Connector> ShareClient<C> {
    /// Create a new client on top of a custom connector
    pub fn with_connector(credentials: ShareCredentials, connector: C) -> Self {
        let base_path = path_utils::base_uri(&credentials.server, &credentials.share);
        debug!("new share client with base path {}", base_path);
        Self {
            credentials,
            base_path,
            connector,
            state: ConnectionState::Uninitialized,
        }
    }

    /// Fully qualified uri of the share root, e.g. `smb://nas/Photos/`
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn credentials(&self) -> &ShareCredentials {
        &self.credentials
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, ConnectionState::Ready(_))
    }

    /// Fully qualified uri of the folder at `relative` (share root if empty)
    pub fn resolve(&self, relative: &str) -> String {
        path_utils::resolve(&self.base_path, relative)
    }

    /// Build the authenticated session, unless already done.
    ///
    /// On failure the client stays uninitialized, so the call can be retried.
    pub fn initialize(&mut self) -> RemoteResult<()> {
        if self.is_initialized() {
            return Ok(());
        }
        debug!(
            "initializing session on {} as {}",
            self.base_path, self.credentials.username
        );
        let session = match self.connector.connect(&self.credentials) {
            Ok(session) => session,
            Err(err) => {
                error!(
                    "could not initialize session on {}: {}",
                    self.base_path, err
                );
                return Err(err);
            }
        };
        self.state = ConnectionState::Ready(session);
        info!("session on {} is ready", self.base_path);
        Ok(())
    }

    /// Check whether the share can be reached with the configured credentials
    pub fn test_connection(&mut self) -> bool {
        trace!("testing connection to {}", self.base_path);
        match self.session().and_then(|session| session.exists("/")) {
            Ok(true) => {
                debug!("connection test to {} succeeded", self.base_path);
                true
            }
            Ok(false) => {
                warn!(
                    "connection test to {}: share root is not accessible",
                    self.base_path
                );
                false
            }
            Err(err) => {
                error!("connection test to {} failed: {}", self.base_path, err);
                false
            }
        }
    }

    /// List the content of the folder at `relative_path` (share root if empty).
    ///
    /// Directories come first, then files; each group is sorted by name.
    /// A missing path, a path to a file or a failed listing all yield an empty list.
    pub fn list_files(&mut self, relative_path: &str) -> Vec<DirectoryEntry> {
        match self.try_list_files(relative_path) {
            Ok(entries) => entries,
            Err(err) => {
                error!("could not list files at {:?}: {}", relative_path, err);
                Vec::new()
            }
        }
    }

    /// Read the whole content of the file at `path`
    pub fn download_file(&mut self, path: &str) -> Option<Vec<u8>> {
        match self.read_file(path, None) {
            Ok(data) => Some(data),
            Err(err) => {
                error!("could not download {}: {}", path, err);
                None
            }
        }
    }

    /// [`ShareClient::download_partial`] with [`DEFAULT_PREVIEW_BYTES`]
    pub fn download_preview(&mut self, path: &str) -> Option<Vec<u8>> {
        self.download_partial(path, DEFAULT_PREVIEW_BYTES)
    }

    /// Read the content needed to preview the file at `path`.
    ///
    /// Files up to [`LARGE_FILE_THRESHOLD`] bytes are read whole, whatever `max_bytes` is;
    /// only the first `max_bytes` of larger files are read.
    /// Returns `None` on failure or if nothing could be read.
    pub fn download_partial(&mut self, path: &str, max_bytes: u64) -> Option<Vec<u8>> {
        match self.read_file(path, Some(max_bytes)) {
            Ok(data) if data.is_empty() => {
                debug!("nothing read from {}", path);
                None
            }
            Ok(data) => Some(data),
            Err(err) => {
                error!("could not download preview of {}: {}", path, err);
                None
            }
        }
    }

    /// Upload the content of `reader` as `file_name` into `destination_folder`.
    ///
    /// The destination folder is created, with any missing ancestor, if it doesn't exist.
    /// An existing file is overwritten. Returns the amount of bytes written.
    pub fn upload_file<R: Read>(
        &mut self,
        mut reader: R,
        file_name: &str,
        destination_folder: &str,
    ) -> RemoteResult<u64> {
        let folder_uri = self.resolve(destination_folder);
        let folder = self.share_path(&folder_uri)?;
        let target = path_utils::join(&folder, file_name);
        let session = self.session()?;
        if !session.exists(&folder)? {
            debug!("creating destination folder {}", folder_uri);
            create_dir_all(&mut *session, &folder)?;
        }
        trace!("uploading {} to {}", file_name, folder_uri);
        let mut writer = session.create(&target)?;
        let bytes = io::copy(&mut reader, &mut writer)
            .and_then(|bytes| writer.flush().map(|_| bytes))
            .map_err(|e| {
                error!("failed to upload {} to {}: {}", file_name, folder_uri, e);
                RemoteError::new_ex(RemoteErrorType::IoError, e)
            })?;
        info!("uploaded {} to {} ({} bytes)", file_name, folder_uri, bytes);
        Ok(bytes)
    }

    /// Create `folder_name` into `current_path` (share root if empty).
    ///
    /// Returns `false` if the folder already exists or couldn't be created.
    pub fn create_folder(&mut self, current_path: &str, folder_name: &str) -> bool {
        let relative = if current_path.is_empty() {
            folder_name.to_string()
        } else {
            format!("{current_path}/{folder_name}")
        };
        let uri = self.resolve(&relative);
        match self.try_create_folder(&uri) {
            Ok(created) => created,
            Err(err) => {
                error!("could not create folder {}: {}", uri, err);
                false
            }
        }
    }

    // -- private

    /// Get the session, initializing it if necessary
    fn session(&mut self) -> RemoteResult<&mut C::Session> {
        self.initialize()?;
        match &mut self.state {
            ConnectionState::Ready(session) => Ok(session),
            ConnectionState::Uninitialized => Err(RemoteError::new(RemoteErrorType::NotConnected)),
        }
    }

    fn share_path(&self, uri: &str) -> RemoteResult<String> {
        path_utils::share_path(&self.base_path, uri).ok_or_else(|| {
            RemoteError::new_ex(
                RemoteErrorType::BadFile,
                format!("{uri} is outside of {}", self.base_path),
            )
        })
    }

    fn try_list_files(&mut self, relative_path: &str) -> RemoteResult<Vec<DirectoryEntry>> {
        let uri = self.resolve(relative_path);
        let path = self.share_path(&uri)?;
        trace!("listing files at {}", uri);
        let session = self.session()?;
        let dir = match session.stat(&path) {
            Ok(dir) => dir,
            Err(RemoteError {
                kind: RemoteErrorType::StatFailed,
                ..
            }) => {
                debug!("{} doesn't exist", uri);
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };
        if !dir.is_dir() {
            debug!("{} is not a directory", uri);
            return Ok(Vec::new());
        }
        let mut entries: Vec<DirectoryEntry> = session
            .list_dir(&path)?
            .into_iter()
            .filter_map(|file| match file {
                Ok(file) => Some(DirectoryEntry::from_file(&uri, &file)),
                Err(err) => {
                    warn!("skipping unreadable entry in {}: {}", uri, err);
                    None
                }
            })
            .collect();
        sort_entries(&mut entries);
        debug!("found {} entries at {}", entries.len(), uri);
        Ok(entries)
    }

    /// Read the file at `uri`; with a `limit`, files larger than [`LARGE_FILE_THRESHOLD`]
    /// are read up to `limit` bytes
    fn read_file(&mut self, uri: &str, limit: Option<u64>) -> RemoteResult<Vec<u8>> {
        let path = self.share_path(uri)?;
        let session = self.session()?;
        let limit = match limit {
            Some(limit) => {
                let size = session.stat(&path)?.metadata().size;
                (size > LARGE_FILE_THRESHOLD).then_some(limit)
            }
            None => None,
        };
        trace!("reading {} (limit: {:?})", path, limit);
        let mut reader = session.open(&path)?;
        let mut data = Vec::new();
        let result = match limit {
            Some(limit) => reader.take(limit).read_to_end(&mut data),
            None => reader.read_to_end(&mut data),
        };
        result.map_err(|e| RemoteError::new_ex(RemoteErrorType::IoError, e))?;
        debug!("read {} bytes from {}", data.len(), path);
        Ok(data)
    }

    fn try_create_folder(&mut self, uri: &str) -> RemoteResult<bool> {
        let path = self.share_path(uri)?;
        let session = self.session()?;
        if session.exists(&path)? {
            debug!("folder {} already exists", uri);
            return Ok(false);
        }
        session.create_dir(&path)?;
        info!("created folder {}", uri);
        Ok(true)
    }
}

/// Create the directory at `path` and all of its missing ancestors
fn create_dir_all<S: Session>(session: &mut S, path: &str) -> RemoteResult<()> {
    for dir in path_utils::ancestors(path) {
        if !session.exists(&dir)? {
            session.create_dir(&dir)?;
        }
    }
    Ok(())
}

/// Sort entries: directories first, then by name
fn sort_entries(entries: &mut [DirectoryEntry]) {
    entries.sort_by(|a, b| {
        b.is_directory()
            .cmp(&a.is_directory())
            .then_with(|| a.name().cmp(b.name()))
    });
}
