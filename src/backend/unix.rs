//! # UNIX backend
//!
//! libsmbclient session, through pavao

use std::io::{Read, Write};

use libc::mode_t;
use pavao::{SmbClient, SmbCredentials, SmbDirentType, SmbMode, SmbOpenOptions, SmbOptions};
use remotefs::{File, RemoteError, RemoteErrorType, RemoteResult};

use super::{probe_server, Connector, Session};
use crate::config::{ShareCredentials, ShareOptions};
use crate::utils::{path as path_utils, smb as smb_utils};

/// Mode for directories created on the share
const DIR_MODE: mode_t = 0o755;
/// Mode for files created on the share
const FILE_MODE: mode_t = 0o644;

/// Connector building libsmbclient sessions
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
        // libsmbclient would fall back to broadcast lookups and its own timeouts
        let addr = probe_server(
            &credentials.server,
            self.options.port,
            self.options.connect_timeout,
        )?;
        let server = credentials.server_uri(addr.port());
        debug!(
            "initializing smb context for {} share {} as {}",
            server, credentials.share, credentials.username
        );
        let client = SmbClient::new(
            SmbCredentials::default()
                .server(server)
                .share(format!("/{}", credentials.share))
                .username(credentials.username.as_str())
                .password(credentials.password.as_str())
                .workgroup(self.options.workgroup.as_str()),
            SmbOptions::default()
                .case_sensitive(false)
                .one_share_per_server(true),
        )
        .map_err(|e| RemoteError::new_ex(RemoteErrorType::BadAddress, e))?;
        trace!("response timeout: {:?}", self.options.response_timeout);
        client
            .set_timeout(self.options.response_timeout)
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::ConnectionError, e))?;
        let session = SmbSession { client };
        session.check_connection()?;
        Ok(session)
    }
}

/// Session on a share backed by a libsmbclient context
pub struct SmbSession {
    client: SmbClient,
}

impl SmbSession {
    fn check_connection(&self) -> RemoteResult<()> {
        trace!("checking connection...");
        match self.client.get_user() {
            Err(e) => {
                error!("connection ERROR: {}", e);
                Err(RemoteError::new_ex(RemoteErrorType::ConnectionError, e))
            }
            Ok(_) => {
                trace!("connection OK");
                Ok(())
            }
        }
    }
}

impl Session for SmbSession {
    fn stat(&mut self, path: &str) -> RemoteResult<File> {
        trace!("get stat for {}", path);
        self.client
            .stat(path)
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::StatFailed, e))
            .map(|stat| smb_utils::smbstat_to_file(path, stat))
    }

    fn list_dir(&mut self, path: &str) -> RemoteResult<Vec<RemoteResult<File>>> {
        trace!("listing files at {}", path);
        let dirents = self
            .client
            .list_dir(path)
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::StatFailed, e))?;
        // stat each dirent (NOTE: KEEP ONLY FILES AND DIRECTORIES)
        Ok(dirents
            .into_iter()
            .filter(|d| d.get_type() == SmbDirentType::File || d.get_type() == SmbDirentType::Dir)
            .filter(|d| d.name() != "." && d.name() != "..")
            .map(|d| {
                let child = path_utils::join(path, d.name());
                self.stat(&child)
            })
            .collect())
    }

    fn create_dir(&mut self, path: &str) -> RemoteResult<()> {
        trace!("making directory at {}", path);
        self.client
            .mkdir(path, SmbMode::from(DIR_MODE))
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::FileCreateDenied, e))
    }

    fn open(&mut self, path: &str) -> RemoteResult<Box<dyn Read + '_>> {
        trace!("opening file at {} for read", path);
        let file = self
            .client
            .open_with(path, SmbOpenOptions::default().read(true))
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::CouldNotOpenFile, e))?;
        Ok(Box::new(file))
    }

    fn create(&mut self, path: &str) -> RemoteResult<Box<dyn Write + '_>> {
        trace!("creating file at {}", path);
        let file = self
            .client
            .open_with(
                path,
                SmbOpenOptions::default()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .mode(FILE_MODE),
            )
            .map_err(|e| RemoteError::new_ex(RemoteErrorType::CouldNotOpenFile, e))?;
        Ok(Box::new(file))
    }
}
