//! # smb utils
//!
//! SMB protocol utilities

use libc::mode_t;
use pavao::SmbStat;
use remotefs::{
    fs::{FileType, Metadata, UnixPex},
    File,
};
use std::path::PathBuf;

/// Convert `SmbStat` of the entry at `path` to `File`
pub fn smbstat_to_file<S: AsRef<str>>(path: S, stat: SmbStat) -> File {
    let mode = mode_t::from(stat.mode);
    let file_type = get_file_type_from_stat(&stat);
    File {
        path: PathBuf::from(path.as_ref()),
        metadata: Metadata::default()
            .file_type(file_type.clone())
            .mode(UnixPex::from(mode as u32))
            .modified(stat.modified)
            // directories report the size of their allocation
            .size(match file_type {
                FileType::Directory => 0,
                _ => stat.size,
            }),
    }
}

fn get_file_type_from_stat(stat: &SmbStat) -> FileType {
    match stat.mode {
        mode if mode.is_dir() => FileType::Directory,
        mode if mode.is_symlink() => FileType::Symlink,
        _ => FileType::File,
    }
}
