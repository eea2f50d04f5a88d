//! # entry
//!
//! Directory listing records

use remotefs::File;

/// Extensions of files shown as images
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];
/// Extensions of files shown as videos
const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "avi", "mkv", "mov", "3gp", "webm"];

/// A file or folder found on the share
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryEntry {
    name: String,
    is_directory: bool,
    size: u64,
    path: String,
}

/// Kind of media an entry holds, as guessed from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl DirectoryEntry {
    pub(crate) fn new<S: AsRef<str>>(name: S, is_directory: bool, size: u64, path: S) -> Self {
        Self {
            name: name.as_ref().trim_end_matches('/').to_string(),
            is_directory,
            size: if is_directory { 0 } else { size },
            path: path.as_ref().to_string(),
        }
    }

    /// Build an entry from a session `File`; `parent_uri` is the fully qualified uri of
    /// its parent, separator included
    pub(crate) fn from_file(parent_uri: &str, file: &File) -> Self {
        let name = file.name();
        let is_directory = file.is_dir();
        let path = if is_directory {
            format!("{parent_uri}{name}/")
        } else {
            format!("{parent_uri}{name}")
        };
        Self::new(
            name.as_str(),
            is_directory,
            file.metadata().size,
            path.as_str(),
        )
    }

    /// Leaf name, without trailing separator
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Size in bytes; always `0` for directories
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Fully qualified path; it can be passed as is to the download operations
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Lowercase extension of the entry name, if any
    pub fn extension(&self) -> Option<String> {
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                Some(ext.to_ascii_lowercase())
            }
            _ => None,
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        if self.is_directory {
            return MediaKind::Other;
        }
        match self.extension() {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => MediaKind::Image,
            Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => MediaKind::Video,
            _ => MediaKind::Other,
        }
    }

    /// Whether a preview can be requested for this entry
    pub fn is_media(&self) -> bool {
        self.media_kind() != MediaKind::Other
    }
}
