//! # upload
//!
//! Batch upload of files into a share folder

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use remotefs::RemoteResult;

use crate::backend::Connector;
use crate::client::ShareClient;
use crate::utils::fmt::fmt_date_folder;

/// Cooperative cancellation flag for a batch upload.
///
/// Clones share the same flag. The batch checks it between two files; a transfer
/// in progress is never interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the cancellation of the batch
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A file to upload
pub struct UploadItem<R: Read> {
    pub file_name: String,
    pub reader: R,
}

impl<R: Read> UploadItem<R> {
    pub fn new<S: AsRef<str>>(file_name: S, reader: R) -> Self {
        Self {
            file_name: file_name.as_ref().to_string(),
            reader,
        }
    }
}

/// Progress of a batch upload, reported for each file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    /// 1-based index of the file in the batch
    pub current: usize,
    pub total: usize,
    pub file_name: String,
    pub stage: UploadStage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Started,
    Completed { bytes: u64 },
}

/// Outcome of a batch upload which didn't fail
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Uploaded files with their size
    pub uploaded: Vec<(String, u64)>,
    /// Whether the batch stopped because of a cancellation request
    pub cancelled: bool,
}

impl UploadReport {
    pub fn bytes(&self) -> u64 {
        self.uploaded.iter().map(|(_, bytes)| bytes).sum()
    }
}

/// Upload `items` in order into `destination`.
///
/// `cancel` is checked before each file. The first failed upload aborts the batch
/// and its error is returned; files uploaded before it stay on the share.
pub fn upload_batch<C, R, I, F>(
    client: &mut ShareClient<C>,
    items: I,
    destination: &str,
    cancel: &CancelToken,
    mut on_progress: F,
) -> RemoteResult<UploadReport>
where
    C: Connector,
    R: Read,
    I: IntoIterator<Item = UploadItem<R>>,
    I::IntoIter: ExactSizeIterator,
    F: FnMut(&UploadProgress),
{
    let items = items.into_iter();
    let total = items.len();
    let mut report = UploadReport::default();
    info!("uploading {} files to {:?}", total, destination);
    for (index, item) in items.enumerate() {
        if cancel.is_cancelled() {
            info!(
                "upload to {:?} cancelled after {} of {} files",
                destination, index, total
            );
            report.cancelled = true;
            break;
        }
        let mut progress = UploadProgress {
            current: index + 1,
            total,
            file_name: item.file_name.clone(),
            stage: UploadStage::Started,
        };
        on_progress(&progress);
        let bytes = client.upload_file(item.reader, &item.file_name, destination)?;
        progress.stage = UploadStage::Completed { bytes };
        on_progress(&progress);
        report.uploaded.push((item.file_name, bytes));
    }
    debug!(
        "uploaded {} files ({} bytes) to {:?}",
        report.uploaded.len(),
        report.bytes(),
        destination
    );
    Ok(report)
}

/// Destination folder for uploads made on `date`: `yyyy-mm-dd` under `selected`
/// (share root if empty)
pub fn dated_folder(selected: &str, date: NaiveDate) -> String {
    let folder = fmt_date_folder(date);
    if selected.is_empty() {
        folder
    } else {
        format!("{selected}/{folder}")
    }
}

/// [`dated_folder`] for the current local date
pub fn today_folder(selected: &str) -> String {
    dated_folder(selected, Local::now().date_naive())
}
