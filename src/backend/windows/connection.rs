//! Network connections through the Windows network provider (WNet)

use std::ffi::OsStr;
use std::io;
use std::os::windows::ffi::OsStrExt;

use windows_sys::Win32::Foundation::NO_ERROR;
use windows_sys::Win32::NetworkManagement::WNet::{
    WNetAddConnection2W, WNetCancelConnection2W, NETRESOURCEW, RESOURCETYPE_DISK,
};

/// A connection to a remote resource, cancelled on drop
#[derive(Debug)]
pub struct NetConnection {
    remote: Vec<u16>,
    connected: bool,
}

impl NetConnection {
    /// Connect to `remote` (`\\server\share`) as `username`
    pub fn add(remote: &str, username: &str, password: &str) -> io::Result<Self> {
        let mut remote_w = to_wide(remote);
        let user = to_wide(username);
        let pass = to_wide(password);
        let resource = NETRESOURCEW {
            dwScope: 0,
            dwType: RESOURCETYPE_DISK,
            dwDisplayType: 0,
            dwUsage: 0,
            lpLocalName: std::ptr::null_mut(),
            lpRemoteName: remote_w.as_mut_ptr(),
            lpComment: std::ptr::null_mut(),
            lpProvider: std::ptr::null_mut(),
        };
        // SAFETY: all the strings are nul terminated and outlive the call
        let result = unsafe { WNetAddConnection2W(&resource, pass.as_ptr(), user.as_ptr(), 0) };
        if result != NO_ERROR {
            return Err(io::Error::from_raw_os_error(result as i32));
        }
        Ok(Self {
            remote: remote_w,
            connected: true,
        })
    }

    /// A connection which is not cancelled on drop
    #[cfg(test)]
    pub fn detached(remote: &str) -> Self {
        Self {
            remote: to_wide(remote),
            connected: false,
        }
    }
}

impl Drop for NetConnection {
    fn drop(&mut self) {
        if !self.connected {
            return;
        }
        // SAFETY: `remote` is nul terminated
        let result = unsafe { WNetCancelConnection2W(self.remote.as_ptr(), 0, 0) };
        if result != NO_ERROR {
            warn!(
                "could not cancel network connection: {}",
                io::Error::from_raw_os_error(result as i32)
            );
        }
    }
}

fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}
