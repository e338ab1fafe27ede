// SPDX-License-Identifier: GPL-3.0-only

//! Extended-attribute primitives over an open file descriptor.

use std::ffi::CString;
use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;

use crate::error::{Result, SysError};

// Synonyms; attr/xattr.h defines ENOATTR as ENODATA on Linux.
const ENOATTR: i32 = libc::ENODATA;

/// Read an extended attribute. An absent attribute is `Ok(None)`, not an
/// error.
pub fn get_xattr(file: &File, name: &str) -> Result<Option<Vec<u8>>> {
    let c_name = attr_name(name)?;

    // Size probe first, then the actual read.
    let size = unsafe {
        libc::fgetxattr(
            file.as_raw_fd(),
            c_name.as_ptr(),
            std::ptr::null_mut(),
            0,
        )
    };
    if size < 0 {
        return match last_errno() {
            ENOATTR => Ok(None),
            _ => Err(SysError::Io(io::Error::last_os_error())),
        };
    }

    let mut buf = vec![0u8; size as usize];
    let read = unsafe {
        libc::fgetxattr(
            file.as_raw_fd(),
            c_name.as_ptr(),
            buf.as_mut_ptr().cast(),
            buf.len(),
        )
    };
    if read < 0 {
        return Err(SysError::Io(io::Error::last_os_error()));
    }

    buf.truncate(read as usize);
    Ok(Some(buf))
}

/// Write an extended attribute, creating or replacing it. An empty value is
/// a valid write (it stores the attribute with zero-length content rather
/// than removing it).
pub fn set_xattr(file: &File, name: &str, value: &[u8]) -> Result<()> {
    let c_name = attr_name(name)?;

    let ret = unsafe {
        libc::fsetxattr(
            file.as_raw_fd(),
            c_name.as_ptr(),
            value.as_ptr().cast(),
            value.len(),
            0,
        )
    };
    if ret < 0 {
        return Err(SysError::Io(io::Error::last_os_error()));
    }

    Ok(())
}

fn attr_name(name: &str) -> Result<CString> {
    CString::new(name).map_err(|e| SysError::InvalidPath(format!("invalid xattr name: {e}")))
}

fn last_errno() -> i32 {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    // The user namespace is writable without privileges, so the transport
    // invariants are exercised against a real filesystem.
    fn scratch_file(tag: &str) -> (PathBuf, File) {
        let path = std::env::temp_dir().join(format!(
            "props-sys-xattr-{tag}-{}",
            std::process::id()
        ));
        let file = File::create(&path).unwrap();
        (path, file)
    }

    #[test]
    fn absent_attribute_is_success_with_none() {
        let (path, file) = scratch_file("absent");
        assert!(get_xattr(&file, "user.props_absent").unwrap().is_none());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn empty_value_is_written_not_removed() {
        let (path, file) = scratch_file("empty");
        set_xattr(&file, "user.props_clear", b"").unwrap();
        // the attribute exists with zero-length content
        assert_eq!(
            get_xattr(&file, "user.props_clear").unwrap(),
            Some(Vec::new())
        );
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn values_round_trip_verbatim() {
        let (path, file) = scratch_file("roundtrip");
        set_xattr(&file, "user.props_value", b"zstd:3").unwrap();
        assert_eq!(
            get_xattr(&file, "user.props_value").unwrap(),
            Some(b"zstd:3".to_vec())
        );

        set_xattr(&file, "user.props_value", b"lzo").unwrap();
        assert_eq!(
            get_xattr(&file, "user.props_value").unwrap(),
            Some(b"lzo".to_vec())
        );
        fs::remove_file(path).unwrap();
    }
}
