use std::{fs::File, os::fd::AsRawFd};

/// Maps the first `len` bytes of `file` into memory, shared and read-write.
///
/// Stores through the returned pointer reach the file's page cache directly and
/// are written back by the kernel, or synchronously by [`flush`].
///
/// # Arguments
///
/// * `file` - An open file with read and write access, at least `len` bytes long
/// * `len` - The number of bytes to map; must be non-zero
///
/// # Safety
///
/// The returned pointer must be released with [`unmap`] using the same `len`.
/// Accessing pages past the end of the file raises `SIGBUS`, so the file must not
/// be truncated below `len` while mapped.
pub fn map_file(file: &File, len: usize) -> std::io::Result<*mut std::ffi::c_void> {
    assert!(len > 0);
    let ptr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            len,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_SHARED,
            file.as_raw_fd(),
            0,
        )
    };
    if ptr.is_null() || ptr == libc::MAP_FAILED {
        return Err(std::io::Error::last_os_error());
    }
    Ok(ptr)
}

/// Synchronously writes modified pages of a mapping back to its file.
///
/// `msync` with `MS_SYNC` returns once the pages are written, so the file handle
/// is not needed.
pub fn flush(_file: &File, ptr: *mut std::ffi::c_void, len: usize) -> std::io::Result<()> {
    let res = unsafe { libc::msync(ptr, len, libc::MS_SYNC) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Releases a mapping created by [`map_file`].
///
/// # Safety
///
/// `ptr` and `len` must come from a single successful [`map_file`] call, the
/// mapping must not have been released already, and no references into it may
/// remain.
pub unsafe fn unmap(ptr: *mut std::ffi::c_void, len: usize) -> std::io::Result<()> {
    let res = unsafe { libc::munmap(ptr, len) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}
