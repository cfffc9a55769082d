use std::fs::File;

fn unsupported() -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "file mapping is not supported on this platform",
    )
}

pub fn map_file(_file: &File, _len: usize) -> std::io::Result<*mut std::ffi::c_void> {
    Err(unsupported())
}

pub fn flush(_file: &File, _ptr: *mut std::ffi::c_void, _len: usize) -> std::io::Result<()> {
    Err(unsupported())
}

/// # Safety
///
/// Never called: [`map_file`] cannot succeed on this platform.
pub unsafe fn unmap(_ptr: *mut std::ffi::c_void, _len: usize) -> std::io::Result<()> {
    Err(unsupported())
}
