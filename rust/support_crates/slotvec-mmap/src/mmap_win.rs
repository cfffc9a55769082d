use std::{fs::File, os::windows::io::AsRawHandle};
use windows_sys::Win32::{
    Foundation::{CloseHandle, GetLastError, HANDLE},
    Storage::FileSystem::FlushFileBuffers,
    System::Memory::{
        CreateFileMappingW, FILE_MAP_ALL_ACCESS, FlushViewOfFile, MEMORY_MAPPED_VIEW_ADDRESS,
        MapViewOfFile, PAGE_READWRITE, UnmapViewOfFile,
    },
};

/// Maps the first `len` bytes of `file` into memory, read-write.
///
/// The file mapping object is closed right after the view is created; the view
/// keeps it alive until [`unmap`].
///
/// # Safety
///
/// The returned pointer must be released with [`unmap`] using the same `len`.
pub fn map_file(file: &File, len: usize) -> std::io::Result<*mut std::ffi::c_void> {
    assert!(len > 0);
    let size = len as u64;
    unsafe {
        let mapping = CreateFileMappingW(
            file.as_raw_handle() as HANDLE,
            std::ptr::null(),
            PAGE_READWRITE,
            (size >> 32) as u32,
            size as u32,
            std::ptr::null(),
        );
        if mapping.is_null() {
            return Err(last_error());
        }

        let view = MapViewOfFile(mapping, FILE_MAP_ALL_ACCESS, 0, 0, len);
        let result = if view.Value.is_null() {
            Err(last_error())
        } else {
            Ok(view.Value)
        };
        CloseHandle(mapping);
        result
    }
}

/// Writes modified pages of a mapped view back to its file and waits for them
/// to reach the disk.
///
/// `FlushViewOfFile` only initiates the write of dirty pages; `FlushFileBuffers`
/// on the file handle completes it.
pub fn flush(file: &File, ptr: *mut std::ffi::c_void, len: usize) -> std::io::Result<()> {
    let res = unsafe { FlushViewOfFile(ptr as *const _, len) };
    if res == 0 {
        return Err(last_error());
    }
    let res = unsafe { FlushFileBuffers(file.as_raw_handle() as HANDLE) };
    if res == 0 {
        return Err(last_error());
    }
    Ok(())
}

/// Releases a view created by [`map_file`].
///
/// # Safety
///
/// `ptr` must come from a successful [`map_file`] call and must not have been
/// released already.
pub unsafe fn unmap(ptr: *mut std::ffi::c_void, _len: usize) -> std::io::Result<()> {
    let res = unsafe { UnmapViewOfFile(MEMORY_MAPPED_VIEW_ADDRESS { Value: ptr }) };
    if res == 0 {
        return Err(last_error());
    }
    Ok(())
}

fn last_error() -> std::io::Error {
    let error = unsafe { GetLastError() };
    std::io::Error::from_raw_os_error(error as i32)
}
