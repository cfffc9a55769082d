pub mod mapped_words;

#[cfg_attr(unix, path = "mmap_unix.rs")]
#[cfg_attr(windows, path = "mmap_win.rs")]
#[cfg_attr(not(any(unix, windows)), path = "mmap_fallback.rs")]
pub mod mmap;

pub use mapped_words::MappedWords;

#[cfg(test)]
mod tests;
