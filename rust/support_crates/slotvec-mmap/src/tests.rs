use std::{fs::OpenOptions, io::Read};

use crate::mapped_words::MappedWords;

fn scratch_file(dir: &tempfile::TempDir, name: &str, len: u64) -> std::fs::File {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(dir.path().join(name))
        .unwrap();
    file.set_len(len).unwrap();
    file
}

#[test]
fn test_map_zeroed_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = scratch_file(&dir, "words", 64);
    let words = MappedWords::map(&file, 64).unwrap();
    assert_eq!(words.len(), 64);
    assert_eq!(words.word_count(), 8);
    let view: &[u64] = words.as_ref();
    assert_eq!(view, &[0u64; 8]);
}

#[test]
fn test_writes_reach_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = scratch_file(&dir, "words", 24);
    let mut words = MappedWords::map(&file, 24).unwrap();
    {
        let view: &mut [u64] = words.as_mut();
        view[0] = 0x0102_0304_0506_0708;
        view[2] = u64::MAX;
    }
    words.flush().unwrap();
    words.unmap().unwrap();

    let mut bytes = Vec::new();
    std::fs::File::open(dir.path().join("words"))
        .unwrap()
        .read_to_end(&mut bytes)
        .unwrap();
    assert_eq!(bytes.len(), 24);
    assert_eq!(
        u64::from_ne_bytes(bytes[0..8].try_into().unwrap()),
        0x0102_0304_0506_0708
    );
    assert_eq!(&bytes[8..16], &[0u8; 8]);
    assert_eq!(&bytes[16..24], &[0xffu8; 8]);
}

#[test]
fn test_remap_sees_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let file = scratch_file(&dir, "words", 16);
    {
        let mut words = MappedWords::map(&file, 16).unwrap();
        words.as_mut_slice::<u64>()[1] = 77;
    }
    let words = MappedWords::map(&file, 16).unwrap();
    assert_eq!(words.as_slice::<u64>(), &[0, 77]);
}

#[test]
fn test_empty_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let file = scratch_file(&dir, "empty", 0);
    let mut words = MappedWords::map(&file, 0).unwrap();
    assert!(words.is_empty());
    assert!(words.as_slice::<u64>().is_empty());
    assert!(words.as_mut_slice::<u64>().is_empty());
    words.flush().unwrap();
    words.unmap().unwrap();

    let empty = MappedWords::empty();
    let view: &[u64] = empty.as_ref();
    assert!(view.is_empty());
}

#[test]
fn test_map_rejects_bad_lengths() {
    let dir = tempfile::tempdir().unwrap();
    let file = scratch_file(&dir, "short", 16);

    let err = MappedWords::map(&file, 12).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);

    let err = MappedWords::map(&file, 32).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}

#[test]
fn test_flush_after_file_handle_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let file = scratch_file(&dir, "words", 8);
    let mut words = MappedWords::map(&file, 8).unwrap();
    drop(file);

    words.as_mut_slice::<u64>()[0] = 0xfeed;
    words.flush().unwrap();
    drop(words);

    let bytes = std::fs::read(dir.path().join("words")).unwrap();
    assert_eq!(u64::from_ne_bytes(bytes[..8].try_into().unwrap()), 0xfeed);
}
