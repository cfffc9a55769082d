use std::io::Cursor;

use slotvec::{
    ArrayAllocator, MemoryAllocator, MmapAllocator, MmapConfig, MmapVector, ValueArray,
};

/// Stands in for a filter that only sees the allocator seam.
fn fill_slots<A: ArrayAllocator>(alloc: &mut A, bits: u32, len: u64) -> A::Array {
    let mut slots = alloc.allocate(bits, len).unwrap();
    let modulus = 1u64 << bits;
    for i in 0..len {
        slots.set(i, (i * 2_654_435_761) % modulus).unwrap();
    }
    slots
}

#[test]
fn test_heap_and_mapped_arrays_agree() {
    let dir = tempfile::tempdir().unwrap();
    for packed in [true, false] {
        let mut heap = MemoryAllocator::new(packed);
        let mut mapped = MmapAllocator::new(MmapConfig::new(dir.path()).with_bit_packed(packed));
        for bits in [1u32, 3, 5, 8, 17, 31, 63] {
            let a = fill_slots(&mut heap, bits, 333);
            let b = fill_slots(&mut mapped, bits, 333);
            assert_eq!(a.values().unwrap(), b.values().unwrap(), "bits={bits}");
        }
    }
}

#[test]
fn test_mapped_round_trip_through_facade() {
    let dir = tempfile::tempdir().unwrap();
    let config = MmapConfig::new(dir.path());
    let mut alloc = MmapAllocator::new(config.clone());
    let mut slots = fill_slots(&mut alloc, 21, 5000);
    let expected = slots.values().unwrap();

    let mut header = Vec::new();
    slots.persist(&mut header).unwrap();
    slots.close().unwrap();

    let mut reopened = MmapVector::new(&config);
    reopened.restore(&mut Cursor::new(header)).unwrap();
    assert_eq!(reopened.values().unwrap(), expected);
}

#[test]
fn test_heap_round_trip_through_facade() {
    let mut alloc = MemoryAllocator::default();
    let slots = fill_slots(&mut alloc, 9, 100);
    let mut buf = Vec::new();
    slots.persist(&mut buf).unwrap();

    let mut restored = alloc.allocate(1, 1).unwrap();
    restored.restore(&mut Cursor::new(buf)).unwrap();
    assert_eq!(restored.values().unwrap(), slots.values().unwrap());
}
