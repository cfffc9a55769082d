use slotvec_bits::ArrayAllocator;
use slotvec_common::Result;

use crate::{
    config::MmapConfig,
    naming::NamingPolicy,
    vector::MmapVector,
};

/// Produces file-backed [`MmapVector`]s in one directory.
///
/// This is the factory the filter layer is configured with: directory, layout and
/// naming policy are fixed here, allocation only takes `(bits, len)`.
#[derive(Debug, Clone)]
pub struct MmapAllocator {
    config: MmapConfig,
    naming: NamingPolicy,
}

impl MmapAllocator {
    pub fn new(config: MmapConfig) -> MmapAllocator {
        let naming = NamingPolicy::from_strategy(config.naming);
        MmapAllocator { config, naming }
    }

    /// Uses an explicit naming policy, e.g. a counter resumed from persisted
    /// headers, instead of the one selected by `config.naming`.
    pub fn with_policy(config: MmapConfig, naming: NamingPolicy) -> MmapAllocator {
        MmapAllocator { config, naming }
    }

    pub fn config(&self) -> &MmapConfig {
        &self.config
    }

    pub fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    /// A closed vector over this allocator's directory and layout, to
    /// [`restore`](slotvec_bits::ValueArray::restore) a persisted header into.
    pub fn detached(&self) -> MmapVector {
        MmapVector::new(&self.config)
    }
}

impl ArrayAllocator for MmapAllocator {
    type Array = MmapVector;

    fn allocate(&mut self, bits: u32, len: u64) -> Result<MmapVector> {
        MmapVector::allocate(&self.config, &mut self.naming, bits, len)
    }
}

#[cfg(test)]
mod tests {
    use slotvec_bits::{ArrayAllocator, ValueArray};

    use super::MmapAllocator;
    use crate::{config::MmapConfig, naming::NamingPolicy};

    #[test]
    fn test_allocate_names_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut alloc = MmapAllocator::new(MmapConfig::new(dir.path()));
        let arrays: Vec<_> = (0..3).map(|_| alloc.allocate(7, 100).unwrap()).collect();
        for (i, arr) in arrays.iter().enumerate() {
            assert_eq!(arr.sequence(), i as u32);
            assert_eq!(arr.path(), Some(dir.path().join(format!("mmap.{i}")).as_path()));
            assert_eq!(ValueArray::len(arr), 100);
        }
    }

    #[test]
    fn test_resumed_counter() {
        let dir = tempfile::tempdir().unwrap();
        let mut alloc =
            MmapAllocator::with_policy(MmapConfig::new(dir.path()), NamingPolicy::counter_from(5));
        assert_eq!(alloc.allocate(3, 10).unwrap().sequence(), 5);
        assert_eq!(alloc.naming(), &NamingPolicy::Counter { next: 6 });
    }

    #[test]
    fn test_detached_is_closed() {
        let dir = tempfile::tempdir().unwrap();
        let alloc = MmapAllocator::new(MmapConfig::new(dir.path()).with_bit_packed(false));
        let v = alloc.detached();
        assert!(v.is_closed());
        assert!(!v.is_bit_packed());
        assert!(v.get(0).unwrap_err().is_closed());
    }
}
