/*!
 * Sparse Guest Memory
 * Page-granular guest address space backed by host allocations
 */

use ahash::RandomState;
use std::collections::HashMap;

use super::traits::GuestMemory;
use super::types::*;
use crate::core::types::GuestAddress;

/// Guest page size
pub const PAGE_SIZE: u64 = 0x1000;

/// Sparse, page-mapped guest address space
///
/// Pages are zero-filled when mapped. Accesses touching any unmapped page
/// fail before a single byte is copied.
#[derive(Debug, Clone, Default)]
pub struct SparseMemory {
    pages: HashMap<u64, Box<[u8]>, RandomState>,
}

impl SparseMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every page overlapping `[address, address + size)`
    pub fn map(&mut self, address: GuestAddress, size: u64) {
        if size == 0 {
            return;
        }
        let first = address / PAGE_SIZE;
        let last = address.saturating_add(size - 1) / PAGE_SIZE;
        for page in first..=last {
            self.pages
                .entry(page)
                .or_insert_with(|| vec![0u8; PAGE_SIZE as usize].into_boxed_slice());
        }
    }

    /// Unmap every page overlapping `[address, address + size)`
    pub fn unmap(&mut self, address: GuestAddress, size: u64) {
        if size == 0 {
            return;
        }
        let first = address / PAGE_SIZE;
        let last = address.saturating_add(size - 1) / PAGE_SIZE;
        for page in first..=last {
            self.pages.remove(&page);
        }
    }

    /// Check whether the whole range is mapped
    pub fn is_mapped(&self, address: GuestAddress, size: usize) -> bool {
        self.check_range(address, size).is_ok()
    }

    pub fn mapped_pages(&self) -> usize {
        self.pages.len()
    }

    fn check_range(&self, address: GuestAddress, size: usize) -> MemoryResult<()> {
        if size == 0 {
            return Ok(());
        }
        let end = address
            .checked_add(size as u64 - 1)
            .ok_or(MemoryError::AddressOverflow { address, size })?;
        for page in (address / PAGE_SIZE)..=(end / PAGE_SIZE) {
            if !self.pages.contains_key(&page) {
                return Err(MemoryError::Unmapped { address, size });
            }
        }
        Ok(())
    }

    /// Walk `[address, address + len)` as (page, offset-in-page, chunk-start, chunk-len)
    fn chunks(address: GuestAddress, len: usize) -> impl Iterator<Item = (u64, usize, usize, usize)> {
        let mut done = 0usize;
        std::iter::from_fn(move || {
            if done >= len {
                return None;
            }
            let current = address + done as u64;
            let page = current / PAGE_SIZE;
            let offset = (current % PAGE_SIZE) as usize;
            let take = (PAGE_SIZE as usize - offset).min(len - done);
            let chunk = (page, offset, done, take);
            done += take;
            Some(chunk)
        })
    }
}

impl GuestMemory for SparseMemory {
    fn read_memory(&self, address: GuestAddress, buf: &mut [u8]) -> MemoryResult<()> {
        self.check_range(address, buf.len())?;
        for (page, offset, start, take) in Self::chunks(address, buf.len()) {
            let source = &self.pages[&page];
            buf[start..start + take].copy_from_slice(&source[offset..offset + take]);
        }
        Ok(())
    }

    fn write_memory(&mut self, address: GuestAddress, data: &[u8]) -> MemoryResult<()> {
        self.check_range(address, data.len())?;
        for (page, offset, start, take) in Self::chunks(address, data.len()) {
            if let Some(target) = self.pages.get_mut(&page) {
                target[offset..offset + take].copy_from_slice(&data[start..start + take]);
            }
        }
        Ok(())
    }
}
