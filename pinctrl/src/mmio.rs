//! Register windows
//!
//! A community's registers live in one memory-mapped window. Components never
//! hold raw pointers; they go through a `RegisterWindow` handle so tests can
//! substitute an in-memory register array.

use alloc::sync::Arc;
use core::ptr;

use x86_64::VirtAddr;

/// 32-bit register access at a byte offset into a mapped region.
pub trait RegisterWindow {
    /// Size of the window in bytes
    fn len(&self) -> usize;

    fn read32(&self, offset: usize) -> u32;

    fn write32(&self, offset: usize, value: u32);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<W: RegisterWindow + ?Sized> RegisterWindow for &W {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }
}

impl<W: RegisterWindow + ?Sized> RegisterWindow for Arc<W> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }
}

/// A mapped MMIO region, accessed with volatile 32-bit loads and stores.
#[derive(Debug, Clone, Copy)]
pub struct MmioWindow {
    base: VirtAddr,
    len: usize,
}

impl MmioWindow {
    /// Wraps an already mapped region.
    ///
    /// # Safety
    ///
    /// `base..base + len` must be mapped uncached device memory that stays
    /// mapped for the lifetime of the window, and `base` must be 4-byte aligned.
    pub unsafe fn new(base: VirtAddr, len: usize) -> Self {
        debug_assert!(base.is_aligned(4u64));
        Self { base, len }
    }

    #[inline]
    fn check(&self, offset: usize) {
        debug_assert!(
            offset % 4 == 0 && offset + 4 <= self.len,
            "mmio: offset {:#x} outside window of {:#x} bytes",
            offset,
            self.len
        );
    }
}

// Safety: the window is plain device memory; serialization is done by the
// controller gate, not by the window.
unsafe impl Send for MmioWindow {}
unsafe impl Sync for MmioWindow {}

impl RegisterWindow for MmioWindow {
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        self.check(offset);
        // Safety: in bounds of the mapping promised by `new`.
        unsafe { ptr::read_volatile((self.base + offset as u64).as_ptr::<u32>()) }
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        self.check(offset);
        // Safety: in bounds of the mapping promised by `new`.
        unsafe { ptr::write_volatile((self.base + offset as u64).as_mut_ptr::<u32>(), value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_mmio_window_over_ram() {
        let mut backing = vec![0u32; 16];
        let base = VirtAddr::from_ptr(backing.as_mut_ptr());
        let window = unsafe { MmioWindow::new(base, backing.len() * 4) };

        window.write32(0x0c, 0x600);
        assert_eq!(window.read32(0x0c), 0x600);
        assert_eq!(window.len(), 64);
        assert_eq!(backing[3], 0x600);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_mmio_window_rejects_out_of_range() {
        let mut backing = vec![0u32; 4];
        let base = VirtAddr::from_ptr(backing.as_mut_ptr());
        let window = unsafe { MmioWindow::new(base, backing.len() * 4) };
        window.read32(0x10);
    }
}
