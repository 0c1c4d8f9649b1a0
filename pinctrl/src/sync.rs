//! Serialization gate for the pin controller
//!
//! Every register read-modify-write sequence and every dispatch pass runs
//! under one `IrqSafeMutex`. The lock masks local interrupts while held so
//! that the raw interrupt handler can never spin on a lock owned by the code
//! it interrupted.

use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};
use spin::{Mutex, MutexGuard};

/// Local interrupt masking used by `IrqSafeMutex`.
pub trait IrqControl {
    /// Disables local interrupts, returning whether they were enabled.
    fn disable() -> bool;
    /// Re-enables local interrupts if `was_enabled`.
    fn restore(was_enabled: bool);
}

/// Masks interrupts with `cli`/`sti` on the executing CPU.
#[cfg(target_arch = "x86_64")]
pub struct X86Interrupts;

#[cfg(target_arch = "x86_64")]
impl IrqControl for X86Interrupts {
    #[inline]
    fn disable() -> bool {
        let was = x86_64::instructions::interrupts::are_enabled();
        x86_64::instructions::interrupts::disable();
        was
    }

    #[inline]
    fn restore(was_enabled: bool) {
        if was_enabled {
            x86_64::instructions::interrupts::enable();
        }
    }
}

/// For hosted environments where the raw interrupt is already delivered on a
/// thread (and for unit tests).
pub struct NoIrqControl;

impl IrqControl for NoIrqControl {
    #[inline]
    fn disable() -> bool {
        false
    }

    #[inline]
    fn restore(_was_enabled: bool) {}
}

/// Mutex that keeps local interrupts disabled while locked.
pub struct IrqSafeMutex<T, I: IrqControl> {
    inner: Mutex<T>,
    _irq: PhantomData<fn() -> I>,
}

pub struct IrqSafeGuard<'a, T, I: IrqControl> {
    irq_was_enabled: bool,
    guard: ManuallyDrop<MutexGuard<'a, T>>,
    _irq: PhantomData<fn() -> I>,
}

impl<T, I: IrqControl> IrqSafeMutex<T, I> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
            _irq: PhantomData,
        }
    }

    pub fn lock(&self) -> IrqSafeGuard<'_, T, I> {
        let irq_was_enabled = I::disable();
        let guard = self.inner.lock();
        IrqSafeGuard {
            irq_was_enabled,
            guard: ManuallyDrop::new(guard),
            _irq: PhantomData,
        }
    }

    /// Tries to acquire the lock without blocking
    pub fn try_lock(&self) -> Option<IrqSafeGuard<'_, T, I>> {
        let irq_was_enabled = I::disable();
        if let Some(guard) = self.inner.try_lock() {
            Some(IrqSafeGuard {
                irq_was_enabled,
                guard: ManuallyDrop::new(guard),
                _irq: PhantomData,
            })
        } else {
            I::restore(irq_was_enabled);
            None
        }
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<'a, T, I: IrqControl> Deref for IrqSafeGuard<'a, T, I> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<'a, T, I: IrqControl> DerefMut for IrqSafeGuard<'a, T, I> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<'a, T, I: IrqControl> Drop for IrqSafeGuard<'a, T, I> {
    fn drop(&mut self) {
        // Release the lock before interrupts come back on.
        // Safety: the guard is never touched again after this point.
        unsafe {
            ManuallyDrop::drop(&mut self.guard);
        }
        I::restore(self.irq_was_enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    static DISABLED: AtomicUsize = AtomicUsize::new(0);
    static RESTORED: AtomicUsize = AtomicUsize::new(0);

    struct CountingIrq;

    impl IrqControl for CountingIrq {
        fn disable() -> bool {
            DISABLED.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn restore(was_enabled: bool) {
            if was_enabled {
                RESTORED.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_lock_masks_and_restores() {
        let m: IrqSafeMutex<u32, CountingIrq> = IrqSafeMutex::new(1);
        {
            let mut g = m.lock();
            *g += 1;
            assert!(m.try_lock().is_none());
        }
        assert_eq!(*m.lock(), 2);
        let disabled = DISABLED.load(Ordering::SeqCst);
        let restored = RESTORED.load(Ordering::SeqCst);
        assert_eq!(disabled, 3);
        assert_eq!(restored, 3);
    }
}
