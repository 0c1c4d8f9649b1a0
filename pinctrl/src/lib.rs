//! Pin controller core for Intel PCH GPIO communities.
//!
//! Resolves pins to their pad configuration registers, guards firmware-owned
//! and locked pads, programs and routes per-pin interrupts, and keeps pad
//! state across power transitions.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod gpio;
pub mod mmio;
pub mod sync;
pub mod util;

#[cfg(test)]
mod testing;

pub use gpio::irq::{InterruptClient, IrqType, OwnerId};
pub use gpio::soc::SocData;
pub use gpio::{GpioController, PowerState};
pub use mmio::{MmioWindow, RegisterWindow};
#[cfg(target_arch = "x86_64")]
pub use sync::X86Interrupts;
pub use sync::{IrqControl, NoIrqControl};
pub use util::{GpioError, GpioResult};
