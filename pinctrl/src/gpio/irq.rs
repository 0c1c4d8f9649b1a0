//! Per-pin interrupt routing
//!
//! One slot per hardware pin holds the client registration and the trigger
//! type last programmed into the pad. Dispatch walks every pad group's
//! status and enable words and fans asserted pins out to their clients.

use alloc::sync::Arc;
use alloc::vec::Vec;
use bitflags::bitflags;

use super::ownership::OwnershipGuard;
use super::regs::{self, PadCfgReg, RxEvCfg};
use super::topology::PinTopology;
use crate::mmio::RegisterWindow;
use crate::util::{GpioError, GpioResult};

bitflags! {
    /// Requested trigger, in the usual IRQ_TYPE encoding
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqType: u32 {
        const EDGE_RISING = 1 << 0;
        const EDGE_FALLING = 1 << 1;
        const EDGE_BOTH = Self::EDGE_RISING.bits() | Self::EDGE_FALLING.bits();
        const LEVEL_HIGH = 1 << 2;
        const LEVEL_LOW = 1 << 3;
        const LEVEL_MASK = Self::LEVEL_HIGH.bits() | Self::LEVEL_LOW.bits();
    }
}

impl IrqType {
    /// RXEVCFG and RXINV encoding of this trigger.
    ///
    /// Checked in order: both edges, falling, rising, any level. Anything
    /// else disables RX events.
    pub fn rx_event(self) -> (RxEvCfg, bool) {
        if self.contains(IrqType::EDGE_BOTH) {
            (RxEvCfg::EdgeBoth, false)
        } else if self.contains(IrqType::EDGE_FALLING) {
            (RxEvCfg::Edge, true)
        } else if self.contains(IrqType::EDGE_RISING) {
            (RxEvCfg::Edge, false)
        } else if self.intersects(IrqType::LEVEL_MASK) {
            (RxEvCfg::Level, self.contains(IrqType::LEVEL_LOW))
        } else {
            (RxEvCfg::Disabled, false)
        }
    }

    /// Trigger programmed in a PADCFG0 value
    pub fn from_padcfg0(padcfg0: u32) -> Self {
        match regs::rx_event(padcfg0) {
            (RxEvCfg::EdgeBoth, _) => IrqType::EDGE_BOTH,
            (RxEvCfg::Edge, true) => IrqType::EDGE_FALLING,
            (RxEvCfg::Edge, false) => IrqType::EDGE_RISING,
            (RxEvCfg::Level, true) => IrqType::LEVEL_LOW,
            (RxEvCfg::Level, false) => IrqType::LEVEL_HIGH,
            (RxEvCfg::Disabled, _) => IrqType::empty(),
        }
    }

    pub fn is_level(self) -> bool {
        self.rx_event().0 == RxEvCfg::Level
    }
}

/// Identifies the driver that holds a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u64);

/// Receiver of a pin's interrupts.
///
/// Called with the controller's lock held and local interrupts masked; an
/// implementation must not call back into the controller.
pub trait InterruptClient: Send + Sync {
    /// `pin` is the logical number the client registered with.
    fn handle_interrupt(&self, pin: u32);
}

impl<F> InterruptClient for F
where
    F: Fn(u32) + Send + Sync,
{
    fn handle_interrupt(&self, pin: u32) {
        self(pin)
    }
}

#[derive(Clone)]
pub struct Registration {
    pub owner: OwnerId,
    pub client: Arc<dyn InterruptClient>,
    pub logical: u32,
}

#[derive(Clone, Default)]
pub struct PinSlot {
    pub registration: Option<Registration>,
    pub trigger: Option<IrqType>,
}

pub struct InterruptRouter {
    slots: Vec<PinSlot>,
}

impl InterruptRouter {
    /// Allocates one slot per hardware pin of `topology`.
    pub fn new(topology: &PinTopology) -> GpioResult<Self> {
        let len = topology.pin_space();
        let mut slots = Vec::new();
        slots.try_reserve_exact(len)?;
        slots.resize_with(len, PinSlot::default);
        Ok(Self { slots })
    }

    pub fn slot(&self, pin: u32) -> Option<&PinSlot> {
        self.slots.get(pin as usize)
    }

    fn slot_mut(&mut self, pin: u32) -> GpioResult<&mut PinSlot> {
        self.slots.get_mut(pin as usize).ok_or(GpioError::NotFound)
    }

    pub fn is_registered(&self, pin: u32) -> bool {
        self.slot(pin).is_some_and(|s| s.registration.is_some())
    }

    /// Hardware pins that currently have a client
    pub fn registered_pins(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.registration.is_some())
            .map(|(pin, _)| pin as u32)
    }

    /// Programs the pad's RX event configuration for `ty`.
    pub fn set_type<W: RegisterWindow>(
        &mut self,
        topology: &PinTopology,
        windows: &[W],
        pin: u32,
        ty: IrqType,
    ) -> GpioResult<()> {
        let reg = topology
            .padcfg(pin, PadCfgReg::Cfg0)
            .ok_or(GpioError::NotFound)?;

        // GPI_IS is not updated for pads in ACPI mode.
        if OwnershipGuard::new(topology, windows).pad_acpi_mode(pin) {
            log::warn!("gpio: pin {} cannot be used as IRQ", pin);
            return Err(GpioError::ModeConflict);
        }

        let (cfg, invert) = ty.rx_event();
        let value = reg.read(windows)?;
        reg.write(windows, regs::with_rx_event(value, cfg, invert))?;

        self.slot_mut(pin)?.trigger = Some(ty);
        Ok(())
    }

    /// Recorded trigger, or the one currently programmed in PADCFG0.
    pub fn interrupt_type<W: RegisterWindow>(
        &self,
        topology: &PinTopology,
        windows: &[W],
        pin: u32,
    ) -> GpioResult<IrqType> {
        if let Some(ty) = self.slot(pin).and_then(|s| s.trigger) {
            return Ok(ty);
        }
        let reg = topology
            .padcfg(pin, PadCfgReg::Cfg0)
            .ok_or(GpioError::NotFound)?;
        Ok(IrqType::from_padcfg0(reg.read(windows)?))
    }

    /// Clears pending status, then sets the pin's enable bit.
    pub fn enable<W: RegisterWindow>(
        &self,
        topology: &PinTopology,
        windows: &[W],
        pin: u32,
    ) -> GpioResult<()> {
        let loc = topology.locate(pin)?;
        let window = loc.window(windows)?;
        let mask = regs::bit(loc.bit(pin));

        // Clear first so a stale event does not fire on enable.
        window.write32(loc.community.status_offset(loc.group), mask);

        let ie = loc.community.enable_offset(loc.group);
        window.write32(ie, window.read32(ie) | mask);
        Ok(())
    }

    pub fn mask_unmask<W: RegisterWindow>(
        &self,
        topology: &PinTopology,
        windows: &[W],
        pin: u32,
        mask: bool,
    ) -> GpioResult<()> {
        let loc = topology.locate(pin)?;
        let window = loc.window(windows)?;
        let ie = loc.community.enable_offset(loc.group);
        let bit = regs::bit(loc.bit(pin));

        let value = window.read32(ie);
        window.write32(ie, if mask { value & !bit } else { value | bit });
        Ok(())
    }

    /// Installs `client` for `pin`. The pin is not armed.
    pub fn register(
        &mut self,
        topology: &PinTopology,
        pin: u32,
        registration: Registration,
    ) -> GpioResult<()> {
        topology.locate(pin)?;
        let slot = self.slot_mut(pin)?;
        if slot.registration.is_some() {
            return Err(GpioError::AlreadyRegistered);
        }
        slot.registration = Some(registration);
        Ok(())
    }

    /// Masks `pin` and forgets its client and trigger. Unregistering a free
    /// pin is not an error.
    pub fn unregister<W: RegisterWindow>(
        &mut self,
        topology: &PinTopology,
        windows: &[W],
        pin: u32,
    ) -> GpioResult<()> {
        self.mask_unmask(topology, windows, pin, true)?;
        let slot = self.slot_mut(pin)?;
        if let Some(registration) = slot.registration.take() {
            log::debug!("gpio: pin {} released by {:?}", pin, registration.owner);
        }
        slot.trigger = None;
        Ok(())
    }

    /// Drops every registration, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let mut dropped = 0;
        for slot in self.slots.iter_mut() {
            if slot.registration.take().is_some() {
                dropped += 1;
            }
            slot.trigger = None;
        }
        dropped
    }

    /// Services every asserted and enabled pin, returning the number of
    /// client callbacks made.
    ///
    /// Edge pins are acknowledged before their client runs. Level pins are
    /// re-enabled afterwards, which clears their status. An asserted pin
    /// nobody registered is masked.
    pub fn dispatch<W: RegisterWindow>(&self, topology: &PinTopology, windows: &[W]) -> usize {
        let mut fired = 0;

        for community in topology.communities() {
            let Some(window) = windows.get(community.barno) else {
                continue;
            };

            for group in &community.groups {
                let status = community.status_offset(group);
                let ie = community.enable_offset(group);
                let pending = window.read32(status);
                let enabled = window.read32(ie);

                let mut asserted = pending & enabled;
                let stray = asserted & !group.mask();
                if stray != 0 {
                    log::warn!(
                        "gpio: pad group {} at pin {}: ignoring bits {:#x} past its {} pins",
                        group.reg_num,
                        group.base,
                        stray,
                        group.size
                    );
                    asserted &= group.mask();
                }

                while asserted != 0 {
                    let bit = asserted.trailing_zeros();
                    asserted &= asserted - 1;
                    let pin = group.base + bit;

                    let Some(slot) = self.slot(pin) else {
                        continue;
                    };
                    let Some(registration) = &slot.registration else {
                        log::warn!(
                            "gpio: masking unclaimed pin {} (logical {})",
                            pin,
                            topology.to_logical(pin)
                        );
                        window.write32(ie, window.read32(ie) & !regs::bit(bit));
                        continue;
                    };

                    let level = slot.trigger.is_some_and(IrqType::is_level);
                    if !level {
                        window.write32(status, regs::bit(bit));
                    }

                    registration.client.handle_interrupt(registration.logical);
                    fired += 1;

                    if level {
                        if let Err(e) = self.enable(topology, windows, pin) {
                            log::warn!(
                                "gpio: failed to re-enable pin {} for {:?}: {}",
                                pin,
                                registration.owner,
                                e
                            );
                        }
                    }
                }
            }
        }

        fired
    }
}
