//! Pad ownership, ACPI mode and lock predicates
//!
//! When the topology does not know a pin, every predicate answers the way
//! that keeps the driver's hands off it: firmware-owned, ACPI mode, locked.

use super::regs;
use super::topology::{Community, PadGroup, PinTopology};
use crate::mmio::RegisterWindow;

pub struct OwnershipGuard<'a, W> {
    topology: &'a PinTopology,
    windows: &'a [W],
}

impl<'a, W: RegisterWindow> OwnershipGuard<'a, W> {
    pub fn new(topology: &'a PinTopology, windows: &'a [W]) -> Self {
        Self { topology, windows }
    }

    fn locate(&self, pin: u32) -> Option<(&'a Community, Option<&'a PadGroup>, &'a W)> {
        let (_, community) = self.topology.community_for(pin).ok()?;
        let window = self.windows.get(community.barno)?;
        Some((community, community.group_for(pin).ok(), window))
    }

    /// Whether the pad is owned by the host rather than by firmware.
    pub fn pad_owned_by_host(&self, pin: u32) -> bool {
        let Some((community, group, window)) = self.locate(pin) else {
            return false;
        };
        let Some(padown_offset) = community.padown_offset else {
            return true;
        };
        let Some(group) = group else {
            return false;
        };

        let gpp_offset = group.offset_of(pin);
        let offset = padown_offset
            + group.padown_num as usize * 4
            + regs::padown_word(gpp_offset) as usize * 4;

        window.read32(offset) & regs::padown_mask(gpp_offset) == 0
    }

    /// Whether the pad is in ACPI mode.
    ///
    /// HOSTSW_OWN set means GPIO driver mode; clear means ACPI owns the pad
    /// and GPI_IS is not updated for it.
    pub fn pad_acpi_mode(&self, pin: u32) -> bool {
        let Some((community, group, window)) = self.locate(pin) else {
            return true;
        };
        let Some(hostown_offset) = community.hostown_offset else {
            return false;
        };
        let Some(group) = group else {
            return true;
        };

        let offset = hostown_offset + group.reg_num as usize * 4;
        window.read32(offset) & regs::bit(group.offset_of(pin)) == 0
    }

    /// Whether PADCFGLOCK or PADCFGLOCKTX is set for the pad.
    pub fn pad_locked(&self, pin: u32) -> bool {
        let Some((community, group, window)) = self.locate(pin) else {
            return true;
        };
        let Some(lock_offset) = community.padcfglock_offset else {
            return false;
        };
        let Some(group) = group else {
            return true;
        };

        let mask = regs::bit(group.offset_of(pin));
        let offset = lock_offset + group.reg_num as usize * 8;

        // Fully or partially locked pads are left alone.
        window.read32(offset) & mask != 0 || window.read32(offset + 4) & mask != 0
    }
}
