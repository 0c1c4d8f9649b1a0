//! Suspend/resume shadow state
//!
//! Pad configuration of pins the driver uses, plus every group's interrupt
//! enable word, is saved on suspend and written back on resume if firmware
//! changed it in between.

use alloc::vec::Vec;

use super::ownership::OwnershipGuard;
use super::regs::{PadCfg0, PadCfgReg};
use super::topology::{PinTopology, RegAddr};
use crate::mmio::RegisterWindow;
use crate::util::{GpioError, GpioResult};

/// Saved PADCFG registers of one pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadState {
    /// Without GPIORXSTATE
    pub padcfg0: u32,
    pub padcfg1: u32,
    pub padcfg2: Option<u32>,
}

pub struct PowerContext {
    pads: Vec<Option<PadState>>,
    /// Enable word per pad group, per community
    intmask: Vec<Vec<u32>>,
}

impl PowerContext {
    pub fn new(topology: &PinTopology) -> GpioResult<Self> {
        let mut pads = Vec::new();
        pads.try_reserve_exact(topology.pin_space())?;
        pads.resize(topology.pin_space(), None);

        let mut intmask = Vec::new();
        intmask.try_reserve_exact(topology.communities().len())?;
        for community in topology.communities() {
            let mut words = Vec::new();
            words.try_reserve_exact(community.groups.len())?;
            words.resize(community.groups.len(), 0);
            intmask.push(words);
        }

        Ok(Self { pads, intmask })
    }

    /// Saved state of `pin` from the last suspend
    pub fn pad(&self, pin: u32) -> Option<&PadState> {
        self.pads.get(pin as usize).and_then(Option::as_ref)
    }

    /// Whether `pin`'s enable bit was set when state was last saved
    pub fn was_enabled(&self, topology: &PinTopology, pin: u32) -> bool {
        let Ok(loc) = topology.locate(pin) else {
            return false;
        };
        self.intmask
            .get(loc.index)
            .and_then(|words| words.get(loc.group_index))
            .is_some_and(|word| word & (1 << loc.bit(pin)) != 0)
    }

    /// Saves state ahead of a power transition.
    ///
    /// Only pins that are host-owned, unlocked and `in_use` get their pad
    /// configuration saved.
    pub fn suspend<W, F>(
        &mut self,
        topology: &PinTopology,
        windows: &[W],
        in_use: F,
    ) -> GpioResult<()>
    where
        W: RegisterWindow,
        F: Fn(u32) -> bool,
    {
        let guard = OwnershipGuard::new(topology, windows);

        for pin in topology.pins() {
            let Some(slot) = self.pads.get_mut(pin as usize) else {
                continue;
            };
            *slot = None;

            if !guard.pad_owned_by_host(pin) || guard.pad_locked(pin) || !in_use(pin) {
                continue;
            }

            let padcfg0 = read_padcfg(topology, windows, pin, PadCfgReg::Cfg0)?;
            let padcfg1 = read_padcfg(topology, windows, pin, PadCfgReg::Cfg1)?;
            let padcfg2 = match topology.padcfg(pin, PadCfgReg::Cfg2) {
                Some(reg) => Some(reg.read(windows)?),
                None => None,
            };

            *slot = Some(PadState {
                padcfg0: padcfg0 & !PadCfg0::GPIORXSTATE.bits(),
                padcfg1,
                padcfg2,
            });
        }

        for (community, words) in topology.communities().iter().zip(self.intmask.iter_mut()) {
            let window = windows.get(community.barno).ok_or(GpioError::NotFound)?;
            for (group, word) in community.groups.iter().zip(words.iter_mut()) {
                *word = window.read32(community.enable_offset(group));
            }
        }

        Ok(())
    }

    /// Writes saved state back after a power transition.
    ///
    /// Every group is first masked with its status cleared. Saved pad
    /// registers are written only where they differ from the live value,
    /// and the live GPIORXSTATE is kept.
    pub fn resume<W: RegisterWindow>(
        &self,
        topology: &PinTopology,
        windows: &[W],
    ) -> GpioResult<()> {
        for community in topology.communities() {
            let window = windows.get(community.barno).ok_or(GpioError::NotFound)?;
            for group in &community.groups {
                window.write32(community.enable_offset(group), 0);
                window.write32(community.status_offset(group), u32::MAX);
            }
        }

        for pin in topology.pins() {
            let Some(state) = self.pad(pin) else {
                continue;
            };

            let rxstate = PadCfg0::GPIORXSTATE.bits();
            let reg = padcfg_addr(topology, pin, PadCfgReg::Cfg0)?;
            let live = reg.read(windows)?;
            if live & !rxstate != state.padcfg0 {
                reg.write(windows, state.padcfg0 | (live & rxstate))?;
                log::debug!("gpio: restored pin {} padcfg0 {:#010x}", pin, state.padcfg0);
            }

            restore(topology, windows, pin, PadCfgReg::Cfg1, state.padcfg1)?;
            if let Some(value) = state.padcfg2 {
                restore(topology, windows, pin, PadCfgReg::Cfg2, value)?;
            }
        }

        for (community, words) in topology.communities().iter().zip(self.intmask.iter()) {
            let window = windows.get(community.barno).ok_or(GpioError::NotFound)?;
            for (group, &word) in community.groups.iter().zip(words.iter()) {
                window.write32(community.enable_offset(group), word);
            }
        }

        Ok(())
    }

    /// Frees the shadow tables.
    pub fn release(self) {
        log::trace!("gpio: releasing power context for {} pins", self.pads.len());
    }
}

fn padcfg_addr(topology: &PinTopology, pin: u32, reg: PadCfgReg) -> GpioResult<RegAddr> {
    topology.padcfg(pin, reg).ok_or(GpioError::NotFound)
}

fn read_padcfg<W: RegisterWindow>(
    topology: &PinTopology,
    windows: &[W],
    pin: u32,
    reg: PadCfgReg,
) -> GpioResult<u32> {
    padcfg_addr(topology, pin, reg)?.read(windows)
}

fn restore<W: RegisterWindow>(
    topology: &PinTopology,
    windows: &[W],
    pin: u32,
    reg: PadCfgReg,
    saved: u32,
) -> GpioResult<()> {
    let addr = padcfg_addr(topology, pin, reg)?;
    if addr.read(windows)? != saved {
        addr.write(windows, saved)?;
        log::debug!("gpio: restored pin {} {:?} {:#010x}", pin, reg, saved);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::regs;
    use crate::gpio::soc::CommunityDesc;
    use crate::gpio::topology::Features;
    use crate::testing::FakeWindow;
    use alloc::vec;

    const PADOWN: usize = 0x20;
    const LOCK: usize = 0x80;
    const IE: usize = 0x120;
    const PADBAR: usize = 0x400;

    fn desc(features: Features) -> CommunityDesc {
        CommunityDesc {
            barno: 0,
            padown_offset: Some(PADOWN),
            padcfglock_offset: Some(LOCK),
            hostown_offset: Some(0xc0),
            ie_offset: IE,
            pin_base: 0,
            npins: 16,
            gpp_size: 8,
            gpp_num_padown_regs: None,
            gpps: &[],
            features,
        }
    }

    fn setup(features: Features) -> (PinTopology, FakeWindow) {
        let window = FakeWindow::new(0x1000);
        window.poke(regs::PADBAR, PADBAR as u32);
        let mut topo = PinTopology::build(&[desc(features)]).unwrap();
        topo.attach(&[&window]).unwrap();
        (topo, window)
    }

    fn padcfg(pin: usize, reg: usize) -> usize {
        PADBAR + pin * 16 + reg * 4
    }

    #[test]
    fn test_suspend_selects_pins() {
        let (topo, window) = setup(Features::DEBOUNCE);
        let windows = [&window];
        let mut ctx = PowerContext::new(&topo).unwrap();

        window.poke(padcfg(1, 0), 0x4400_0103);
        window.poke(padcfg(1, 1), 0x3c00);
        window.poke(padcfg(1, 2), 0x7);
        // pin 2 firmware-owned, pin 3 locked
        window.poke(PADOWN, 0xf << 8);
        window.poke(LOCK, 1 << 3);

        ctx.suspend(&topo, &windows, |pin| pin != 4).unwrap();

        assert_eq!(
            ctx.pad(1),
            Some(&PadState {
                padcfg0: 0x4400_0101,
                padcfg1: 0x3c00,
                padcfg2: Some(0x7),
            })
        );
        assert!(ctx.pad(0).is_some());
        assert_eq!(ctx.pad(2), None);
        assert_eq!(ctx.pad(3), None);
        assert_eq!(ctx.pad(4), None);
    }

    #[test]
    fn test_no_padcfg2_without_debounce() {
        let (topo, window) = setup(Features::PD_1K);
        let windows = [&window];
        let mut ctx = PowerContext::new(&topo).unwrap();
        ctx.suspend(&topo, &windows, |_| true).unwrap();
        assert_eq!(ctx.pad(9).unwrap().padcfg2, None);
    }

    #[test]
    fn test_round_trip_restores_registers() {
        let (topo, window) = setup(Features::DEBOUNCE);
        let windows = [&window];
        let mut ctx = PowerContext::new(&topo).unwrap();

        window.poke(padcfg(9, 0), 0x4400_0100);
        window.poke(padcfg(9, 1), 0x3c00);
        window.poke(padcfg(9, 2), 0x9);
        window.poke(IE, 0x81);
        window.poke(IE + 4, 1 << 1);

        ctx.suspend(&topo, &windows, |pin| pin == 9).unwrap();
        assert!(ctx.was_enabled(&topo, 0));
        assert!(ctx.was_enabled(&topo, 9));
        assert!(!ctx.was_enabled(&topo, 10));

        // firmware scribbles over the pad; the input now reads high
        window.poke(padcfg(9, 0), 0x0000_0002);
        window.poke(padcfg(9, 1), 0);
        window.poke(IE, 0);
        window.poke(IE + 4, 0);
        window.clear_log();

        ctx.resume(&topo, &windows).unwrap();

        assert_eq!(window.peek(padcfg(9, 0)), 0x4400_0102);
        assert_eq!(window.peek(padcfg(9, 1)), 0x3c00);
        assert_eq!(window.peek(padcfg(9, 2)), 0x9);
        assert_eq!(window.peek(IE), 0x81);
        assert_eq!(window.peek(IE + 4), 1 << 1);

        // unchanged PADCFG2 is not rewritten
        assert!(!window
            .writes()
            .iter()
            .any(|&(offset, _)| offset == padcfg(9, 2)));
    }

    #[test]
    fn test_resume_masks_and_clears_first() {
        let (topo, window) = setup(Features::DEBOUNCE);
        let windows = [&window];
        let ctx = PowerContext::new(&topo).unwrap();

        window.clear_log();
        ctx.resume(&topo, &windows).unwrap();

        assert_eq!(
            window.writes(),
            vec![
                (IE, 0),
                (regs::GPI_IS, u32::MAX),
                (IE + 4, 0),
                (regs::GPI_IS + 4, u32::MAX),
                (IE, 0),
                (IE + 4, 0),
            ]
        );
        ctx.release();
    }

    #[test]
    fn test_unchanged_pad_is_not_written() {
        let (topo, window) = setup(Features::DEBOUNCE);
        let windows = [&window];
        let mut ctx = PowerContext::new(&topo).unwrap();

        window.poke(padcfg(5, 0), 0x4400_0100);
        ctx.suspend(&topo, &windows, |pin| pin == 5).unwrap();

        // only the live input level changed
        window.poke(padcfg(5, 0), 0x4400_0102);
        window.clear_log();
        ctx.resume(&topo, &windows).unwrap();

        assert!(!window
            .writes()
            .iter()
            .any(|&(offset, _)| (padcfg(5, 0)..padcfg(6, 0)).contains(&offset)));
        assert_eq!(window.peek(padcfg(5, 0)), 0x4400_0102);
    }
}
