//! Community and pad group topology
//!
//! Pins are numbered globally across communities. Each community is split into
//! pad groups of at most 32 pins; a group shares one word in every
//! status/enable/lock bitmap, indexed by its `reg_num`.

use alloc::vec::Vec;
use bitflags::bitflags;

use super::regs::{self, PadCfgReg};
use super::soc::{CommunityDesc, PadGroupDesc};
use crate::mmio::RegisterWindow;
use crate::util::{GpioError, GpioResult};

/// Width of the per-group status/enable words
pub const MAX_GROUP_SIZE: u32 = 32;

bitflags! {
    /// Per-community hardware capabilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Features: u32 {
        /// PADCFG2 with debounce, four registers per pad
        const DEBOUNCE = 1 << 0;
        /// 1K pull-down termination available
        const PD_1K = 1 << 1;
    }
}

/// How a pad group's pins are numbered for interrupt clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioBase {
    /// Logical numbers equal hardware numbers
    Match,
    /// The group has no logical numbers
    NoMap,
    /// Logical numbers start at the given value
    At(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadGroup {
    /// Register bank index inside the community
    pub reg_num: u32,
    /// First hardware pin
    pub base: u32,
    pub size: u32,
    /// First PADOWN word of this group
    pub padown_num: u32,
    pub gpio_base: GpioBase,
}

impl PadGroup {
    #[inline]
    pub fn contains(&self, pin: u32) -> bool {
        pin >= self.base && pin < self.base + self.size
    }

    /// Bits of the group's bitmap words that belong to a pin
    #[inline]
    pub fn mask(&self) -> u32 {
        match self.size {
            0 => 0,
            size => regs::genmask(size - 1, 0),
        }
    }

    /// Bit position of `pin` in the group's bitmap words
    #[inline]
    pub fn offset_of(&self, pin: u32) -> u32 {
        pin - self.base
    }

    fn logical_base(&self) -> Option<u32> {
        match self.gpio_base {
            GpioBase::Match => Some(self.base),
            GpioBase::NoMap => None,
            GpioBase::At(n) => Some(n),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Community {
    pub barno: usize,
    pub padown_offset: Option<usize>,
    pub padcfglock_offset: Option<usize>,
    pub hostown_offset: Option<usize>,
    pub ie_offset: usize,
    pub pin_base: u32,
    pub npins: u32,
    pub features: Features,
    pub groups: Vec<PadGroup>,
    /// Offset of the PADCFG array in the window, from PADBAR
    pub pad_regs: usize,
}

impl Community {
    #[inline]
    pub fn contains(&self, pin: u32) -> bool {
        pin >= self.pin_base && pin < self.pin_base + self.npins
    }

    /// Pad index relative to the community
    #[inline]
    pub fn padno(&self, pin: u32) -> u32 {
        pin - self.pin_base
    }

    pub fn group_for(&self, pin: u32) -> GpioResult<&PadGroup> {
        self.group_index_for(pin).map(|(_, group)| group)
    }

    /// Index into `groups` and the pad group covering `pin`.
    pub fn group_index_for(&self, pin: u32) -> GpioResult<(usize, &PadGroup)> {
        self.groups
            .iter()
            .enumerate()
            .find(|(_, g)| g.contains(pin))
            .ok_or_else(|| {
                log::warn!("gpio: failed to find pad group for pin {}", pin);
                GpioError::NotFound
            })
    }

    /// Registers per pad in the PADCFG array
    #[inline]
    pub fn regs_per_pad(&self) -> usize {
        if self.features.contains(Features::DEBOUNCE) {
            4
        } else {
            2
        }
    }

    /// GPI_IS word of a group
    #[inline]
    pub fn status_offset(&self, group: &PadGroup) -> usize {
        regs::GPI_IS + group.reg_num as usize * 4
    }

    /// GPI_IE word of a group
    #[inline]
    pub fn enable_offset(&self, group: &PadGroup) -> usize {
        self.ie_offset + group.reg_num as usize * 4
    }
}

/// A register inside a specific register window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegAddr {
    /// Window index (the community's `barno`)
    pub bar: usize,
    pub offset: usize,
}

impl RegAddr {
    pub fn read<W: RegisterWindow>(self, windows: &[W]) -> GpioResult<u32> {
        let window = windows.get(self.bar).ok_or(GpioError::NotFound)?;
        Ok(window.read32(self.offset))
    }

    pub fn write<W: RegisterWindow>(self, windows: &[W], value: u32) -> GpioResult<()> {
        let window = windows.get(self.bar).ok_or(GpioError::NotFound)?;
        window.write32(self.offset, value);
        Ok(())
    }
}

/// Where a hardware pin lives
#[derive(Debug, Clone, Copy)]
pub struct PinLocation<'a> {
    pub index: usize,
    pub community: &'a Community,
    /// Index of `group` within the community
    pub group_index: usize,
    pub group: &'a PadGroup,
}

impl PinLocation<'_> {
    #[inline]
    pub fn bit(&self, pin: u32) -> u32 {
        self.group.offset_of(pin)
    }

    /// The community's register window
    pub fn window<'w, W>(&self, windows: &'w [W]) -> GpioResult<&'w W> {
        windows.get(self.community.barno).ok_or(GpioError::NotFound)
    }
}

#[derive(Debug, Clone)]
pub struct PinTopology {
    communities: Vec<Community>,
}

impl PinTopology {
    /// Builds communities and their pad groups from chipset descriptors.
    pub fn build(descs: &[CommunityDesc]) -> GpioResult<Self> {
        let mut communities = Vec::new();
        communities.try_reserve_exact(descs.len())?;

        for (i, desc) in descs.iter().enumerate() {
            let groups = build_pad_groups(desc).map_err(|e| {
                log::warn!("gpio: error adding pad groups to community {}", i);
                e
            })?;
            communities.push(Community {
                barno: desc.barno,
                padown_offset: desc.padown_offset,
                padcfglock_offset: desc.padcfglock_offset,
                hostown_offset: desc.hostown_offset,
                ie_offset: desc.ie_offset,
                pin_base: desc.pin_base,
                npins: desc.npins,
                features: desc.features,
                groups,
                pad_regs: 0,
            });
        }

        Ok(Self { communities })
    }

    /// Resolves silicon-dependent layout through each community's window.
    ///
    /// Features not given by the descriptor are probed from REVID, and the
    /// PADCFG array base is read from PADBAR.
    pub fn attach<W: RegisterWindow>(&mut self, windows: &[W]) -> GpioResult<()> {
        for (i, community) in self.communities.iter_mut().enumerate() {
            let Some(window) = windows.get(community.barno) else {
                log::warn!(
                    "gpio: no register window {} for community {}",
                    community.barno,
                    i
                );
                return Err(GpioError::NotFound);
            };

            if community.features.is_empty() {
                let rev = regs::revision(window.read32(regs::REVID));
                if rev >= regs::REVID_DEBOUNCE {
                    community.features |= Features::DEBOUNCE | Features::PD_1K;
                }
            }

            community.pad_regs = window.read32(regs::PADBAR) as usize;
            log::debug!(
                "gpio: community {}: pins {}..{} in {} groups, padbar {:#x}, features {:?}",
                i,
                community.pin_base,
                community.pin_base + community.npins,
                community.groups.len(),
                community.pad_regs,
                community.features
            );
        }
        Ok(())
    }

    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    /// Community index and community covering `pin`.
    pub fn community_for(&self, pin: u32) -> GpioResult<(usize, &Community)> {
        self.communities
            .iter()
            .enumerate()
            .find(|(_, c)| c.contains(pin))
            .ok_or_else(|| {
                log::warn!("gpio: failed to find community for pin {}", pin);
                GpioError::NotFound
            })
    }

    pub fn locate(&self, pin: u32) -> GpioResult<PinLocation<'_>> {
        let (index, community) = self.community_for(pin)?;
        let (group_index, group) = community.group_index_for(pin)?;
        Ok(PinLocation {
            index,
            community,
            group_index,
            group,
        })
    }

    /// Address of one PADCFG register of `pin`.
    ///
    /// `None` for unknown pins and for PADCFG2 on communities without
    /// debounce support.
    pub fn padcfg(&self, pin: u32, reg: PadCfgReg) -> Option<RegAddr> {
        let (_, community) = self.community_for(pin).ok()?;
        if reg == PadCfgReg::Cfg2 && !community.features.contains(Features::DEBOUNCE) {
            return None;
        }
        let padno = community.padno(pin) as usize;
        Some(RegAddr {
            bar: community.barno,
            offset: community.pad_regs + reg.offset() + padno * community.regs_per_pad() * 4,
        })
    }

    /// Number of slots needed to index every hardware pin
    pub fn pin_space(&self) -> usize {
        self.communities
            .iter()
            .map(|c| (c.pin_base + c.npins) as usize)
            .max()
            .unwrap_or(0)
    }

    /// Every hardware pin, community by community
    pub fn pins(&self) -> impl Iterator<Item = u32> + '_ {
        self.communities
            .iter()
            .flat_map(|c| c.pin_base..c.pin_base + c.npins)
    }

    /// Translates a client-visible pin number to the hardware pin.
    pub fn to_hardware(&self, logical: u32) -> GpioResult<u32> {
        self.communities
            .iter()
            .flat_map(|c| c.groups.iter())
            .find_map(|g| {
                let start = g.logical_base()?;
                (logical >= start && logical < start + g.size).then(|| g.base + (logical - start))
            })
            .ok_or_else(|| {
                log::warn!("gpio: no hardware pin for logical pin {}", logical);
                GpioError::NotFound
            })
    }

    /// Client-visible number of a hardware pin; unmapped pins keep their
    /// hardware number.
    pub fn to_logical(&self, pin: u32) -> u32 {
        match self.locate(pin) {
            Ok(loc) => match loc.group.logical_base() {
                Some(start) => start + loc.group.offset_of(pin),
                None => pin,
            },
            Err(_) => pin,
        }
    }
}

/// Builds the pad groups of one community.
///
/// Explicit groups are copied. Otherwise groups of `gpp_size` pins are
/// synthesized left to right, the last one capped at the remainder.
pub fn build_pad_groups(desc: &CommunityDesc) -> GpioResult<Vec<PadGroup>> {
    let mut groups = Vec::new();

    if desc.gpps.is_empty() {
        if desc.gpp_size == 0 {
            return Err(GpioError::InvalidTopology);
        }
        let ngpps = desc.npins.div_ceil(desc.gpp_size);
        groups.try_reserve_exact(ngpps as usize)?;

        let mut remaining = desc.npins;
        for i in 0..ngpps {
            let size = desc.gpp_size.min(remaining);
            remaining -= size;
            groups.push(PadGroup {
                reg_num: i,
                base: desc.pin_base + i * desc.gpp_size,
                size,
                padown_num: 0,
                gpio_base: GpioBase::Match,
            });
        }
    } else {
        check_explicit_groups(desc)?;
        groups.try_reserve_exact(desc.gpps.len())?;
        groups.extend(desc.gpps.iter().map(|g: &PadGroupDesc| PadGroup {
            reg_num: g.reg_num,
            base: g.base,
            size: g.size,
            padown_num: 0,
            gpio_base: g.gpio_base,
        }));
    }

    let mut padown_num = 0;
    for (i, group) in groups.iter_mut().enumerate() {
        if group.size > MAX_GROUP_SIZE {
            log::warn!("gpio: invalid size {} for pad group {}", group.size, i);
            return Err(GpioError::InvalidTopology);
        }

        group.padown_num = padown_num;

        // Older silicon reserves a fixed number of PADOWN words per group.
        padown_num += match desc.gpp_num_padown_regs {
            Some(n) => n,
            None => regs::words_for_bits(group.size * regs::PADOWN_BITS),
        };
    }

    Ok(groups)
}

/// Explicit groups must tile the community range in ascending order.
fn check_explicit_groups(desc: &CommunityDesc) -> GpioResult<()> {
    let mut next = desc.pin_base;
    for g in desc.gpps {
        if g.size == 0 || g.base != next {
            log::warn!(
                "gpio: pad group at pin {} does not continue community layout at {}",
                g.base,
                next
            );
            return Err(GpioError::InvalidTopology);
        }
        next = g.base + g.size;
    }
    if next != desc.pin_end() {
        log::warn!(
            "gpio: pad groups end at pin {}, community ends at {}",
            next,
            desc.pin_end()
        );
        return Err(GpioError::InvalidTopology);
    }
    Ok(())
}
