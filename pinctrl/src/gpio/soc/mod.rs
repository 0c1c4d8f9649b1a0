//! Static chipset descriptors
//!
//! A chipset is described by pins, pin groups, functions and communities.
//! Everything here is plain data; the topology and controller consume it.

#[cfg(feature = "soc-cannonlake-h")]
pub mod cannonlake_h;

use crate::gpio::topology::{Features, GpioBase};
use crate::util::{GpioError, GpioResult};

/// A named hardware pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinDesc {
    pub number: u32,
    pub name: &'static str,
}

impl PinDesc {
    pub const fn new(number: u32, name: &'static str) -> Self {
        Self { number, name }
    }
}

/// A set of pins used together by one function, with its pad mode
#[derive(Debug, Clone, Copy)]
pub struct PinGroup {
    pub name: &'static str,
    pub pins: &'static [u32],
    pub mode: u32,
}

/// A native function and the groups it can be routed to
#[derive(Debug, Clone, Copy)]
pub struct Function {
    pub name: &'static str,
    pub groups: &'static [&'static str],
}

/// Explicit pad group layout for communities whose groups are irregular
#[derive(Debug, Clone, Copy)]
pub struct PadGroupDesc {
    pub reg_num: u32,
    pub base: u32,
    pub size: u32,
    pub gpio_base: GpioBase,
}

impl PadGroupDesc {
    /// Group covering pins `start..=end`
    pub const fn new(reg_num: u32, start: u32, end: u32, gpio_base: GpioBase) -> Self {
        Self {
            reg_num,
            base: start,
            size: end - start + 1,
            gpio_base,
        }
    }
}

/// One community as the chipset table describes it
#[derive(Debug, Clone, Copy)]
pub struct CommunityDesc {
    /// Register window index
    pub barno: usize,
    pub padown_offset: Option<usize>,
    pub padcfglock_offset: Option<usize>,
    pub hostown_offset: Option<usize>,
    pub ie_offset: usize,
    pub pin_base: u32,
    pub npins: u32,
    /// Nominal synthesized group size, used when `gpps` is empty
    pub gpp_size: u32,
    /// Fixed PADOWN words per group on older silicon
    pub gpp_num_padown_regs: Option<u32>,
    pub gpps: &'static [PadGroupDesc],
    /// Empty means "probe from REVID"
    pub features: Features,
}

impl CommunityDesc {
    pub const fn pin_end(&self) -> u32 {
        self.pin_base + self.npins
    }

    pub const fn contains(&self, pin: u32) -> bool {
        pin >= self.pin_base && pin < self.pin_end()
    }
}

/// Everything the controller needs to know about one chipset
#[derive(Debug, Clone, Copy)]
pub struct SocData {
    pub name: &'static str,
    pub pins: &'static [PinDesc],
    pub groups: &'static [PinGroup],
    pub functions: &'static [Function],
    pub communities: &'static [CommunityDesc],
}

impl SocData {
    /// Checks that the tables are present and agree with each other.
    pub fn validate(&self) -> GpioResult<()> {
        if self.pins.is_empty()
            || self.groups.is_empty()
            || self.functions.is_empty()
            || self.communities.is_empty()
        {
            log::warn!("gpio: {}: missing platform data", self.name);
            return Err(GpioError::MissingPlatformData);
        }

        for group in self.groups {
            if group.mode == 0 {
                log::warn!(
                    "gpio: {}: group {} selects GPIO mode, not a native function",
                    self.name,
                    group.name
                );
                return Err(GpioError::MissingPlatformData);
            }
            if let Some(pin) = group
                .pins
                .iter()
                .find(|&&pin| !self.communities.iter().any(|c| c.contains(pin)))
            {
                log::warn!(
                    "gpio: {}: group {} uses pin {} outside every community",
                    self.name,
                    group.name,
                    pin
                );
                return Err(GpioError::MissingPlatformData);
            }
        }

        for function in self.functions {
            if let Some(missing) = function
                .groups
                .iter()
                .find(|name| self.group(name).is_none())
            {
                log::warn!(
                    "gpio: {}: function {} names unknown group {}",
                    self.name,
                    function.name,
                    missing
                );
                return Err(GpioError::MissingPlatformData);
            }
        }

        Ok(())
    }

    pub fn pin_name(&self, pin: u32) -> Option<&'static str> {
        self.pins.iter().find(|p| p.number == pin).map(|p| p.name)
    }

    pub fn group(&self, name: &str) -> Option<&'static PinGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn group_pins(&self, name: &str) -> Option<&'static [u32]> {
        self.group(name).map(|g| g.pins)
    }

    pub fn function_groups(&self, name: &str) -> Option<&'static [&'static str]> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.groups)
    }
}
