//! Intel GPIO community register layout
//!
//! Offsets are bytes from the start of a community window unless stated
//! otherwise. Bit helpers operate on `u32` register words.

use bitflags::bitflags;

/// Revision ID, bits 31:16
pub const REVID: usize = 0x000;
pub const REVID_SHIFT: u32 = 16;
pub const REVID_MASK: u32 = genmask(31, 16);
/// Pad configuration base address register, offset of the PADCFG array
pub const PADBAR: usize = 0x00c;
/// GPI interrupt status, one write-1-to-clear word per pad group
pub const GPI_IS: usize = 0x100;

/// Revision from which communities carry PADCFG2 and the 1K pull-down
pub const REVID_DEBOUNCE: u32 = 0x94;

pub const PADOWN_BITS: u32 = 4;

/// Debounce clock period in ns
pub const DEBOUNCE_PERIOD_NS: u32 = 31250;

/// Single-bit mask
#[inline]
pub const fn bit(n: u32) -> u32 {
    1 << n
}

/// Contiguous mask covering bits `h..=l`, `h >= l`, both below 32
#[inline]
pub const fn genmask(h: u32, l: u32) -> u32 {
    (u32::MAX << l) & (u32::MAX >> (31 - h))
}

/// Number of 32-bit words needed to hold `n` bits
#[inline]
pub const fn words_for_bits(n: u32) -> u32 {
    n.div_ceil(32)
}

/// PADOWN packs eight 4-bit owner fields per word.
#[inline]
pub const fn padown_word(gpp_offset: u32) -> u32 {
    gpp_offset / 8
}

#[inline]
pub const fn padown_shift(gpp_offset: u32) -> u32 {
    (gpp_offset % 8) * PADOWN_BITS
}

#[inline]
pub const fn padown_mask(gpp_offset: u32) -> u32 {
    0xf << padown_shift(gpp_offset)
}

/// Per-pin configuration registers, in PADCFG array order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadCfgReg {
    Cfg0 = 0,
    Cfg1 = 1,
    /// Present only on communities with debounce support
    Cfg2 = 2,
}

impl PadCfgReg {
    /// Byte offset of the register inside a pad's PADCFG block
    #[inline]
    pub const fn offset(self) -> usize {
        self as usize * 4
    }
}

bitflags! {
    /// PADCFG0 control bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PadCfg0: u32 {
        const GPIOTXSTATE = 1 << 0;
        /// Live input level, read-only
        const GPIORXSTATE = 1 << 1;
        const GPIOTXDIS = 1 << 8;
        const GPIORXDIS = 1 << 9;
        const GPIROUTNMI = 1 << 17;
        const GPIROUTSMI = 1 << 18;
        const GPIROUTSCI = 1 << 19;
        const GPIROUTIOXAPIC = 1 << 20;
        const RXINV = 1 << 23;
        const PREGFRXSEL = 1 << 24;

        const _ = !0;
    }
}

pub const PADCFG0_RXEVCFG_SHIFT: u32 = 25;
pub const PADCFG0_RXEVCFG_MASK: u32 = genmask(26, 25);

bitflags! {
    /// PADCFG2 debounce control
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PadCfg2: u32 {
        const DEBEN = 1 << 0;

        const _ = !0;
    }
}

pub const PADCFG2_DEBOUNCE_SHIFT: u32 = 1;
pub const PADCFG2_DEBOUNCE_MASK: u32 = genmask(4, 1);

/// RX event configuration field of PADCFG0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxEvCfg {
    Level = 0,
    Edge = 1,
    Disabled = 2,
    EdgeBoth = 3,
}

impl RxEvCfg {
    pub const fn from_bits(v: u32) -> Self {
        match v & 0x3 {
            0 => RxEvCfg::Level,
            1 => RxEvCfg::Edge,
            2 => RxEvCfg::Disabled,
            _ => RxEvCfg::EdgeBoth,
        }
    }
}

/// Returns `padcfg0` with RXEVCFG and RXINV replaced.
#[inline]
pub const fn with_rx_event(padcfg0: u32, cfg: RxEvCfg, invert: bool) -> u32 {
    let mut value = padcfg0 & !(PADCFG0_RXEVCFG_MASK | PadCfg0::RXINV.bits());
    value |= (cfg as u32) << PADCFG0_RXEVCFG_SHIFT;
    if invert {
        value |= PadCfg0::RXINV.bits();
    }
    value
}

/// Extracts RXEVCFG and RXINV from `padcfg0`.
#[inline]
pub const fn rx_event(padcfg0: u32) -> (RxEvCfg, bool) {
    let cfg = RxEvCfg::from_bits((padcfg0 & PADCFG0_RXEVCFG_MASK) >> PADCFG0_RXEVCFG_SHIFT);
    (cfg, padcfg0 & PadCfg0::RXINV.bits() != 0)
}

/// Silicon revision from the REVID register
#[inline]
pub const fn revision(revid: u32) -> u32 {
    (revid & REVID_MASK) >> REVID_SHIFT
}

/// Ceiling log2, with `order_base_2(0) == 0` and `order_base_2(1) == 0`.
#[inline]
pub const fn order_base_2(n: u32) -> u32 {
    if n <= 1 {
        0
    } else {
        32 - (n - 1).leading_zeros()
    }
}

/// Debounce field value for `debounce_us`, if the hardware can express it
pub fn debounce_field(debounce_us: u32) -> Option<u32> {
    let ns = u64::from(debounce_us) * 1000;
    let periods = u32::try_from(ns / u64::from(DEBOUNCE_PERIOD_NS)).ok()?;
    let v = order_base_2(periods);
    (3..=15).contains(&v).then_some(v)
}

/// Debounce time in microseconds encoded by a PADCFG2 value, if enabled
pub fn debounce_us(padcfg2: u32) -> Option<u32> {
    if padcfg2 & PadCfg2::DEBEN.bits() == 0 {
        return None;
    }
    let v = (padcfg2 & PADCFG2_DEBOUNCE_MASK) >> PADCFG2_DEBOUNCE_SHIFT;
    let ns = u64::from(DEBOUNCE_PERIOD_NS) << v;
    Some((ns / 1000) as u32)
}
