//! Input debounce through PADCFG2

use super::ownership::OwnershipGuard;
use super::regs::{self, PadCfg0, PadCfg2, PadCfgReg};
use super::topology::PinTopology;
use crate::mmio::RegisterWindow;
use crate::util::{GpioError, GpioResult};

/// Enables debounce of `debounce_us` microseconds on `pin`, or disables it
/// for `None`.
///
/// The hardware counts in powers of two of the 31.25us debounce clock, so
/// the time is rounded up to the next representable value.
pub fn set_debounce<W: RegisterWindow>(
    topology: &PinTopology,
    windows: &[W],
    pin: u32,
    debounce_us: Option<u32>,
) -> GpioResult<()> {
    topology.locate(pin)?;
    let cfg2 = topology
        .padcfg(pin, PadCfgReg::Cfg2)
        .ok_or(GpioError::NotSupported)?;
    let cfg0 = topology
        .padcfg(pin, PadCfgReg::Cfg0)
        .ok_or(GpioError::NotFound)?;

    if OwnershipGuard::new(topology, windows).pad_locked(pin) {
        return Err(GpioError::PinLocked);
    }

    let field = match debounce_us {
        Some(us) => Some(regs::debounce_field(us).ok_or_else(|| {
            log::warn!("gpio: pin {}: debounce of {}us out of range", pin, us);
            GpioError::InvalidArgument
        })?),
        None => None,
    };

    let mut value0 = cfg0.read(windows)? & !PadCfg0::PREGFRXSEL.bits();
    let mut value2 =
        cfg2.read(windows)? & !(PadCfg2::DEBEN.bits() | regs::PADCFG2_DEBOUNCE_MASK);

    if let Some(v) = field {
        value0 |= PadCfg0::PREGFRXSEL.bits();
        value2 |= PadCfg2::DEBEN.bits() | (v << regs::PADCFG2_DEBOUNCE_SHIFT);
    }

    cfg0.write(windows, value0)?;
    cfg2.write(windows, value2)?;
    Ok(())
}

/// Debounce time currently programmed for `pin`, `None` when disabled.
pub fn debounce<W: RegisterWindow>(
    topology: &PinTopology,
    windows: &[W],
    pin: u32,
) -> GpioResult<Option<u32>> {
    topology.locate(pin)?;
    let cfg2 = topology
        .padcfg(pin, PadCfgReg::Cfg2)
        .ok_or(GpioError::NotSupported)?;
    Ok(regs::debounce_us(cfg2.read(windows)?))
}
