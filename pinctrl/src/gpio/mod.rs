//! Intel community GPIO controller
//!
//! `GpioController` owns the register windows, the topology built from a
//! chipset's tables, the interrupt registrations and the suspend shadow
//! state. Other drivers address pins by logical number; everything below
//! this layer works on hardware pin numbers.

pub mod debounce;
pub mod irq;
pub mod ownership;
pub mod power;
pub mod regs;
pub mod soc;
pub mod topology;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{fence, AtomicBool, Ordering};

use self::irq::{InterruptClient, InterruptRouter, IrqType, OwnerId, Registration};
use self::ownership::OwnershipGuard;
use self::power::PowerContext;
use self::soc::SocData;
use self::topology::PinTopology;
use crate::mmio::RegisterWindow;
use crate::sync::{IrqControl, IrqSafeMutex};
use crate::util::GpioResult;

/// Platform power state as reported to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Off,
    On,
}

struct ControllerInner<W> {
    topology: PinTopology,
    windows: Vec<W>,
    router: InterruptRouter,
    power: PowerContext,
    state: PowerState,
}

impl<W: RegisterWindow> ControllerInner<W> {
    fn ownership(&self) -> OwnershipGuard<'_, W> {
        OwnershipGuard::new(&self.topology, &self.windows)
    }

    fn dispatch(&self) -> usize {
        self.router.dispatch(&self.topology, &self.windows)
    }

    fn suspend(&mut self) -> GpioResult<()> {
        let Self {
            topology,
            windows,
            router,
            power,
            ..
        } = self;

        power.suspend(topology, windows, |pin| router.is_registered(pin))?;

        for pin in router.registered_pins() {
            router.mask_unmask(topology, windows, pin, true)?;
        }
        Ok(())
    }

    fn resume(&mut self) -> GpioResult<()> {
        self.power.resume(&self.topology, &self.windows)?;

        let mut pins = Vec::new();
        pins.try_reserve_exact(self.router.registered_pins().count())?;
        pins.extend(self.router.registered_pins());

        for pin in pins {
            if let Some(ty) = self.router.slot(pin).and_then(|s| s.trigger) {
                if let Err(e) = self.router.set_type(&self.topology, &self.windows, pin, ty) {
                    log::warn!("gpio: pin {}: cannot restore trigger: {}", pin, e);
                    continue;
                }
            }
            if self.power.was_enabled(&self.topology, pin) {
                self.router.enable(&self.topology, &self.windows, pin)?;
            }
        }
        Ok(())
    }
}

pub struct GpioController<W, I: IrqControl> {
    soc: SocData,
    inner: IrqSafeMutex<ControllerInner<W>, I>,
    /// Set by the raw interrupt, drained by whoever holds `inner`
    irq_pending: AtomicBool,
}

impl<W: RegisterWindow, I: IrqControl> GpioController<W, I> {
    /// Builds the controller for `soc`. `windows` is indexed by each
    /// community's `barno`.
    pub fn start(soc: SocData, windows: Vec<W>) -> GpioResult<Self> {
        soc.validate()?;

        let mut topology = PinTopology::build(soc.communities)?;
        topology.attach(&windows)?;

        let router = InterruptRouter::new(&topology)?;
        let power = PowerContext::new(&topology)?;

        log::info!(
            "gpio: {}: {} pins in {} communities",
            soc.name,
            topology.pins().count(),
            topology.communities().len()
        );

        Ok(Self {
            soc,
            inner: IrqSafeMutex::new(ControllerInner {
                topology,
                windows,
                router,
                power,
                state: PowerState::On,
            }),
            irq_pending: AtomicBool::new(false),
        })
    }

    /// Masks every registered pin, drops all clients and hands the register
    /// windows back.
    pub fn stop(self) -> Vec<W> {
        let mut inner = self.inner.into_inner();

        let ControllerInner {
            topology,
            windows,
            router,
            ..
        } = &mut inner;
        for pin in router.registered_pins() {
            if let Err(e) = router.mask_unmask(topology, windows, pin, true) {
                log::warn!("gpio: pin {}: cannot mask on stop: {}", pin, e);
            }
        }
        let dropped = router.clear();

        inner.power.release();
        log::info!(
            "gpio: {}: stopped, {} registrations dropped",
            self.soc.name,
            dropped
        );
        inner.windows
    }

    pub fn soc(&self) -> &SocData {
        &self.soc
    }

    /// Runs `f` under the gate, then services any interrupt that arrived
    /// meanwhile.
    fn with<R>(&self, f: impl FnOnce(&mut ControllerInner<W>) -> R) -> R {
        let result = {
            let mut inner = self.inner.lock();
            f(&mut *inner)
        };
        self.drain_pending();
        result
    }

    fn with_pin<R>(
        &self,
        pin: u32,
        f: impl FnOnce(&mut ControllerInner<W>, u32) -> GpioResult<R>,
    ) -> GpioResult<R> {
        self.with(|inner| {
            let hw = inner.topology.to_hardware(pin)?;
            f(inner, hw)
        })
    }

    /// Called from the raw interrupt handler. Returns the number of client
    /// callbacks made on this call; zero if the gate was busy, in which case
    /// its holder services the interrupt on release.
    pub fn notify_interrupt(&self) -> usize {
        self.irq_pending.store(true, Ordering::SeqCst);
        self.drain_pending()
    }

    /// Dispatches while an interrupt is pending and the gate is free.
    ///
    /// The notifier stores the flag then tries the lock; a releasing holder
    /// unlocks then loads the flag. The fence orders each side's store before
    /// its load, so at least one of them sees the other.
    fn drain_pending(&self) -> usize {
        fence(Ordering::SeqCst);
        let mut fired = 0;
        while self.irq_pending.load(Ordering::SeqCst) {
            let Some(inner) = self.inner.try_lock() else {
                break;
            };
            if self.irq_pending.swap(false, Ordering::SeqCst) {
                fired += inner.dispatch();
            }
            drop(inner);
            fence(Ordering::SeqCst);
        }
        fired
    }

    pub fn set_power_state(&self, state: PowerState) -> GpioResult<()> {
        self.with(|inner| {
            if inner.state == state {
                return Ok(());
            }
            match state {
                PowerState::Off => inner.suspend()?,
                PowerState::On => inner.resume()?,
            }
            log::debug!("gpio: power state {:?}", state);
            inner.state = state;
            Ok(())
        })
    }

    pub fn power_state(&self) -> PowerState {
        self.with(|inner| inner.state)
    }

    pub fn interrupt_type(&self, pin: u32) -> GpioResult<IrqType> {
        self.with_pin(pin, |inner, hw| {
            inner
                .router
                .interrupt_type(&inner.topology, &inner.windows, hw)
        })
    }

    /// Claims `pin` for `client`. The interrupt stays disabled until
    /// `enable_interrupt`.
    pub fn register_interrupt(
        &self,
        pin: u32,
        owner: OwnerId,
        client: Arc<dyn InterruptClient>,
    ) -> GpioResult<()> {
        self.with_pin(pin, |inner, hw| {
            inner.router.register(
                &inner.topology,
                hw,
                Registration {
                    owner,
                    client,
                    logical: pin,
                },
            )?;
            log::debug!("gpio: pin {} (hw {}) registered by {:?}", pin, hw, owner);
            Ok(())
        })
    }

    pub fn unregister_interrupt(&self, pin: u32) -> GpioResult<()> {
        self.with_pin(pin, |inner, hw| {
            inner
                .router
                .unregister(&inner.topology, &inner.windows, hw)
        })
    }

    pub fn enable_interrupt(&self, pin: u32) -> GpioResult<()> {
        self.with_pin(pin, |inner, hw| {
            inner.router.enable(&inner.topology, &inner.windows, hw)
        })
    }

    pub fn disable_interrupt(&self, pin: u32) -> GpioResult<()> {
        self.with_pin(pin, |inner, hw| {
            inner
                .router
                .mask_unmask(&inner.topology, &inner.windows, hw, true)
        })
    }

    pub fn set_interrupt_type(&self, pin: u32, ty: IrqType) -> GpioResult<()> {
        self.with_pin(pin, |inner, hw| {
            inner
                .router
                .set_type(&inner.topology, &inner.windows, hw, ty)
        })
    }

    pub fn set_debounce(&self, pin: u32, debounce_us: Option<u32>) -> GpioResult<()> {
        self.with_pin(pin, |inner, hw| {
            debounce::set_debounce(&inner.topology, &inner.windows, hw, debounce_us)
        })
    }

    pub fn debounce(&self, pin: u32) -> GpioResult<Option<u32>> {
        self.with_pin(pin, |inner, hw| {
            debounce::debounce(&inner.topology, &inner.windows, hw)
        })
    }

    pub fn pad_owned_by_host(&self, pin: u32) -> bool {
        self.with_pin(pin, |inner, hw| Ok(inner.ownership().pad_owned_by_host(hw)))
            .unwrap_or(false)
    }

    pub fn pad_acpi_mode(&self, pin: u32) -> bool {
        self.with_pin(pin, |inner, hw| Ok(inner.ownership().pad_acpi_mode(hw)))
            .unwrap_or(true)
    }

    pub fn pad_locked(&self, pin: u32) -> bool {
        self.with_pin(pin, |inner, hw| Ok(inner.ownership().pad_locked(hw)))
            .unwrap_or(true)
    }

    pub fn pin_name(&self, pin: u32) -> Option<&'static str> {
        let hw = self.with(|inner| inner.topology.to_hardware(pin)).ok()?;
        self.soc.pin_name(hw)
    }
}

#[cfg(all(test, feature = "soc-cannonlake-h"))]
mod tests {
    use super::*;
    use crate::gpio::soc::cannonlake_h;
    use crate::sync::NoIrqControl;
    use crate::testing::{capture_logs, logged, FakeWindow};
    use crate::util::GpioError;
    use alloc::vec;
    use log::Level;
    use spin::Mutex;

    type TestController = GpioController<Arc<FakeWindow>, NoIrqControl>;

    const HOSTSW_OWN: usize = 0x0c0;
    const IE: usize = 0x120;
    const PADBAR: usize = 0x600;

    fn windows() -> Vec<Arc<FakeWindow>> {
        (0..4)
            .map(|_| {
                let window = FakeWindow::new(0x1000);
                window.poke(regs::REVID, 0x0094_0000);
                window.poke(regs::PADBAR, PADBAR as u32);
                for reg in 0..5 {
                    window.poke(HOSTSW_OWN + reg * 4, u32::MAX);
                }
                window.write_one_to_clear(regs::GPI_IS..regs::GPI_IS + 0x20);
                Arc::new(window)
            })
            .collect()
    }

    fn start() -> (TestController, Vec<Arc<FakeWindow>>) {
        let windows = windows();
        let controller = TestController::start(cannonlake_h::SOC_DATA, windows.clone()).unwrap();
        (controller, windows)
    }

    fn recorder(seen: &Arc<Mutex<Vec<u32>>>) -> Arc<dyn InterruptClient> {
        let sink = seen.clone();
        Arc::new(move |pin: u32| sink.lock().push(pin))
    }

    fn padcfg0(padno: usize) -> usize {
        PADBAR + padno * 16
    }

    #[test]
    fn test_start_resolves_chipset() {
        let (controller, _windows) = start();
        assert_eq!(controller.soc().name, "cannonlake-h");
        assert_eq!(controller.pin_name(0), Some("RCINB"));
        assert!(controller.pad_owned_by_host(0));
        assert!(!controller.pad_acpi_mode(0));
        assert!(!controller.pad_locked(0));
        assert_eq!(controller.power_state(), PowerState::On);

        assert_eq!(controller.pin_name(400), None);
        assert!(!controller.pad_owned_by_host(400));
        assert!(controller.pad_acpi_mode(400));
        assert!(controller.pad_locked(400));
    }

    #[test]
    fn test_start_failures() {
        let mut short = windows();
        short.truncate(3);
        assert_eq!(
            TestController::start(cannonlake_h::SOC_DATA, short).err(),
            Some(GpioError::NotFound)
        );

        let empty = SocData {
            communities: &[],
            ..cannonlake_h::SOC_DATA
        };
        assert_eq!(
            TestController::start(empty, windows()).err(),
            Some(GpioError::MissingPlatformData)
        );
    }

    #[test]
    fn test_interrupt_end_to_end() {
        let (controller, windows) = start();
        let seen = Arc::new(Mutex::new(Vec::new()));

        // community 1 starts at pin 51, so pin 60 is bit 9 of its first group
        controller
            .register_interrupt(60, OwnerId(7), recorder(&seen))
            .unwrap();
        assert_eq!(
            controller.register_interrupt(60, OwnerId(8), recorder(&seen)),
            Err(GpioError::AlreadyRegistered)
        );
        controller
            .set_interrupt_type(60, IrqType::LEVEL_HIGH)
            .unwrap();
        controller.enable_interrupt(60).unwrap();
        assert_eq!(windows[1].peek(IE), 1 << 9);
        assert_eq!(controller.interrupt_type(60), Ok(IrqType::LEVEL_HIGH));

        windows[1].poke(regs::GPI_IS, 1 << 9);
        assert_eq!(controller.notify_interrupt(), 1);
        assert_eq!(*seen.lock(), vec![60]);
        assert_eq!(windows[1].peek(regs::GPI_IS), 0);

        controller.disable_interrupt(60).unwrap();
        windows[1].poke(regs::GPI_IS, 1 << 9);
        assert_eq!(controller.notify_interrupt(), 0);

        controller.unregister_interrupt(60).unwrap();
        controller
            .register_interrupt(60, OwnerId(8), recorder(&seen))
            .unwrap();
        assert_eq!(
            controller.register_interrupt(299, OwnerId(8), recorder(&seen)),
            Err(GpioError::NotFound)
        );
    }

    #[test]
    fn test_interrupt_during_gate_is_deferred() {
        let (controller, windows) = start();
        let seen = Arc::new(Mutex::new(Vec::new()));
        controller
            .register_interrupt(5, OwnerId(1), recorder(&seen))
            .unwrap();
        controller
            .set_interrupt_type(5, IrqType::EDGE_RISING)
            .unwrap();
        controller.enable_interrupt(5).unwrap();
        windows[0].poke(regs::GPI_IS, 1 << 5);

        {
            let _gate = controller.inner.lock();
            assert_eq!(controller.notify_interrupt(), 0);
        }
        assert!(seen.lock().is_empty());

        // the next operation drains the pending interrupt on its way out
        assert_eq!(controller.power_state(), PowerState::On);
        assert_eq!(*seen.lock(), vec![5]);
        assert_eq!(windows[0].peek(regs::GPI_IS), 0);
    }

    #[test]
    fn test_interrupt_racing_gate_release_is_not_lost() {
        let (controller, windows) = start();
        let seen = Arc::new(Mutex::new(Vec::new()));
        controller
            .register_interrupt(5, OwnerId(1), recorder(&seen))
            .unwrap();
        controller
            .set_interrupt_type(5, IrqType::EDGE_RISING)
            .unwrap();
        controller.enable_interrupt(5).unwrap();

        std::thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..2000 {
                    windows[0].poke(regs::GPI_IS, 1 << 5);
                    controller.notify_interrupt();
                }
            });
            s.spawn(|| {
                for _ in 0..2000 {
                    controller.power_state();
                }
            });
        });

        // whoever lost the race for the gate, the last edge was serviced
        assert!(!controller.irq_pending.load(Ordering::SeqCst));
        assert_eq!(windows[0].peek(regs::GPI_IS), 0);
        assert!(!seen.lock().is_empty());
    }

    #[test]
    fn test_dispatch_ignores_bits_past_group_end() {
        let (controller, windows) = start();
        let seen = Arc::new(Mutex::new(Vec::new()));
        // first pin of community 1
        controller
            .register_interrupt(51, OwnerId(3), recorder(&seen))
            .unwrap();

        // community 0's last group holds pins 48..51 in word 2, so bit 3 is
        // no pin at all
        windows[0].poke(regs::GPI_IS + 8, 1 << 3);
        windows[0].poke(IE + 8, 1 << 3);

        assert_eq!(controller.notify_interrupt(), 0);
        assert!(seen.lock().is_empty());
        assert_eq!(windows[1].peek(regs::GPI_IS), 0);
    }

    #[test]
    fn test_unclaimed_interrupt_is_masked() {
        capture_logs();
        let (controller, windows) = start();

        // pin 137 is bit 14 of community 1's fourth group
        windows[1].poke(regs::GPI_IS + 12, 1 << 14);
        windows[1].poke(IE + 12, 1 << 14);

        assert_eq!(controller.notify_interrupt(), 0);
        assert_eq!(windows[1].peek(IE + 12), 0);
        assert!(logged(Level::Warn, "unclaimed pin 137 (logical 137)"));
    }

    #[test]
    fn test_lookup_failures_are_logged() {
        capture_logs();
        let (controller, _windows) = start();
        let seen = Arc::new(Mutex::new(Vec::new()));

        assert_eq!(
            controller.register_interrupt(3001, OwnerId(1), recorder(&seen)),
            Err(GpioError::NotFound)
        );
        assert!(logged(Level::Warn, "logical pin 3001"));

        assert_eq!(controller.enable_interrupt(3002), Err(GpioError::NotFound));
        assert!(logged(Level::Warn, "logical pin 3002"));
    }

    #[test]
    fn test_acpi_pin_cannot_be_armed() {
        let (controller, windows) = start();
        windows[0].poke(HOSTSW_OWN, !(1 << 3));
        windows[0].clear_log();

        assert!(controller.pad_acpi_mode(3));
        assert_eq!(
            controller.set_interrupt_type(3, IrqType::EDGE_BOTH),
            Err(GpioError::ModeConflict)
        );
        assert!(windows[0].writes().is_empty());
    }

    #[test]
    fn test_power_cycle_rearms_registered_pins() {
        let (controller, windows) = start();
        let seen = Arc::new(Mutex::new(Vec::new()));

        controller
            .register_interrupt(10, OwnerId(1), recorder(&seen))
            .unwrap();
        controller
            .register_interrupt(11, OwnerId(1), recorder(&seen))
            .unwrap();
        controller
            .set_interrupt_type(10, IrqType::EDGE_FALLING)
            .unwrap();
        controller.enable_interrupt(10).unwrap();
        let armed = (1 << 25) | regs::PadCfg0::RXINV.bits();
        assert_eq!(windows[0].peek(padcfg0(10)), armed);

        controller.set_power_state(PowerState::Off).unwrap();
        assert_eq!(controller.power_state(), PowerState::Off);
        assert_eq!(windows[0].peek(IE), 0);

        // firmware reprograms the pad while we are away
        windows[0].poke(padcfg0(10), 0);
        windows[0].poke(IE, 1 << 11);

        controller.set_power_state(PowerState::On).unwrap();
        assert_eq!(windows[0].peek(padcfg0(10)), armed);
        assert_eq!(windows[0].peek(IE), 1 << 10);
        assert_eq!(controller.interrupt_type(10), Ok(IrqType::EDGE_FALLING));

        // repeated notifications are no-ops
        controller.set_power_state(PowerState::On).unwrap();
        assert_eq!(windows[0].peek(IE), 1 << 10);
    }

    #[test]
    fn test_debounce_through_controller() {
        let (controller, windows) = start();
        controller.set_debounce(20, Some(250)).unwrap();
        assert_eq!(controller.debounce(20), Ok(Some(250)));
        assert_eq!(windows[0].peek(padcfg0(20) + 8), 1 | (3 << 1));

        assert_eq!(
            controller.set_debounce(20, Some(5_000_000)),
            Err(GpioError::InvalidArgument)
        );
        controller.set_debounce(20, None).unwrap();
        assert_eq!(controller.debounce(20), Ok(None));
    }

    #[test]
    fn test_stop_masks_and_returns_windows() {
        let (controller, windows) = start();
        let seen = Arc::new(Mutex::new(Vec::new()));
        controller
            .register_interrupt(60, OwnerId(1), recorder(&seen))
            .unwrap();
        controller.enable_interrupt(60).unwrap();

        let returned = controller.stop();
        assert_eq!(returned.len(), 4);
        assert_eq!(windows[1].peek(IE), 0);
        // the client was dropped with its registration
        assert_eq!(Arc::strong_count(&seen), 1);
    }
}
