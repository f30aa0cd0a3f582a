//! PMOD port controller module.
//!
//! A [PortController] gives access to the eight data pins of one PMOD connector as a whole.
//! The pin abstractions in [crate::io] and [crate::cable] borrow a controller and only ever
//! talk to the hardware through it.
use core::cell::RefCell;
use core::convert::Infallible;

use arbitrary_int::u3;
use critical_section::Mutex;
use pynq_pmod::gpio::{ALL_INPUT, MmioPmodGpio, PmodGpio, PortBits};

use crate::io::Direction;

/// PMOD connectors which are served by an I/O processor.
#[derive(Debug, Eq, PartialEq, Clone, Copy, num_enum::TryFromPrimitive)]
#[repr(u8)]
pub enum PmodConnector {
    Jb = 1,
    Jc = 2,
    Jd = 3,
    Je = 4,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid PMOD connector ID {0}, valid IDs are 1 to 4 (ID 0 is reserved for the XADC)")]
pub struct InvalidConnector(pub u8);

impl PmodConnector {
    pub fn new(id: u8) -> Result<Self, InvalidConnector> {
        Self::try_from(id).map_err(|e| InvalidConnector(e.number))
    }

    #[inline]
    pub const fn id(&self) -> u8 {
        *self as u8
    }
}

/// Access to the raw 8-bit port of one PMOD connector.
///
/// Bit `n` of every port value belongs to physical pin `n`. All methods take `&self` so that
/// multiple pins can share one controller. Implementations must provide interior mutability.
pub trait PortController {
    type Error: core::fmt::Debug;

    /// Read the instantaneous logic level of all eight pins.
    fn read_port(&self) -> Result<u8, Self::Error>;

    /// Read back the value which was last written to the output latch.
    fn read_output_latch(&self) -> Result<u8, Self::Error>;

    /// Write the output latch. Only pins configured as outputs drive the written level.
    fn write_port(&self, value: u8) -> Result<(), Self::Error>;

    /// Configure the direction of a single pin. The other pins are not affected.
    fn set_direction(&self, index: u3, direction: Direction) -> Result<(), Self::Error>;

    /// Read-modify-write of the output latch.
    fn modify_port(&self, f: impl FnOnce(u8) -> u8) -> Result<(), Self::Error> {
        let current = self.read_output_latch()?;
        self.write_port(f(current))
    }
}

struct Inner {
    regs: MmioPmodGpio<'static>,
    // The data register only reads back the output latch for output pins.
    latch: u8,
}

/// Port controller which accesses the PMOD I/O GPIO block directly.
pub struct AxiGpioController {
    connector: PmodConnector,
    inner: Mutex<RefCell<Inner>>,
}

impl AxiGpioController {
    /// Create a new controller and reset the port: all pins are configured as inputs and the
    /// output latch is cleared.
    pub fn new(connector: PmodConnector, mut regs: MmioPmodGpio<'static>) -> Self {
        regs.write_tri(PortBits::new_with_pins(ALL_INPUT));
        regs.write_data(PortBits::new_with_pins(0));
        log::debug!("PMOD {:?}: port reset, all pins are inputs", connector);
        Self {
            connector,
            inner: Mutex::new(RefCell::new(Inner { regs, latch: 0 })),
        }
    }

    /// Create a new controller without touching the current pin configuration.
    ///
    /// The output latch shadow is initialized from the current data register value.
    pub fn new_without_reset(connector: PmodConnector, mut regs: MmioPmodGpio<'static>) -> Self {
        let latch = regs.read_data().pins();
        Self {
            connector,
            inner: Mutex::new(RefCell::new(Inner { regs, latch })),
        }
    }

    /// Create a new controller for the GPIO block at the fixed I/O processor address.
    ///
    /// # Safety
    ///
    /// Circumvents ownership and safety guarantees of the HAL. Only one controller should exist
    /// for the PMOD I/O block.
    pub unsafe fn steal_fixed(connector: PmodConnector) -> Self {
        Self::new(connector, unsafe { PmodGpio::new_mmio_fixed() })
    }

    #[inline]
    pub fn connector(&self) -> PmodConnector {
        self.connector
    }

    /// Raw tri-state configuration. A set bit marks an input pin.
    pub fn tristate_mask(&self) -> u8 {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).regs.read_tri().pins())
    }
}

impl PortController for AxiGpioController {
    type Error = Infallible;

    fn read_port(&self) -> Result<u8, Self::Error> {
        let raw = critical_section::with(|cs| self.inner.borrow_ref_mut(cs).regs.read_data());
        log::trace!("PMOD {:?}: raw port value {:#04x}", self.connector, raw.pins());
        Ok(raw.pins())
    }

    fn read_output_latch(&self) -> Result<u8, Self::Error> {
        Ok(critical_section::with(|cs| self.inner.borrow_ref(cs).latch))
    }

    fn write_port(&self, value: u8) -> Result<(), Self::Error> {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            inner.regs.write_data(PortBits::new_with_pins(value));
            inner.latch = value;
        });
        Ok(())
    }

    fn set_direction(&self, index: u3, direction: Direction) -> Result<(), Self::Error> {
        critical_section::with(|cs| {
            self.inner
                .borrow_ref_mut(cs)
                .regs
                .modify_tri(|tri| tri.with_pin(index, direction == Direction::In));
        });
        Ok(())
    }

    /// The read and the write happen inside one critical section.
    fn modify_port(&self, f: impl FnOnce(u8) -> u8) -> Result<(), Self::Error> {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            let value = f(inner.latch);
            inner.regs.write_data(PortBits::new_with_pins(value));
            inner.latch = value;
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller_on_host(backing: &mut [u32; 4]) -> (AxiGpioController, *mut u32) {
        let base = backing.as_mut_ptr();
        let regs = unsafe { PmodGpio::new_mmio_at(base as usize) };
        (AxiGpioController::new(PmodConnector::Jb, regs), base)
    }

    #[test]
    fn test_connector_ids() {
        assert_eq!(PmodConnector::new(1), Ok(PmodConnector::Jb));
        assert_eq!(PmodConnector::new(4), Ok(PmodConnector::Je));
        assert_eq!(PmodConnector::Jd.id(), 3);
    }

    #[test]
    fn test_xadc_connector_rejected() {
        assert_eq!(PmodConnector::new(0), Err(InvalidConnector(0)));
        assert_eq!(PmodConnector::new(5), Err(InvalidConnector(5)));
    }

    #[test]
    fn test_new_resets_port() {
        let mut backing = [0xAAu32, 0x00, 0, 0];
        let (controller, _base) = controller_on_host(&mut backing);
        assert_eq!(controller.tristate_mask(), ALL_INPUT);
        assert_eq!(controller.read_output_latch().unwrap(), 0);
        assert_eq!(controller.connector(), PmodConnector::Jb);
    }

    #[test]
    fn test_new_without_reset_keeps_config() {
        let mut backing = [0x5Au32, 0x0F, 0, 0];
        let regs = unsafe { PmodGpio::new_mmio_at(backing.as_mut_ptr() as usize) };
        let controller = AxiGpioController::new_without_reset(PmodConnector::Jc, regs);
        assert_eq!(controller.tristate_mask(), 0x0F);
        assert_eq!(controller.read_output_latch().unwrap(), 0x5A);
    }

    #[test]
    fn test_read_port() {
        let mut backing = [0u32; 4];
        let (controller, base) = controller_on_host(&mut backing);
        unsafe { base.write_volatile(0xF0) };
        assert_eq!(controller.read_port().unwrap(), 0xF0);
    }

    #[test]
    fn test_set_direction_touches_single_bit() {
        let mut backing = [0u32; 4];
        let (controller, _base) = controller_on_host(&mut backing);
        controller.set_direction(u3::new(2), Direction::Out).unwrap();
        assert_eq!(controller.tristate_mask(), 0b1111_1011);
        controller.set_direction(u3::new(7), Direction::Out).unwrap();
        assert_eq!(controller.tristate_mask(), 0b0111_1011);
        controller.set_direction(u3::new(2), Direction::In).unwrap();
        assert_eq!(controller.tristate_mask(), 0b0111_1111);
    }

    #[test]
    fn test_modify_port_updates_register_and_latch() {
        let mut backing = [0u32; 4];
        let (controller, base) = controller_on_host(&mut backing);
        controller.write_port(0b0000_0001).unwrap();
        controller.modify_port(|v| v | 0b1000_0000).unwrap();
        assert_eq!(controller.read_output_latch().unwrap(), 0b1000_0001);
        assert_eq!(unsafe { base.read_volatile() }, 0b1000_0001);
    }
}
