//! PMOD I/O pin module.
//!
//! A [PmodIo] pin is one of the eight data pins of a PMOD connector, configured either as an
//! input or an output at construction time.
use arbitrary_int::u3;
use embedded_hal::digital::PinState;

use crate::controller::PortController;

/// Highest valid pin index of a PMOD connector.
pub const MAX_PIN_INDEX: u8 = 7;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid PMOD pin index {0}, valid indexes are 0 to 7")]
pub struct InvalidPinIndex(pub u8);

/// Convert a raw pin index into a [u3].
pub const fn pin_index(raw: u8) -> Result<u3, InvalidPinIndex> {
    if raw > MAX_PIN_INDEX {
        return Err(InvalidPinIndex(raw));
    }
    Ok(u3::new(raw))
}

#[derive(Debug, thiserror::Error)]
pub enum PinError<E: core::fmt::Debug> {
    /// The operation is not possible for a pin with the given direction.
    #[error("operation not possible for pin with direction {0:?}")]
    WrongDirection(Direction),
    #[error("port controller error: {0:?}")]
    Controller(E),
}

impl<E: core::fmt::Debug> embedded_hal::digital::Error for PinError<E> {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// Extract the state of the pin at bit position `position` from a raw port value.
#[inline]
pub(crate) fn bit_state(raw: u8, position: u3) -> PinState {
    PinState::from((raw >> position.value()) & 0b1 == 1)
}

/// Single PMOD pin.
///
/// The direction is fixed for the lifetime of the pin. [Self::read] is only possible for
/// input pins and [Self::write] only for output pins.
pub struct PmodIo<'a, C: PortController> {
    controller: &'a C,
    index: u3,
    direction: Direction,
}

impl<'a, C: PortController> PmodIo<'a, C> {
    /// Create a new pin and configure its direction. Only the tri-state bit of this pin is
    /// modified.
    pub fn new(controller: &'a C, index: u3, direction: Direction) -> Result<Self, C::Error> {
        controller.set_direction(index, direction)?;
        log::debug!("PMOD pin {} configured as {:?}", index.value(), direction);
        Ok(Self {
            controller,
            index,
            direction,
        })
    }

    #[inline]
    pub fn index(&self) -> u3 {
        self.index
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn controller(&self) -> &'a C {
        self.controller
    }

    /// Read the logic level of an input pin.
    pub fn read(&self) -> Result<PinState, PinError<C::Error>> {
        self.check_direction(Direction::In)?;
        let raw = self.controller.read_port().map_err(PinError::Controller)?;
        Ok(bit_state(raw, self.index))
    }

    /// Drive an output pin. The other pins of the port keep their latched values.
    pub fn write(&mut self, state: PinState) -> Result<(), PinError<C::Error>> {
        self.check_direction(Direction::Out)?;
        let mask = 1 << self.index.value();
        self.controller
            .modify_port(|latch| match state {
                PinState::High => latch | mask,
                PinState::Low => latch & !mask,
            })
            .map_err(PinError::Controller)
    }

    /// Level last written to an output pin.
    pub fn output_state(&self) -> Result<PinState, PinError<C::Error>> {
        self.check_direction(Direction::Out)?;
        let latch = self
            .controller
            .read_output_latch()
            .map_err(PinError::Controller)?;
        Ok(bit_state(latch, self.index))
    }

    fn check_direction(&self, required: Direction) -> Result<(), PinError<C::Error>> {
        if self.direction != required {
            log::warn!(
                "PMOD pin {} is configured as {:?}, {:?} access rejected",
                self.index.value(),
                self.direction,
                required
            );
            return Err(PinError::WrongDirection(self.direction));
        }
        Ok(())
    }
}

impl<C: PortController> embedded_hal::digital::ErrorType for PmodIo<'_, C> {
    type Error = PinError<C::Error>;
}

impl<C: PortController> embedded_hal::digital::InputPin for PmodIo<'_, C> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read()? == PinState::High)
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read()? == PinState::Low)
    }
}

impl<C: PortController> embedded_hal::digital::OutputPin for PmodIo<'_, C> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::Low)
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::High)
    }
}

impl<C: PortController> embedded_hal::digital::StatefulOutputPin for PmodIo<'_, C> {
    #[inline]
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.output_state()? == PinState::High)
    }

    #[inline]
    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.output_state()? == PinState::Low)
    }
}
