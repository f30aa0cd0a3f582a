//! Cable-mapped PMOD pins.
//!
//! When two PMOD connectors are joined with an external cable, the pin which shows up at a
//! given index on the receiving connector depends on the cable. Each PMOD row carries four
//! signals, pins 0 to 3 in one row and pins 4 to 7 in the other.
//!
//! A [Cable::Straight] cable has no twisted conductors. Plugging it into two headers face to
//! face swaps the two rows:
//!
//! ```text
//! {vdd, gnd, 3, 2, 1, 0}  <=>  {vdd, gnd, 7, 6, 5, 4}
//! {vdd, gnd, 7, 6, 5, 4}  <=>  {vdd, gnd, 3, 2, 1, 0}
//! ```
//!
//! A [Cable::Loopback] cable keeps the rows:
//!
//! ```text
//! {vdd, gnd, 3, 2, 1, 0}  <=>  {vdd, gnd, 3, 2, 1, 0}
//! {vdd, gnd, 7, 6, 5, 4}  <=>  {vdd, gnd, 7, 6, 5, 4}
//! ```
//!
//! A [CablePin] applies this mapping when reading, so the value read on index `n` is the value
//! driven on index `n` at the other end of the cable.
use core::str::FromStr;

use arbitrary_int::u3;
use embedded_hal::digital::PinState;

use crate::controller::PortController;
use crate::io::{Direction, PinError, PmodIo, bit_state};

/// Cable topology between two PMOD connectors.
#[derive(Debug, Eq, PartialEq, Clone, Copy, num_enum::TryFromPrimitive)]
#[repr(u8)]
pub enum Cable {
    Straight = 0,
    Loopback = 1,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("cable can only be 'straight' or 'loopback'")]
pub struct InvalidCable;

impl Default for Cable {
    fn default() -> Self {
        Self::Straight
    }
}

impl Cable {
    /// Convert a raw cable value, 0 for straight and 1 for loopback.
    pub fn new(raw: u8) -> Result<Self, InvalidCable> {
        Self::try_from(raw).map_err(|_| InvalidCable)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Cable::Straight => "straight",
            Cable::Loopback => "loopback",
        }
    }

    /// Bit position in the raw port value which belongs to pin `index` at the far end of the
    /// cable.
    ///
    /// The straight mapping is its own inverse.
    #[inline]
    pub const fn map_index(&self, index: u3) -> u3 {
        match self {
            Cable::Straight => u3::new(index.value() ^ 0b100),
            Cable::Loopback => index,
        }
    }
}

impl FromStr for Cable {
    type Err = InvalidCable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "straight" => Ok(Cable::Straight),
            "loopback" => Ok(Cable::Loopback),
            _ => Err(InvalidCable),
        }
    }
}

impl core::fmt::Display for Cable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CablePinConfig {
    pub index: u3,
    pub direction: Direction,
    pub cable: Cable,
}

impl CablePinConfig {
    /// Input pin on a straight cable.
    pub const fn new(index: u3) -> Self {
        Self {
            index,
            direction: Direction::In,
            cable: Cable::Straight,
        }
    }

    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub const fn with_cable(mut self, cable: Cable) -> Self {
        self.cable = cable;
        self
    }
}

/// PMOD pin connected to another PMOD connector with a cable.
///
/// Reading does not check the configured direction. Writing is forwarded to the underlying
/// [PmodIo] pin without any remapping.
pub struct CablePin<'a, C: PortController> {
    io: PmodIo<'a, C>,
    cable: Cable,
}

impl<'a, C: PortController> CablePin<'a, C> {
    pub fn new(
        controller: &'a C,
        index: u3,
        direction: Direction,
        cable: Cable,
    ) -> Result<Self, C::Error> {
        let io = PmodIo::new(controller, index, direction)?;
        log::debug!("PMOD pin {} uses {} cable", index.value(), cable);
        Ok(Self { io, cable })
    }

    #[inline]
    pub fn new_with_config(controller: &'a C, config: CablePinConfig) -> Result<Self, C::Error> {
        Self::new(controller, config.index, config.direction, config.cable)
    }

    #[inline]
    pub fn cable(&self) -> Cable {
        self.cable
    }

    pub fn set_cable(&mut self, cable: Cable) {
        if cable != self.cable {
            log::debug!(
                "PMOD pin {}: cable changed from {} to {}",
                self.io.index().value(),
                self.cable,
                cable
            );
        }
        self.cable = cable;
    }

    #[inline]
    pub fn index(&self) -> u3 {
        self.io.index()
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.io.direction()
    }

    /// Bit position in the raw port value which is sampled by [Self::read].
    #[inline]
    pub fn mapped_index(&self) -> u3 {
        self.cable.map_index(self.io.index())
    }

    /// Read the pin through the cable.
    ///
    /// Only meaningful for input pins, but this is not checked. Errors of the port controller
    /// are returned unchanged.
    pub fn read(&self) -> Result<PinState, C::Error> {
        let raw = self.io.controller().read_port()?;
        Ok(bit_state(raw, self.mapped_index()))
    }

    #[inline]
    pub fn write(&mut self, state: PinState) -> Result<(), PinError<C::Error>> {
        self.io.write(state)
    }

    /// Release the cable mapping and return the underlying pin.
    pub fn into_inner(self) -> PmodIo<'a, C> {
        self.io
    }
}

impl<C: PortController> embedded_hal::digital::ErrorType for CablePin<'_, C> {
    type Error = PinError<C::Error>;
}

impl<C: PortController> embedded_hal::digital::InputPin for CablePin<'_, C> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read().map_err(PinError::Controller)? == PinState::High)
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read().map_err(PinError::Controller)? == PinState::Low)
    }
}

impl<C: PortController> embedded_hal::digital::OutputPin for CablePin<'_, C> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::Low)
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::High)
    }
}
