//! Prelude
pub use crate::cable::{Cable, CablePin};
pub use crate::controller::PortController;
pub use crate::io::{Direction, PmodIo};
pub use embedded_hal::digital::{InputPin as _, OutputPin as _, StatefulOutputPin as _};
