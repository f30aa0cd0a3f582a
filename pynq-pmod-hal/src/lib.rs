//! # HAL for the PMOD connectors of PYNQ boards
//!
//! This crate provides pin abstractions for the eight data pins of a PMOD connector on top of the
//! [register access crate](pynq_pmod). The pins implement the traits specified by the
//! [embedded-hal](https://github.com/rust-embedded/embedded-hal) project.
//!
//! Access to the pins goes through a [controller::PortController]. The
//! [controller::AxiGpioController] talks to the PMOD I/O GPIO block directly, but any other
//! transport which can read and write the 8-bit port can implement the trait as well.
//!
//! Two pins types are provided:
//!
//! - [io::PmodIo]: a single PMOD pin configured as input or output.
//! - [cable::CablePin]: a PMOD pin which is connected to another PMOD connector with an external
//!   cable. Reads are remapped according to the [cable::Cable] topology.
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod cable;
pub mod controller;
pub mod io;
pub mod prelude;

#[cfg(test)]
pub(crate) mod testutil;

pub use arbitrary_int::u3;
pub use embedded_hal::digital::PinState;
