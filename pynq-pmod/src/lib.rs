//! # Peripheral access crate for the PMOD I/O block of PYNQ I/O processors
//!
//! Each PMOD connector on a PYNQ board is driven by an I/O processor (IOP) which contains an
//! AXI GPIO block wired to the eight data pins of the connector. This crate describes that
//! register block. The HAL crate builds the pin abstractions on top of it.
#![no_std]

pub mod gpio;

pub use gpio::{MmioPmodGpio, PMOD_IO_BASE_ADDR, PmodGpio, PortBits};
