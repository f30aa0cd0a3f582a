use core::cell::Cell;

use arbitrary_int::u3;

use crate::controller::PortController;
use crate::io::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportFailure;

/// Port controller which keeps the port state in cells.
pub struct MockController {
    /// Levels returned by port reads.
    pub port: Cell<u8>,
    pub latch: Cell<u8>,
    /// Set bit marks an input pin.
    pub tri: Cell<u8>,
    pub fail_reads: Cell<bool>,
    pub reads: Cell<usize>,
}

impl MockController {
    pub fn new() -> Self {
        Self {
            port: Cell::new(0),
            latch: Cell::new(0),
            tri: Cell::new(0xFF),
            fail_reads: Cell::new(false),
            reads: Cell::new(0),
        }
    }
}

impl PortController for MockController {
    type Error = TransportFailure;

    fn read_port(&self) -> Result<u8, Self::Error> {
        self.reads.set(self.reads.get() + 1);
        if self.fail_reads.get() {
            return Err(TransportFailure);
        }
        Ok(self.port.get())
    }

    fn read_output_latch(&self) -> Result<u8, Self::Error> {
        Ok(self.latch.get())
    }

    fn write_port(&self, value: u8) -> Result<(), Self::Error> {
        self.latch.set(value);
        Ok(())
    }

    fn set_direction(&self, index: u3, direction: Direction) -> Result<(), Self::Error> {
        let mask = 1 << index.value();
        let tri = match direction {
            Direction::In => self.tri.get() | mask,
            Direction::Out => self.tri.get() & !mask,
        };
        self.tri.set(tri);
        Ok(())
    }
}
