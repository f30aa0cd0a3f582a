//! # PMOD I/O GPIO register module.
use arbitrary_int::u3;

/// Base address of the PMOD I/O AXI GPIO block inside the address map of an I/O processor.
pub const PMOD_IO_BASE_ADDR: usize = 0x4000_0000;

pub const DATA_OFFSET: usize = 0x0;
pub const TRI_OFFSET: usize = 0x4;

/// Tri-state value which configures all eight pins as inputs.
pub const ALL_INPUT: u8 = 0xFF;
/// Tri-state value which configures all eight pins as outputs.
pub const ALL_OUTPUT: u8 = 0x00;

/// Register value for the data and tri-state registers. Bit `n` belongs to PMOD pin `n`.
#[bitbybit::bitfield(u32, default = 0x0)]
#[derive(Debug, PartialEq, Eq)]
pub struct PortBits {
    #[bits(0..=7, rw)]
    pins: u8,
}

impl PortBits {
    #[inline]
    pub const fn new_with_pins(pins: u8) -> Self {
        Self::new_with_raw_value(pins as u32)
    }

    #[inline]
    pub fn pin(&self, index: u3) -> bool {
        (self.pins() >> index.value()) & 0b1 == 1
    }

    #[inline]
    pub fn with_pin(self, index: u3, high: bool) -> Self {
        let mask = 1 << index.value();
        if high {
            self.with_pins(self.pins() | mask)
        } else {
            self.with_pins(self.pins() & !mask)
        }
    }
}

/// PMOD I/O GPIO register access.
///
/// Only the first channel is connected to the PMOD pins. The second channel is mapped to keep
/// the layout complete.
#[derive(derive_mmio::Mmio)]
#[repr(C)]
pub struct PmodGpio {
    /// Channel 1 data. Reads return the pin levels, writes set the output latch.
    data: PortBits,
    /// Channel 1 tri-state control. A set bit configures the pin as an input.
    tri: PortBits,
    /// Channel 2 data
    data_2: u32,
    /// Channel 2 tri-state control
    tri_2: u32,
}

static_assertions::const_assert_eq!(core::mem::size_of::<PmodGpio>(), 0x10);
static_assertions::const_assert_eq!(core::mem::offset_of!(PmodGpio, tri), TRI_OFFSET);

impl PmodGpio {
    /// Create a new PMOD I/O GPIO MMIO instance at the fixed address [PMOD_IO_BASE_ADDR].
    ///
    /// # Safety
    ///
    /// This API can be used to potentially create a driver to the same peripheral structure
    /// from multiple threads. The user must ensure that concurrent accesses are safe and do not
    /// interfere with each other.
    #[inline]
    pub const unsafe fn new_mmio_fixed() -> MmioPmodGpio<'static> {
        unsafe { Self::new_mmio_at(PMOD_IO_BASE_ADDR) }
    }
}
