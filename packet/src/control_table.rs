//! Registers every device shares. Device-specific layouts start after these,
//! usually at `0x06`, and are sized against the same table.

use core::mem::size_of;

/// A fixed-width integer stored little-endian in the control table.
pub trait Value: Copy {
    const BYTES: usize;

    /// Reads from the first `BYTES` bytes of `bytes`.
    fn read_le(bytes: &[u8]) -> Self;

    /// Overwrites the first `BYTES` bytes of `bytes`.
    fn write_le(self, bytes: &mut [u8]);
}

macro_rules! value {
    ($($int:ty),+ $(,)?) => {
        $(
            impl Value for $int {
                const BYTES: usize = size_of::<$int>();

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut little_endian = [0; size_of::<$int>()];
                    little_endian.copy_from_slice(&bytes[..Self::BYTES]);
                    Self::from_le_bytes(little_endian)
                }

                #[inline]
                fn write_le(self, bytes: &mut [u8]) {
                    bytes[..Self::BYTES].copy_from_slice(&self.to_le_bytes())
                }
            }
        )+
    };
}

value!(u8, u16, u32, i8, i16, i32);

pub trait Item {
    const ADDRESS: u8;
    const DESCRIPTION: &'static str;
    type Value: Value;
}

pub struct ModelNumber;
impl Item for ModelNumber {
    const ADDRESS: u8 = 0x00;
    const DESCRIPTION: &'static str = "Model Number";
    type Value = u16;
}

pub struct FirmwareVersion;
impl Item for FirmwareVersion {
    const ADDRESS: u8 = 0x02;
    const DESCRIPTION: &'static str = "Firmware Version";
    type Value = u8;
}

pub struct Id;
impl Item for Id {
    const ADDRESS: u8 = 0x03;
    const DESCRIPTION: &'static str = "ID";
    type Value = u8;
}

/// Divisor of a 2 MHz clock; see [`bit_rate`].
pub struct BaudRate;
impl Item for BaudRate {
    const ADDRESS: u8 = 0x04;
    const DESCRIPTION: &'static str = "Baud Rate";
    type Value = u8;
}

/// Units of 2 µs.
pub struct ReturnDelayTime;
impl Item for ReturnDelayTime {
    const ADDRESS: u8 = 0x05;
    const DESCRIPTION: &'static str = "Return Delay Time";
    type Value = u8;
}

pub struct Led;
impl Item for Led {
    const ADDRESS: u8 = 0x19;
    const DESCRIPTION: &'static str = "LED";
    type Value = u8;
}

pub const DEFAULT_DEVICE_ID: u8 = 0x00;
/// 1 Mbit/s.
pub const DEFAULT_BAUD: u8 = 0x01;
/// 500 µs.
pub const DEFAULT_RETURN_DELAY_TIME: u8 = 250;

pub const BAUD_CLOCK: u32 = 2_000_000;

#[inline(always)]
pub const fn bit_rate(divisor: u8) -> u32 {
    BAUD_CLOCK / (divisor as u32 + 1)
}

/// Common divisors, named after the standard rate each one approximates.
#[enum_repr::EnumRepr(type = "u8")]
#[derive(Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(test, derive(strum_macros::VariantArray))]
pub enum Baud {
    Baud1000000 = 1,
    Baud500000 = 3,
    Baud400000 = 4,
    Baud250000 = 7,
    Baud200000 = 9,
    Baud115200 = 16,
    Baud57600 = 34,
    Baud19200 = 103,
    Baud9600 = 207,
}

impl Baud {
    /// The rate the divisor actually produces, which can be a few percent off the name.
    #[inline]
    pub fn bit_rate(&self) -> u32 {
        bit_rate(self.repr())
    }
}
