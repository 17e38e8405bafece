use core::fmt;

/// Somewhere to keep the persistent range of a control table between power cycles:
/// EEPROM, flash, a file.
pub trait Storage {
    type Error: fmt::Debug;

    /// Fill `bytes` from storage, starting `offset` bytes in.
    fn load(&mut self, offset: u8, bytes: &mut [u8]) -> Result<(), Self::Error>;

    /// Persist `bytes`, starting `offset` bytes in.
    fn save(&mut self, offset: u8, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    type Error = S::Error;

    #[inline(always)]
    fn load(&mut self, offset: u8, bytes: &mut [u8]) -> Result<(), Self::Error> {
        (**self).load(offset, bytes)
    }

    #[inline(always)]
    fn save(&mut self, offset: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).save(offset, bytes)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemoryError {
    /// Nothing has been saved yet.
    Empty,
    OutOfRange { offset: u8, len: usize },
}

impl fmt::Display for MemoryError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Empty => f.write_str("Nothing has been saved yet"),
            Self::OutOfRange { offset, len } => {
                write!(f, "{len} bytes at offset {offset} don't fit in storage")
            }
        }
    }
}

/// RAM-backed storage, lost on reset. Behaves like a blank EEPROM
/// until the first save.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MemoryStorage<const N: usize> {
    bytes: [u8; N],
    saved: bool,
}

impl<const N: usize> MemoryStorage<N> {
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            saved: false,
        }
    }

    #[inline(always)]
    pub const fn bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    #[inline]
    fn range(offset: u8, len: usize) -> Result<core::ops::Range<usize>, MemoryError> {
        let start = usize::from(offset);
        match start.checked_add(len) {
            Some(end) if end <= N => Ok(start..end),
            _ => Err(MemoryError::OutOfRange { offset, len }),
        }
    }
}

impl<const N: usize> Default for MemoryStorage<N> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Storage for MemoryStorage<N> {
    type Error = MemoryError;

    #[inline]
    fn load(&mut self, offset: u8, bytes: &mut [u8]) -> Result<(), Self::Error> {
        if !self.saved {
            return Err(MemoryError::Empty);
        }
        let range = Self::range(offset, bytes.len())?;
        bytes.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    #[inline]
    fn save(&mut self, offset: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        let range = Self::range(offset, bytes.len())?;
        self.bytes[range].copy_from_slice(bytes);
        self.saved = true;
        Ok(())
    }
}
