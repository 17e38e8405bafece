use core::{fmt, ops};

/// Address of a device on the bus.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Id(pub u8);

impl Id {
    pub const DEFAULT: Self = Self(0x00);
    pub const BROADCAST: Self = Self(0xFE);
    /// Can't be parsed off the wire: every `0xFF` ahead of the ID is taken as sync.
    pub const INVALID: Self = Self(0xFF);

    #[inline(always)]
    pub const fn is_broadcast(self) -> bool {
        self.0 == Self::BROADCAST.0
    }
}

impl From<u8> for Id {
    #[inline(always)]
    fn from(byte: u8) -> Self {
        Self(byte)
    }
}

impl fmt::Display for Id {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Instruction byte of a request frame.
///
/// An open set: device layouts are free to define their own on top of these.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command(pub u8);

impl Command {
    pub const PING: Self = Self(0x01);
    pub const READ: Self = Self(0x02);
    pub const WRITE: Self = Self(0x03);
    pub const REG_WRITE: Self = Self(0x04);
    pub const ACTION: Self = Self(0x05);
    pub const RESET: Self = Self(0x06);
    pub const SYNC_WRITE: Self = Self(0x83);

    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::PING => "PING",
            Self::READ => "READ",
            Self::WRITE => "WRITE",
            Self::REG_WRITE => "REG_WRITE",
            Self::ACTION => "ACTION",
            Self::RESET => "RESET",
            Self::SYNC_WRITE => "SYNC_WRITE",
            _ => return None,
        })
    }
}

impl Default for Command {
    #[inline(always)]
    fn default() -> Self {
        Self::PING
    }
}

impl From<u8> for Command {
    #[inline(always)]
    fn from(byte: u8) -> Self {
        Self(byte)
    }
}

impl fmt::Display for Command {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}

/// Status bits a device reports in place of the command byte of a response.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Flags(u8);

impl Flags {
    pub const NONE: Self = Self(0x00);
    pub const INPUT_VOLTAGE: Self = Self(0x01);
    pub const ANGLE_LIMIT: Self = Self(0x02);
    pub const OVERHEATING: Self = Self(0x04);
    pub const RANGE: Self = Self(0x08);
    pub const CHECKSUM: Self = Self(0x10);
    pub const OVERLOAD: Self = Self(0x20);
    pub const INSTRUCTION: Self = Self(0x40);
    pub const RESERVED: Self = Self(0x80);

    // Indexed by bit position.
    const NAMES: [&'static str; 8] = [
        "InputVoltage",
        "AngleLimit",
        "Overheating",
        "Range",
        "Checksum",
        "Overload",
        "Instruction",
        "Reserved",
    ];

    #[inline(always)]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .enumerate()
            .filter(move |&(bit, _)| self.0 & (1 << bit) != 0)
            .map(|(_, name)| name)
    }
}

impl ops::BitOr for Flags {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for Flags {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl fmt::Display for Flags {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let mut names = self.names();
        if let Some(first) = names.next() {
            f.write_str(first)?;
        }
        for name in names {
            write!(f, " {name}")?;
        }
        Ok(())
    }
}

/// Outcome of feeding the parser, or of waiting on a reply.
///
/// Only the `Flags` variant can travel in a status frame;
/// the others are local verdicts that never fit in a byte.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    Flags(Flags),
    NotDone,
    Timeout,
    TooMuchData,
}

impl Error {
    pub const NONE: Self = Self::Flags(Flags::NONE);
    pub const CHECKSUM: Self = Self::Flags(Flags::CHECKSUM);

    #[inline(always)]
    pub const fn is_done(self) -> bool {
        !matches!(self, Self::NotDone)
    }

    #[inline(always)]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::Flags(flags) if flags.is_empty())
    }
}

impl Default for Error {
    #[inline(always)]
    fn default() -> Self {
        Self::NONE
    }
}

impl From<Flags> for Error {
    #[inline(always)]
    fn from(flags: Flags) -> Self {
        Self::Flags(flags)
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Flags(ref flags) => fmt::Display::fmt(flags, f),
            Self::NotDone => f.write_str("NotDone"),
            Self::Timeout => f.write_str("Timeout"),
            Self::TooMuchData => f.write_str("TooMuchData"),
        }
    }
}
