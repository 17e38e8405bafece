//! One frame on the wire:
//!
//! ```text
//! FF FF ID LENGTH COMMAND PARAM_0 .. PARAM_{LENGTH-3} CHECKSUM
//! ```
//!
//! `LENGTH` counts the parameters plus the command and checksum bytes.
//! The checksum is the complement of the truncated sum of everything between
//! the sync pair and itself.

mod recv;
mod send;

use {
    crate::constants::{Command, Flags, Id},
    core::fmt,
};

pub const SYNC: u8 = 0xFF;

/// `LENGTH` is one byte and two of its values are spent on the command and checksum.
pub const MAX_PARAMS: usize = 0xFF - 2;

/// Two sync bytes, ID, length, command, every parameter, checksum.
pub const MAX_PACKET_BYTES: usize = 2 + 3 + MAX_PARAMS + 1;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum State {
    #[default]
    Idle,
    SawOneFf,
    SawTwoFf,
    GotId,
    GotLength,
    ReadingBody,
}

/// A request or response frame, backed by a caller-owned parameter buffer.
///
/// Fields set by hand leave the checksum stale until [`Packet::update_checksum`];
/// fields filled by [`Packet::process_byte`] arrive with the checksum already checked.
pub struct Packet<'params> {
    state: State,
    params: &'params mut [u8],
    id: Id,
    length: u8,
    command: Command,
    param_index: u8,
    checksum: u8,
}

impl<'params> Packet<'params> {
    /// # Panics
    /// If `params` holds more than [`MAX_PARAMS`] bytes.
    #[inline]
    pub fn new(params: &'params mut [u8]) -> Self {
        assert!(
            params.len() <= MAX_PARAMS,
            "parameter capacity {} exceeds the protocol maximum of {MAX_PARAMS}",
            params.len(),
        );
        Self {
            state: State::Idle,
            params,
            id: Id::DEFAULT,
            length: 2,
            command: Command::PING,
            param_index: 0,
            checksum: 0,
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> Id {
        self.id
    }

    #[inline(always)]
    pub fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    #[inline(always)]
    pub const fn length(&self) -> u8 {
        self.length
    }

    #[inline(always)]
    pub const fn command(&self) -> Command {
        self.command
    }

    #[inline(always)]
    pub fn set_command(&mut self, command: Command) {
        self.command = command;
    }

    /// The command byte read as the status of a response.
    #[inline(always)]
    pub const fn error_code(&self) -> Flags {
        Flags::from_bits(self.command.0)
    }

    #[inline(always)]
    pub fn set_error_code(&mut self, flags: Flags) {
        self.command = Command(flags.bits());
    }

    /// Parameters the length field declares, which may be more than were stored.
    #[inline(always)]
    pub const fn num_params(&self) -> usize {
        if self.length <= 2 {
            0
        } else {
            self.length as usize - 2
        }
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.params.len()
    }

    /// The parameters actually stored; shorter than [`Packet::num_params`]
    /// after a [`TooMuchData`](crate::Error::TooMuchData) parse.
    #[inline]
    pub fn params(&self) -> &[u8] {
        let stored = self.num_params().min(self.capacity());
        &self.params[..stored]
    }

    /// The whole parameter buffer, for filling in place before [`Packet::set_num_params`].
    #[inline(always)]
    pub fn params_mut(&mut self) -> &mut [u8] {
        &mut *self.params
    }

    #[inline(always)]
    pub const fn checksum(&self) -> u8 {
        self.checksum
    }
}

impl fmt::Debug for Packet<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("state", &self.state)
            .field("id", &self.id)
            .field("length", &self.length)
            .field("command", &self.command)
            .field("params", &self.params())
            .field("checksum", &self.checksum)
            .finish()
    }
}

impl fmt::Display for Packet<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID {} Len {} Cmd {} Params [",
            self.id, self.length, self.command,
        )?;
        for (i, byte) in self.params().iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        if self.params().len() < self.num_params() {
            write!(f, " +{} dropped", self.num_params() - self.params().len())?;
        }
        write!(f, "] Checksum 0x{:02X}", self.checksum)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fresh_packet() {
        let mut params = [0; 4];
        let packet = Packet::new(&mut params);
        assert_eq!(packet.id(), Id::DEFAULT);
        assert_eq!(packet.length(), 2);
        assert_eq!(packet.command(), Command::PING);
        assert_eq!(packet.num_params(), 0);
        assert_eq!(packet.capacity(), 4);
        assert!(packet.params().is_empty());
    }

    #[test]
    fn command_and_error_share_a_byte() {
        let mut params = [];
        let mut packet = Packet::new(&mut params);
        packet.set_command(Command::READ);
        assert_eq!(packet.error_code(), Flags::ANGLE_LIMIT);
        packet.set_error_code(Flags::OVERLOAD | Flags::RANGE);
        assert_eq!(packet.command(), Command(0x28));
    }

    #[test]
    fn maximum_capacity() {
        let mut params = [0; MAX_PARAMS];
        assert_eq!(Packet::new(&mut params).capacity(), 253);
        assert_eq!(MAX_PACKET_BYTES, 259);
    }

    #[test]
    #[should_panic(expected = "exceeds the protocol maximum")]
    fn capacity_too_large() {
        let mut params = [0; MAX_PARAMS + 1];
        let _ = Packet::new(&mut params);
    }

    #[test]
    fn display() {
        let mut params = [0; 1];
        let mut packet = Packet::new(&mut params);
        for &byte in &[0xFF, 0xFF, 0x01, 0x04, 0x02, 0x2B, 0x01, 0xCC] {
            let _ = packet.process_byte(byte);
        }
        assert_eq!(
            packet.to_string(),
            "ID 0x01 Len 4 Cmd READ Params [2B +1 dropped] Checksum 0xCC",
        );
    }
}
