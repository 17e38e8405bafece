use {
    super::{Packet, State, SYNC},
    crate::constants::{Command, Error, Id},
};

impl Packet<'_> {
    /// Advance the parser by one received byte.
    ///
    /// Returns [`Error::NotDone`] until a checksum byte arrives, then exactly one of
    /// [`Error::NONE`], [`Error::CHECKSUM`], or [`Error::TooMuchData`],
    /// after which the parser is idle again and ready for the next frame.
    ///
    /// Bytes before a sync pair are skipped, and so is any run of extra `0xFF`s
    /// after one. Parameters past the buffer's capacity still count toward the
    /// checksum but aren't stored.
    #[inline]
    pub fn process_byte(&mut self, byte: u8) -> Error {
        match self.state {
            State::Idle => {
                if byte == SYNC {
                    self.state = State::SawOneFf;
                }
            }
            State::SawOneFf => {
                self.state = if byte == SYNC {
                    State::SawTwoFf
                } else {
                    State::Idle
                };
            }
            State::SawTwoFf => {
                // `0xFF` can't be an ID, so it's more sync.
                if byte != SYNC {
                    self.id = Id(byte);
                    self.checksum = byte;
                    self.state = State::GotId;
                }
            }
            State::GotId => {
                self.length = byte;
                self.checksum = self.checksum.wrapping_add(byte);
                self.state = State::GotLength;
            }
            State::GotLength => {
                self.command = Command(byte);
                self.checksum = self.checksum.wrapping_add(byte);
                self.param_index = 0;
                self.state = State::ReadingBody;
            }
            State::ReadingBody => {
                if usize::from(self.param_index) >= self.num_params() {
                    self.state = State::Idle;
                    return self.finish(byte);
                }
                self.checksum = self.checksum.wrapping_add(byte);
                if let Some(slot) = self.params.get_mut(usize::from(self.param_index)) {
                    *slot = byte;
                }
                self.param_index += 1;
            }
        }
        Error::NotDone
    }

    #[inline]
    fn finish(&mut self, received: u8) -> Error {
        let expected = !self.checksum;
        if expected != received {
            debug!(
                "Checksum mismatch: received 0x{:X} but expected 0x{:X}",
                received, expected,
            );
            self.checksum = received;
            return Error::CHECKSUM;
        }
        self.checksum = expected;
        if usize::from(self.param_index) <= self.capacity() {
            Error::NONE
        } else {
            trace!(
                "Dropped {} of {} parameters",
                usize::from(self.param_index) - self.capacity(),
                self.param_index,
            );
            Error::TooMuchData
        }
    }

    /// Abandon any partial frame.
    #[inline(always)]
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }
}
