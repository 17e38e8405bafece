use super::{Packet, SYNC};

impl Packet<'_> {
    /// Copy `params` into the buffer and size the length field to match.
    ///
    /// # Panics
    /// If there are more parameters than the buffer holds.
    #[inline]
    pub fn set_params(&mut self, params: &[u8]) {
        self.set_num_params(params.len());
        self.params[..params.len()].copy_from_slice(params);
    }

    /// Size the length field for parameters already written through [`Packet::params_mut`].
    ///
    /// # Panics
    /// If there are more parameters than the buffer holds.
    #[inline]
    pub fn set_num_params(&mut self, n: usize) {
        assert!(
            n <= self.capacity(),
            "{n} parameters don't fit in a buffer of {}",
            self.capacity(),
        );
        // Capacity never exceeds `MAX_PARAMS`, so this fits.
        self.length = n as u8 + 2;
    }

    /// Recompute the checksum from the ID, length, command, and stored parameters.
    #[inline]
    pub fn update_checksum(&mut self) {
        let sum = self
            .params()
            .iter()
            .fold(
                self.id.0.wrapping_add(self.length).wrapping_add(self.command.0),
                |sum, &byte| sum.wrapping_add(byte),
            );
        self.checksum = !sum;
    }

    /// Write the frame into `out`, stopping wherever `out` runs out.
    /// Returns how many bytes were written.
    ///
    /// The checksum byte is whatever the packet holds, so call
    /// [`Packet::update_checksum`] after editing fields by hand.
    /// A frame that parsed with [`TooMuchData`](crate::Error::TooMuchData)
    /// stops after its stored parameters, with no checksum.
    #[inline]
    pub fn data(&self, out: &mut [u8]) -> usize {
        let header = [SYNC, SYNC, self.id.0, self.length, self.command.0];
        let mut len = header.len().min(out.len());
        out[..len].copy_from_slice(&header[..len]);
        for i in 0..self.num_params() {
            let Some(&byte) = self.params.get(i) else {
                return len;
            };
            let Some(slot) = out.get_mut(len) else {
                break;
            };
            *slot = byte;
            len += 1;
        }
        if let Some(slot) = out.get_mut(len) {
            *slot = self.checksum;
            len += 1;
        }
        len
    }
}
