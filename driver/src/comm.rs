use {bioloid_packet::Packet, core::fmt};

/// Why no byte came back.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecvError<E> {
    TimedOut,
    Io(E),
}

impl<E: fmt::Display> fmt::Display for RecvError<E> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::TimedOut => f.write_str("Timed out waiting for a byte"),
            Self::Io(ref e) => write!(f, "Error reading a byte: {e}"),
        }
    }
}

/// The serial link a device or controller talks over.
#[expect(
    async_fn_in_trait,
    reason = "ports are driven by single-threaded executors, so no `Send` bound is needed"
)]
pub trait Port {
    type Error: fmt::Debug;

    /// Bytes that can be read right now without waiting.
    fn available(&mut self) -> usize;

    /// Called whenever the baud rate register changes.
    #[inline(always)]
    fn set_baud_rate(&mut self, bit_rate: u32) {
        let _ = bit_rate;
    }

    /// Wait for the next byte, or for this port's timeout, if it has one.
    async fn read_byte(&mut self) -> Result<u8, RecvError<Self::Error>>;

    /// Serialize and transmit `packet` as it stands; its checksum is not recomputed.
    async fn write_packet(&mut self, packet: &Packet<'_>) -> Result<(), Self::Error>;
}

impl<P: Port> Port for &mut P {
    type Error = P::Error;

    #[inline(always)]
    fn available(&mut self) -> usize {
        (**self).available()
    }

    #[inline(always)]
    fn set_baud_rate(&mut self, bit_rate: u32) {
        (**self).set_baud_rate(bit_rate)
    }

    #[inline(always)]
    async fn read_byte(&mut self) -> Result<u8, RecvError<Self::Error>> {
        (**self).read_byte().await
    }

    #[inline(always)]
    async fn write_packet(&mut self, packet: &Packet<'_>) -> Result<(), Self::Error> {
        (**self).write_packet(packet).await
    }
}

#[cfg(test)]
mod test {
    use {super::*, crate::test_util::TestPort};

    #[test]
    fn baud_rate_is_ignored_by_default() {
        struct Silent;
        impl Port for Silent {
            type Error = ();
            fn available(&mut self) -> usize {
                0
            }
            async fn read_byte(&mut self) -> Result<u8, RecvError<()>> {
                Err(RecvError::TimedOut)
            }
            async fn write_packet(&mut self, _: &Packet<'_>) -> Result<(), ()> {
                Ok(())
            }
        }
        let mut port = Silent;
        port.set_baud_rate(57_600);
        assert_eq!(port.available(), 0);
    }

    #[test]
    fn borrowed_port_forwards() {
        fn retune<P: Port>(mut port: P) -> usize {
            port.set_baud_rate(115_200);
            port.available()
        }
        let mut port = TestPort::new(&[0x12, 0x34]);
        assert_eq!(retune(&mut port), 2);
        assert_eq!(port.baud_rates, [115_200]);
    }

    #[test]
    fn display() {
        assert_eq!(
            RecvError::<&str>::TimedOut.to_string(),
            "Timed out waiting for a byte",
        );
        assert_eq!(
            RecvError::Io("framing error").to_string(),
            "Error reading a byte: framing error",
        );
    }
}
