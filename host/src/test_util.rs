use {
    bioloid_driver::{Port, RecvError},
    bioloid_packet::Packet,
};

/// Never hears anything and drops everything it's given.
pub struct SilentPort;

impl Port for SilentPort {
    type Error = ();

    fn available(&mut self) -> usize {
        0
    }

    async fn read_byte(&mut self) -> Result<u8, RecvError<Self::Error>> {
        Err(RecvError::TimedOut)
    }

    async fn write_packet(&mut self, _: &Packet<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}
