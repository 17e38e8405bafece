use {
    crate::comm::{Port, RecvError},
    bioloid_packet::{Packet, packet::MAX_PACKET_BYTES},
    core::{
        future::Future,
        pin::Pin,
        task::{Context, Poll, Waker},
    },
    std::collections::VecDeque,
};

/// Polls once and expects an answer: none of the test ports ever wait.
pub fn trivial_future<F: Future>(future: Pin<&mut F>) -> F::Output {
    match future.poll(&mut Context::from_waker(Waker::noop())) {
        Poll::Ready(ready) => ready,
        Poll::Pending => panic!("test future wasn't ready on the first poll"),
    }
}

/// Replies from a script, times out once it runs dry, and records everything else.
#[derive(Debug, Default)]
pub struct TestPort {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub baud_rates: Vec<u32>,
    pub broken: bool,
}

impl TestPort {
    pub fn new(rx: &[u8]) -> Self {
        Self {
            rx: rx.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl Port for TestPort {
    type Error = &'static str;

    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn set_baud_rate(&mut self, bit_rate: u32) {
        self.baud_rates.push(bit_rate);
    }

    async fn read_byte(&mut self) -> Result<u8, RecvError<Self::Error>> {
        if self.broken {
            return Err(RecvError::Io("broken"));
        }
        self.rx.pop_front().ok_or(RecvError::TimedOut)
    }

    async fn write_packet(&mut self, packet: &Packet<'_>) -> Result<(), Self::Error> {
        if self.broken {
            return Err("broken");
        }
        let mut buffer = [0; MAX_PACKET_BYTES];
        let written = packet.data(&mut buffer);
        self.tx.extend_from_slice(&buffer[..written]);
        Ok(())
    }
}
