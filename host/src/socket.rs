use {
    bioloid_driver::{Port, RecvError},
    bioloid_packet::{Packet, packet::MAX_PACKET_BYTES},
    log::{debug, warn},
    std::{
        io::{self, BufReader, Read, Write},
        net::{TcpStream, ToSocketAddrs},
        time::Duration,
    },
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("connection closed by the other end")]
    Closed,
}

/// A serial bus tunnelled over TCP, one wire byte per stream byte,
/// as served by the usual serial-to-network bridges.
///
/// There's no line rate to set, so baud rate changes are only logged.
#[derive(Debug)]
pub struct SocketPort {
    stream: BufReader<TcpStream>,
}

impl SocketPort {
    #[inline]
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream: BufReader::new(stream),
        }
    }

    /// Connect, waiting at most `timeout` for each byte read afterward (forever if `None`).
    #[inline]
    pub fn connect(addr: impl ToSocketAddrs, timeout: Option<Duration>) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_read_timeout(timeout)?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }

    #[inline]
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.stream.get_ref().set_read_timeout(timeout)
    }

    #[inline(always)]
    pub fn get_ref(&self) -> &TcpStream {
        self.stream.get_ref()
    }

    fn peek_without_blocking(&self) -> io::Result<usize> {
        let stream = self.stream.get_ref();
        let mut buffer = [0; MAX_PACKET_BYTES];
        stream.set_nonblocking(true)?;
        let peeked = match stream.peek(&mut buffer) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) => Err(e),
        };
        if let Err(e) = stream.set_nonblocking(false) {
            warn!("Couldn't put the socket back in blocking mode: {e}");
        }
        peeked
    }
}

impl Port for SocketPort {
    type Error = Error;

    /// Buffered bytes plus whatever the socket holds, up to one packet's worth.
    #[inline]
    fn available(&mut self) -> usize {
        let buffered = self.stream.buffer().len();
        match self.peek_without_blocking() {
            Ok(n) => buffered + n,
            Err(e) => {
                warn!("Couldn't peek at the socket: {e}");
                buffered
            }
        }
    }

    #[inline]
    fn set_baud_rate(&mut self, bit_rate: u32) {
        debug!("Ignoring a baud rate of {bit_rate} bit/s on a TCP port");
    }

    async fn read_byte(&mut self) -> Result<u8, RecvError<Self::Error>> {
        let mut byte = [0];
        loop {
            match self.stream.read(&mut byte) {
                Ok(0) => return Err(RecvError::Io(Error::Closed)),
                Ok(_) => return Ok(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                    return Err(RecvError::TimedOut);
                }
                Err(e) => return Err(RecvError::Io(Error::Io(e))),
            }
        }
    }

    async fn write_packet(&mut self, packet: &Packet<'_>) -> Result<(), Self::Error> {
        let mut buffer = [0; MAX_PACKET_BYTES];
        let written = packet.data(&mut buffer);
        let stream = self.stream.get_mut();
        stream.write_all(&buffer[..written])?;
        stream.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        bioloid_driver::Bus,
        bioloid_packet::{Command, Id},
        embassy_futures::block_on,
        std::{
            net::{Ipv4Addr, TcpListener},
            thread,
            time::Instant,
        },
    };

    fn pair(timeout: Option<Duration>) -> (SocketPort, TcpStream) {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port = SocketPort::connect(listener.local_addr().unwrap(), timeout).unwrap();
        let (peer, _) = listener.accept().unwrap();
        (port, peer)
    }

    #[test]
    fn write_packet() {
        let (port, mut peer) = pair(None);
        let mut bus = Bus::new(port);
        let mut params = [0; 2];
        let mut request = Packet::new(&mut params);
        request.set_id(Id::BROADCAST);
        request.set_command(Command::WRITE);
        request.set_params(&[0x03, 0x01]);
        request.update_checksum();
        block_on(bus.send(&request)).unwrap();

        let mut wire = [0; 8];
        peer.read_exact(&mut wire).unwrap();
        assert_eq!(wire, [0xFF, 0xFF, 0xFE, 0x04, 0x03, 0x03, 0x01, 0xF6]);
    }

    #[test]
    fn receive() {
        let (port, mut peer) = pair(Some(Duration::from_secs(5)));
        peer.write_all(&[0x00, 0xFF, 0xFF, 0x01, 0x03, 0x00, 0x20, 0xDB]).unwrap();

        let mut bus = Bus::new(port);
        let mut params = [0; 4];
        let mut response = Packet::new(&mut params);
        block_on(bus.receive(&mut response)).unwrap();
        assert_eq!(response.id(), Id(0x01));
        assert_eq!(response.params(), &[0x20]);
    }

    #[test]
    fn available() {
        let (mut port, mut peer) = pair(Some(Duration::from_secs(5)));
        assert_eq!(port.available(), 0);
        peer.write_all(&[0xFF, 0xFF, 0x01, 0x02, 0x00, 0xFC]).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while port.available() < 6 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(port.available(), 6);
        assert!(matches!(block_on(port.read_byte()), Ok(0xFF)));
        assert_eq!(port.available(), 5);
    }

    #[test]
    fn reads_still_block_after_a_peek() {
        let (mut port, _peer) = pair(Some(Duration::from_millis(50)));
        assert_eq!(port.available(), 0);
        let start = Instant::now();
        assert!(matches!(block_on(port.read_byte()), Err(RecvError::TimedOut)));
        // A socket left non-blocking would give up at once.
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn timeout() {
        let (mut port, _peer) = pair(Some(Duration::from_millis(10)));
        assert!(matches!(block_on(port.read_byte()), Err(RecvError::TimedOut)));
    }

    #[test]
    fn closed() {
        let (mut port, peer) = pair(Some(Duration::from_secs(5)));
        drop(peer);
        assert!(matches!(
            block_on(port.read_byte()),
            Err(RecvError::Io(Error::Closed)),
        ));
    }
}
