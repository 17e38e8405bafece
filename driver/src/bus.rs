use {
    crate::comm::{Port, RecvError},
    bioloid_packet::Packet,
    core::fmt,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    Send(E),
    Recv(RecvError<E>),
    /// The frame arrived whole but didn't check out.
    Packet(::bioloid_packet::Error),
}

impl<E> Error<E> {
    /// The protocol's own name for this failure, if it has one.
    /// I/O errors are the port's business and have none.
    #[inline]
    pub const fn code(&self) -> Option<::bioloid_packet::Error> {
        match *self {
            Self::Recv(RecvError::TimedOut) => Some(::bioloid_packet::Error::Timeout),
            Self::Packet(e) => Some(e),
            Self::Send(_) | Self::Recv(RecvError::Io(_)) => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Send(ref e) => write!(f, "Error sending a packet: {e}"),
            Self::Recv(ref e) => write!(f, "Error receiving a packet: {e}"),
            Self::Packet(ref e) => write!(f, "Received a bad packet: {e}"),
        }
    }
}

/// One end of a half-duplex serial bus.
pub struct Bus<P: Port> {
    port: P,
}

impl<P: Port> Bus<P> {
    #[inline(always)]
    pub const fn new(port: P) -> Self {
        Self { port }
    }

    #[inline(always)]
    pub const fn port(&self) -> &P {
        &self.port
    }

    #[inline(always)]
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    #[inline(always)]
    pub fn into_inner(self) -> P {
        self.port
    }

    /// Transmit `packet` as it stands. Call [`Packet::update_checksum`] first.
    #[inline]
    pub async fn send(&mut self, packet: &Packet<'_>) -> Result<(), Error<P::Error>> {
        trace!("Sending {} to ID {}", packet.command(), packet.id());
        self.port.write_packet(packet).await.map_err(Error::Send)
    }

    /// Read bytes into `packet` until a whole frame has arrived.
    ///
    /// On a timeout or I/O error the partial frame is abandoned,
    /// so the next call starts looking for a fresh sync pair.
    #[inline]
    pub async fn receive(&mut self, packet: &mut Packet<'_>) -> Result<(), Error<P::Error>> {
        loop {
            let byte = match self.port.read_byte().await {
                Ok(byte) => byte,
                Err(e) => {
                    if let RecvError::TimedOut = e {
                        debug!("Timed out waiting for a reply");
                    }
                    packet.reset();
                    return Err(Error::Recv(e));
                }
            };
            match packet.process_byte(byte) {
                ::bioloid_packet::Error::NotDone => {}
                status if status.is_none() => return Ok(()),
                status => return Err(Error::Packet(status)),
            }
        }
    }

    /// Send `request` and wait for its reply in `response`.
    ///
    /// Nothing answers a broadcast, so for one of those this only sends,
    /// leaving `response` untouched.
    #[inline]
    pub async fn transact(
        &mut self,
        request: &Packet<'_>,
        response: &mut Packet<'_>,
    ) -> Result<(), Error<P::Error>> {
        self.send(request).await?;
        if request.id().is_broadcast() {
            return Ok(());
        }
        self.receive(response).await
    }
}
