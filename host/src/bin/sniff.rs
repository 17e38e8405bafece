//! Log every packet that crosses a Bioloid bus exposed over TCP,
//! or ping one device and report its reply.

use {
    anyhow::{Context, bail},
    bioloid_driver::{Bus, RecvError, bus},
    bioloid_host::SocketPort,
    bioloid_packet::{Command, Id, Packet},
    clap::Parser,
    embassy_futures::block_on,
    log::{info, warn},
    std::time::Duration,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Address of the serial-to-TCP bridge, e.g. `192.168.4.1:5000`
    #[arg(short, long)]
    connect: String,

    /// Parameters kept per packet; longer packets are reported as `TooMuchData`
    #[arg(long, default_value_t = 253, value_parser = clap::value_parser!(u8).range(0..=253))]
    max_params: u8,

    /// Milliseconds of silence before reporting a timeout (wait forever if unset)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,

    /// Ping this device ID once instead of listening
    #[arg(short, long)]
    ping: Option<u8>,

    /// Log at debug level unless `RUST_LOG` says otherwise
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    let port = SocketPort::connect(&args.connect, args.timeout_ms.map(Duration::from_millis))
        .with_context(|| format!("couldn't connect to {}", args.connect))?;
    info!("Connected to {}", args.connect);
    let mut bus = Bus::new(port);

    let mut params = vec![0; usize::from(args.max_params)];
    let mut packet = Packet::new(&mut params);

    if let Some(id) = args.ping {
        return ping(&mut bus, Id(id), &mut packet);
    }

    loop {
        match block_on(bus.receive(&mut packet)) {
            Ok(()) => info!("{packet}"),
            Err(bus::Error::Packet(status)) => warn!("{status}: {packet}"),
            Err(bus::Error::Recv(RecvError::TimedOut)) => {
                info!("No traffic for {} ms", args.timeout_ms.unwrap_or_default());
            }
            Err(e) => bail!("{e}"),
        }
    }
}

fn ping(bus: &mut Bus<SocketPort>, id: Id, response: &mut Packet<'_>) -> anyhow::Result<()> {
    let mut no_params = [];
    let mut request = Packet::new(&mut no_params);
    request.set_id(id);
    request.set_command(Command::PING);
    request.update_checksum();

    match block_on(bus.transact(&request, response)) {
        Ok(()) if id.is_broadcast() => info!("Pinged every device; none of them answer a broadcast"),
        Ok(()) => info!("{id} answered: {}", response.error_code()),
        Err(e) => bail!("Pinging {id} failed: {e}"),
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(extra: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(
            ["bioloid-sniff", "--connect", "127.0.0.1:5000"]
                .iter()
                .chain(extra)
                .copied(),
        )
    }

    #[test]
    fn defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.max_params, 253);
        assert_eq!(args.timeout_ms, None);
        assert_eq!(args.ping, None);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        // A zero read timeout is an error to the socket, not "don't wait".
        assert!(parse(&["--timeout-ms", "0"]).is_err());
        assert_eq!(parse(&["--timeout-ms", "1"]).unwrap().timeout_ms, Some(1));
    }

    #[test]
    fn too_many_params_are_rejected() {
        assert!(parse(&["--max-params", "254"]).is_err());
        assert_eq!(parse(&["--max-params", "0"]).unwrap().max_params, 0);
    }
}
