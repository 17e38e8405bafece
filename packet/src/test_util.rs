use crate::{Error, Packet};

/// Parses `"ff ff 01 .."` into bytes.
pub fn hex(s: &str) -> Vec<u8> {
    s.split_whitespace()
        .map(|byte| u8::from_str_radix(byte, 16).unwrap())
        .collect()
}

/// Feeds bytes until the parser finishes a frame, returning its verdict,
/// or [`Error::NotDone`] if the bytes run out first.
pub fn feed(packet: &mut Packet<'_>, bytes: &[u8]) -> Error {
    for &byte in bytes {
        let result = packet.process_byte(byte);
        if result.is_done() {
            return result;
        }
    }
    Error::NotDone
}
