//! Host-side pieces for running a Bioloid device or controller on a desktop:
//! control tables persisted to a file, and a serial bus tunnelled over TCP.

pub mod file_storage;
pub mod socket;

pub use {file_storage::FileStorage, socket::SocketPort};

#[cfg(test)]
mod test_util;
