#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod constants;
pub mod control_table;
pub mod packet;

#[cfg(test)]
mod test_util;

pub use {
    constants::{Command, Error, Flags, Id},
    packet::Packet,
};
