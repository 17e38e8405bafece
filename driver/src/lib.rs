#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod bus;
pub mod comm;
pub mod control_table;
pub mod registers;
pub mod storage;

#[cfg(test)]
mod test_util;

pub use {
    bus::Bus,
    comm::{Port, RecvError},
    control_table::{ControlTable, Hooks, Loaded},
    registers::Registers,
    storage::{MemoryStorage, Storage},
};
