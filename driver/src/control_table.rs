//! A device's control table: the registers a controller reads and writes over the bus,
//! with the leading persistent range mirrored to [`Storage`].
//!
//! Device-specific behavior plugs in through [`Hooks`]: volatile registers can be
//! refreshed just before each read, and writes can be acted on just after.
//! The base behavior, shared by every device, retunes the [`Port`] whenever
//! the baud rate register changes.

use {
    crate::{comm::Port, registers::Registers, storage::Storage},
    bioloid_packet::control_table::{
        self as items, BaudRate, DEFAULT_BAUD, DEFAULT_DEVICE_ID, DEFAULT_RETURN_DELAY_TIME,
        Item, ReturnDelayTime, Value, bit_rate,
    },
    paste::paste,
};

/// Where [`ControlTable::load`] got its values.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Loaded {
    FromStorage,
    /// Storage failed, so the table was reset to its defaults.
    InitialValues,
}

/// Device-specific extensions. Every method defaults to doing nothing,
/// and `()` is the plain base device.
pub trait Hooks<P: Port> {
    /// Write this device's defaults. Runs after the table is zeroed and the
    /// base defaults are written.
    #[inline(always)]
    fn set_to_initial_values(&mut self, registers: &mut Registers<'_>) {
        let _ = registers;
    }

    /// Refresh a volatile value just before it's read.
    #[inline(always)]
    fn populate_entry(&mut self, offset: u8, registers: &mut Registers<'_>) {
        let _ = (offset, registers);
    }

    /// React to a write, once per write, with the written field's first offset.
    #[inline(always)]
    fn entry_modified(&mut self, offset: u8, registers: &Registers<'_>, port: &mut P) {
        let _ = (offset, registers, port);
    }
}

impl<P: Port> Hooks<P> for () {}

pub struct ControlTable<'bytes, S: Storage, P: Port, H: Hooks<P> = ()> {
    registers: Registers<'bytes>,
    persistent_bytes: usize,
    storage: S,
    port: P,
    hooks: H,
}

macro_rules! typed_accessors {
    ($($int:ident),+ $(,)?) => {
        paste! {
            $(
                #[inline(always)]
                pub fn [< get_ $int >](&mut self, offset: u8) -> $int {
                    self.get(offset)
                }

                #[inline(always)]
                pub fn [< set_ $int >](&mut self, offset: u8, value: $int) {
                    self.set(offset, value)
                }
            )+
        }
    };
}

impl<'bytes, S: Storage, P: Port> ControlTable<'bytes, S, P> {
    /// A base device. The first `persistent_bytes` of `bytes` are the ones that get saved.
    ///
    /// # Panics
    /// If the persistent range is longer than the table, or the table is too long
    /// for one-byte offsets.
    #[inline]
    pub fn new(bytes: &'bytes mut [u8], persistent_bytes: usize, storage: S, port: P) -> Self {
        Self::with_hooks(bytes, persistent_bytes, storage, port, ())
    }
}

impl<'bytes, S: Storage, P: Port, H: Hooks<P>> ControlTable<'bytes, S, P, H> {
    /// # Panics
    /// If the persistent range is longer than the table, or the table is too long
    /// for one-byte offsets.
    #[inline]
    pub fn with_hooks(
        bytes: &'bytes mut [u8],
        persistent_bytes: usize,
        storage: S,
        port: P,
        hooks: H,
    ) -> Self {
        assert!(
            persistent_bytes <= bytes.len(),
            "persistent range of {persistent_bytes} bytes exceeds the table size of {}",
            bytes.len(),
        );
        Self {
            registers: Registers::new(bytes),
            persistent_bytes,
            storage,
            port,
            hooks,
        }
    }

    /// # Panics
    /// If the value doesn't fit between `offset` and the end of the table.
    #[inline]
    pub fn get<V: Value>(&mut self, offset: u8) -> V {
        self.hooks.populate_entry(offset, &mut self.registers);
        self.registers.get(offset)
    }

    /// # Panics
    /// If the value doesn't fit between `offset` and the end of the table.
    #[inline]
    pub fn set<V: Value>(&mut self, offset: u8, value: V) {
        self.registers.set(offset, value);
        self.entry_modified(offset, V::BYTES);
    }

    typed_accessors!(u8, u16, u32, i8, i16, i32);

    #[inline(always)]
    pub fn read<I: Item>(&mut self) -> I::Value {
        self.get(I::ADDRESS)
    }

    #[inline(always)]
    pub fn write<I: Item>(&mut self, value: I::Value) {
        self.set(I::ADDRESS, value)
    }

    fn entry_modified(&mut self, offset: u8, width: usize) {
        let start = usize::from(offset);
        if (start..start + width).contains(&usize::from(BaudRate::ADDRESS)) {
            let divisor = self.registers.get_u8(BaudRate::ADDRESS);
            let bit_rate = bit_rate(divisor);
            debug!("Baud rate divisor {} selects {} bit/s", divisor, bit_rate);
            self.port.set_baud_rate(bit_rate);
        }
        self.hooks.entry_modified(offset, &self.registers, &mut self.port);
    }

    /// Zero the table, then write the base defaults (through the usual write path,
    /// so the port hears about the baud rate) followed by the device's own.
    #[inline]
    pub fn load_initial_values(&mut self) {
        self.registers.clear();
        self.write::<items::Id>(DEFAULT_DEVICE_ID);
        self.write::<BaudRate>(DEFAULT_BAUD);
        self.write::<ReturnDelayTime>(DEFAULT_RETURN_DELAY_TIME);
        self.hooks.set_to_initial_values(&mut self.registers);
    }

    /// Zero the table and fill its persistent range from storage,
    /// falling back to [`ControlTable::load_initial_values`] if storage fails.
    #[inline]
    pub fn load(&mut self) -> Loaded {
        self.registers.clear();
        let persistent = &mut self.registers.bytes_mut()[..self.persistent_bytes];
        if self.storage.load(0, persistent).is_ok() {
            return Loaded::FromStorage;
        }
        warn!(
            "Couldn't load {} persistent bytes; falling back to initial values",
            self.persistent_bytes,
        );
        self.load_initial_values();
        Loaded::InitialValues
    }

    /// Write the persistent range to storage.
    #[inline]
    pub fn save(&mut self) -> Result<(), S::Error> {
        self.storage.save(0, &self.registers.bytes()[..self.persistent_bytes])
    }

    /// Every byte as it stands, without refreshing volatile values.
    #[inline(always)]
    pub fn bytes(&self) -> &[u8] {
        self.registers.bytes()
    }

    #[inline(always)]
    pub fn registers(&self) -> &Registers<'bytes> {
        &self.registers
    }

    #[inline(always)]
    pub fn total_bytes(&self) -> usize {
        self.registers.len()
    }

    #[inline(always)]
    pub const fn persistent_bytes(&self) -> usize {
        self.persistent_bytes
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
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[inline(always)]
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    #[inline(always)]
    pub const fn hooks(&self) -> &H {
        &self.hooks
    }

    #[inline(always)]
    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }
}
