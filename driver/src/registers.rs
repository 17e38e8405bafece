use {bioloid_packet::control_table::Value, core::ops::Range, paste::paste};

/// Bounds-checked little-endian view of a control table's bytes, with no hooks attached.
pub struct Registers<'bytes> {
    bytes: &'bytes mut [u8],
}

macro_rules! typed_accessors {
    ($($int:ident),+ $(,)?) => {
        paste! {
            $(
                #[inline(always)]
                pub fn [< get_ $int >](&self, offset: u8) -> $int {
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

impl<'bytes> Registers<'bytes> {
    /// # Panics
    /// If there are more bytes than one-byte offsets can reach.
    #[inline]
    pub fn new(bytes: &'bytes mut [u8]) -> Self {
        assert!(
            bytes.len() <= usize::from(u8::MAX) + 1,
            "a table of {} bytes can't be addressed by one-byte offsets",
            bytes.len(),
        );
        Self { bytes }
    }

    #[inline]
    fn range<V: Value>(&self, offset: u8) -> Range<usize> {
        let start = usize::from(offset);
        let end = start + V::BYTES;
        assert!(
            end <= self.bytes.len(),
            "offset 0x{offset:02X} + width {} exceeds the table size of {}",
            V::BYTES,
            self.bytes.len(),
        );
        start..end
    }

    /// # Panics
    /// If the value doesn't fit between `offset` and the end of the table.
    #[inline]
    pub fn get<V: Value>(&self, offset: u8) -> V {
        V::read_le(&self.bytes[self.range::<V>(offset)])
    }

    /// # Panics
    /// If the value doesn't fit between `offset` and the end of the table.
    #[inline]
    pub fn set<V: Value>(&mut self, offset: u8, value: V) {
        let range = self.range::<V>(offset);
        value.write_le(&mut self.bytes[range]);
    }

    typed_accessors!(u8, u16, u32, i8, i16, i32);

    #[inline(always)]
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    #[inline(always)]
    pub fn bytes(&self) -> &[u8] {
        self.bytes
    }

    #[inline(always)]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.bytes
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
