use fixedbitset::FixedBitSet;

use crate::quantization;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    Read,
    Write,
}

/// A bit cursor over at most `N` bits.
///
/// An archive is either a writer or a reader for its whole life. Every value
/// takes an exact, caller-chosen number of bits, so the reader must replay
/// the writer's calls in the same order and with the same widths.
///
/// Misuse is a bug and panics: reading from a writer, writing to a reader,
/// going past `N` bits, or writing an integer wider than its declared width.
///
/// # Examples
///
/// ```
/// use ee_serialize::BitArchive;
///
/// let mut writer = BitArchive::<64>::writer();
/// writer.write_bool(true);
/// writer.write_uint(5, 3);
/// writer.write_normalized_float8(-0.5);
///
/// assert_eq!(writer.num_bits_written(), 12);
/// let bytes = writer.get_written_data();
/// assert_eq!(bytes.len(), 2);
///
/// let mut reader = BitArchive::<64>::reader(&bytes);
/// assert!(reader.read_bool());
/// assert_eq!(reader.read_uint(3), 5);
/// assert!((reader.read_normalized_float8() + 0.5).abs() < 0.01);
/// assert_eq!(reader.num_bits_read(), 12);
/// ```
#[derive(Clone, Debug)]
pub struct BitArchive<const N: usize> {
    bits: FixedBitSet,
    position: usize,
    mode: Mode,
}

impl<const N: usize> BitArchive<N> {
    /// An empty archive for writing.
    pub fn writer() -> Self {
        Self {
            bits: FixedBitSet::with_capacity(N),
            position: 0,
            mode: Mode::Write,
        }
    }

    /// An archive reading `bytes`, least significant bit of each byte first.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` holds more than `N` bits, rounded up to whole bytes.
    pub fn reader(bytes: &[u8]) -> Self {
        assert!(
            bytes.len() <= N.div_ceil(8),
            "{} bytes exceed the {N} bit capacity",
            bytes.len(),
        );

        let mut bits = FixedBitSet::with_capacity(N);
        for (byte_index, &byte) in bytes.iter().enumerate() {
            for bit in 0..8 {
                let index = byte_index * 8 + bit;
                if byte & (1 << bit) != 0 {
                    assert!(index < N, "bit {index} is set past the {N} bit capacity");
                    bits.insert(index);
                }
            }
        }

        Self {
            bits,
            position: 0,
            mode: Mode::Read,
        }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    pub fn is_reading(&self) -> bool {
        self.mode == Mode::Read
    }

    #[inline]
    pub fn is_writing(&self) -> bool {
        self.mode == Mode::Write
    }

    #[inline]
    pub fn num_bits_written(&self) -> usize {
        assert!(self.is_writing(), "bit archive is not writing");
        self.position
    }

    #[inline]
    pub fn num_bits_read(&self) -> usize {
        assert!(self.is_reading(), "bit archive is not reading");
        self.position
    }

    /// The written bits, packed into `ceil(bits / 8)` bytes.
    pub fn get_written_data(&self) -> Vec<u8> {
        assert!(self.is_writing(), "bit archive is not writing");

        let mut bytes = vec![0u8; self.position.div_ceil(8)];
        for index in self.bits.ones().take_while(|&index| index < self.position) {
            bytes[index / 8] |= 1 << (index % 8);
        }
        bytes
    }

    // -------------------------------------------------------------------------
    // Raw bits

    #[inline]
    fn advance(&mut self, count: usize) -> usize {
        assert!(
            self.position + count <= N,
            "bit archive overflow: {} + {count} bits exceed {N}",
            self.position,
        );
        let start = self.position;
        self.position += count;
        start
    }

    fn write_bits(&mut self, value: u32, count: usize) {
        assert!(self.is_writing(), "bit archive is not writing");
        let start = self.advance(count);
        for bit in 0..count {
            self.bits.set(start + bit, value & (1 << bit) != 0);
        }
    }

    fn read_bits(&mut self, count: usize) -> u32 {
        assert!(self.is_reading(), "bit archive is not reading");
        let start = self.advance(count);
        (0..count)
            .filter(|&bit| self.bits.contains(start + bit))
            .fold(0, |value, bit| value | (1 << bit))
    }

    // -------------------------------------------------------------------------
    // Values

    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.write_bits(value as u32, 1);
    }

    #[inline]
    pub fn read_bool(&mut self) -> bool {
        self.read_bits(1) != 0
    }

    /// Write `value` using exactly `bits` bits.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not in `1..=32` or `value` needs more than `bits`.
    pub fn write_uint(&mut self, value: u32, bits: u32) {
        assert!((1..=32).contains(&bits), "invalid bit width {bits}");
        assert!(
            u32::BITS - value.leading_zeros() <= bits,
            "{value} does not fit in {bits} bits",
        );
        self.write_bits(value, bits as usize);
    }

    /// # Panics
    ///
    /// Panics if `bits` is not in `1..=32`.
    pub fn read_uint(&mut self, bits: u32) -> u32 {
        assert!((1..=32).contains(&bits), "invalid bit width {bits}");
        self.read_bits(bits as usize)
    }

    /// Write a value in `[-1, 1]` using 8 bits.
    #[inline]
    pub fn write_normalized_float8(&mut self, value: f32) {
        self.write_bits(quantization::encode_signed_normalized_float8(value) as u32, 8);
    }

    #[inline]
    pub fn read_normalized_float8(&mut self) -> f32 {
        quantization::decode_signed_normalized_float8(self.read_bits(8) as u8)
    }

    /// Write a value in `[-1, 1]` using 16 bits.
    #[inline]
    pub fn write_normalized_float16(&mut self, value: f32) {
        self.write_bits(quantization::encode_signed_normalized_float16(value) as u32, 16);
    }

    #[inline]
    pub fn read_normalized_float16(&mut self) -> f32 {
        quantization::decode_signed_normalized_float16(self.read_bits(16) as u16)
    }

    /// Write a value in `[min, max]` using 16 bits.
    #[inline]
    pub fn write_quantized_float16(&mut self, value: f32, min: f32, max: f32) {
        self.write_bits(quantization::encode_float16(value, min, max) as u32, 16);
    }

    #[inline]
    pub fn read_quantized_float16(&mut self, min: f32, max: f32) -> f32 {
        quantization::decode_float16(self.read_bits(16) as u16, min, max)
    }

    /// Write the 32 raw bits of `value`.
    #[inline]
    pub fn write_float(&mut self, value: f32) {
        self.write_bits(value.to_bits(), 32);
    }

    #[inline]
    pub fn read_float(&mut self) -> f32 {
        f32::from_bits(self.read_bits(32))
    }
}
