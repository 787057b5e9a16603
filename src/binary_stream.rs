/// Number of bits held by one storage word
pub const WORD_BITS: usize = u32::BITS as usize;

/// State for packing variable-length codes into 32-bit words,
/// most significant bit first
pub struct WordWriter {
    /// the packed words, the last one is only partially filled
    words: Vec<u32>,
    /// how many bits have been written so far
    total_bits: usize,
}

impl WordWriter {
    pub fn new() -> WordWriter {
        WordWriter {
            words: vec![0],
            total_bits: 0,
        }
    }

    /// write the low `length` bits of `bits`
    ///
    /// A code that fills the current word up to its last bit opens the
    /// next word right away, so the writer always owns one word more than
    /// the completely filled ones.
    pub fn write_bits(&mut self, bits: u32, length: usize) {
        if length == 0 {
            return;
        }
        debug_assert!(length <= WORD_BITS, "code longer than one word");
        let bits = if length < WORD_BITS {
            bits & ((1 << length) - 1)
        } else {
            bits
        };
        let remaining = WORD_BITS - self.total_bits % WORD_BITS;
        let last = self.words.len() - 1;
        if length < remaining {
            self.words[last] |= bits << (remaining - length);
        } else {
            let overflow = length - remaining;
            self.words[last] |= bits >> overflow;
            // overflow == 0 pushes an empty word
            self.words
                .push(bits.checked_shl((WORD_BITS - overflow) as u32).unwrap_or(0));
        }
        self.total_bits += length;
    }

    pub fn total_bits(&self) -> usize {
        self.total_bits
    }

    pub fn finish(self) -> (Vec<u32>, usize) {
        (self.words, self.total_bits)
    }
}

impl Default for WordWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// State for popping single bits from the front of a word slice
pub struct WordReader<'a> {
    words: &'a [u32],
    /// word currently being shifted out
    current: u32,
    next_index: usize,
    position: usize,
}

impl<'a> WordReader<'a> {
    pub fn new(words: &'a [u32]) -> WordReader<'a> {
        WordReader {
            words,
            current: words.first().copied().unwrap_or(0),
            next_index: 1,
            position: 0,
        }
    }

    /// pop the next bit, reading past the end of the slice yields zeros
    pub fn read_bit(&mut self) -> bool {
        let bit = self.current >> (WORD_BITS - 1);
        self.current <<= 1;
        self.position += 1;
        if self.position % WORD_BITS == 0 {
            self.current = self.words.get(self.next_index).copied().unwrap_or(0);
            self.next_index += 1;
        }
        bit == 1
    }

    /// number of bits read so far
    pub fn position(&self) -> usize {
        self.position
    }
}
