use std::fmt::{self, Debug, Display};

use super::code::{BitVector, Code, Symbol, Table};
use crate::binary_stream::{WordReader, WORD_BITS};
use crate::error::Error;

/// Storage checks applied before decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Demand one word more than `total_bits / 32`, which is what the
    /// encoder always produces. Without it the words only have to be
    /// large enough to hold `total_bits`.
    pub require_guard_word: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            require_guard_word: true,
        }
    }
}

/// A failed decode together with the symbols decoded before the failure
#[derive(Debug)]
pub struct DecodeFailure<S> {
    pub error: Error,
    pub partial: Vec<S>,
}

impl<S> DecodeFailure<S> {
    fn new(error: Error, partial: Vec<S>) -> Self {
        DecodeFailure { error, partial }
    }

    pub fn into_parts(self) -> (Error, Vec<S>) {
        (self.error, self.partial)
    }
}

impl<S> Display for DecodeFailure<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (after {} decoded symbols)",
            self.error,
            self.partial.len()
        )
    }
}

impl<S: Debug> std::error::Error for DecodeFailure<S> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<S> From<DecodeFailure<S>> for Error {
    fn from(failure: DecodeFailure<S>) -> Self {
        failure.error
    }
}

fn validate_storage(
    word_count: usize,
    total_bits: usize,
    config: DecoderConfig,
) -> Result<(), Error> {
    let sufficient = if config.require_guard_word {
        word_count > total_bits / WORD_BITS
    } else {
        word_count
            .checked_mul(WORD_BITS)
            .map_or(true, |capacity| capacity >= total_bits)
    };
    if sufficient {
        Ok(())
    } else {
        Err(Error::InvalidVector(word_count, total_bits))
    }
}

impl<S: Symbol> Table<S> {
    /// Decode `total_bits` bits of `words` with the default storage checks
    pub fn decode(&self, words: &[u32], total_bits: usize) -> Result<Vec<S>, DecodeFailure<S>> {
        self.decode_with(words, total_bits, DecoderConfig::default())
    }

    /// Decode bit by bit, emitting a symbol whenever the accumulated bits
    /// equal one of the table's codes.
    ///
    /// Fails once the accumulated bits grow longer than the longest code,
    /// and when the stream ends in the middle of a code. Both failures
    /// carry the symbols decoded so far.
    pub fn decode_with(
        &self,
        words: &[u32],
        total_bits: usize,
        config: DecoderConfig,
    ) -> Result<Vec<S>, DecodeFailure<S>> {
        validate_storage(words.len(), total_bits, config)
            .map_err(|error| DecodeFailure::new(error, Vec::new()))?;
        let max_code_length = self.max_code_length();
        let mut reader = WordReader::new(words);
        let mut decoded = Vec::new();
        let mut bits = 0u32;
        let mut length = 0;
        while reader.position() < total_bits {
            bits = bits << 1 | reader.read_bit() as u32;
            length += 1;
            if length > max_code_length {
                let error = Error::NoMatchingCode(reader.position() - length);
                log::warn!("{}", error);
                return Err(DecodeFailure::new(error, decoded));
            }
            if let Some(code) = self.find_code(bits, length) {
                decoded.push(code.symbol.clone());
                bits = 0;
                length = 0;
            }
        }
        if length != 0 {
            let error = Error::TrailingBits(length);
            log::warn!("{}", error);
            return Err(DecodeFailure::new(error, decoded));
        }
        Ok(decoded)
    }

    fn find_code(&self, bits: u32, length: usize) -> Option<&Code<S>> {
        self.iter().find(|code| code.matches(bits, length))
    }
}

impl BitVector {
    pub fn decode<S: Symbol>(&self, table: &Table<S>) -> Result<Vec<S>, DecodeFailure<S>> {
        table.decode(self.words(), self.total_bits())
    }
}
