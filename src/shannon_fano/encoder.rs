use std::borrow::Borrow;

use super::code::{BitVector, Symbol, Table};
use crate::binary_stream::WordWriter;
use crate::error::Error;
use crate::logger;
use crate::Result;

impl<S: Symbol> Table<S> {
    /// Encode a symbol sequence into MSB-first packed 32-bit words.
    ///
    /// The returned vector always holds `total_bits / 32 + 1` words, the
    /// unused tail of the last word is zero.
    pub fn encode<I>(&self, symbols: I) -> Result<BitVector>
    where
        I: IntoIterator,
        I::Item: Borrow<S>,
    {
        if self.is_empty() {
            return Err(Error::EmptyTable);
        }
        let mut writer = WordWriter::new();
        for symbol in symbols {
            let symbol: &S = symbol.borrow();
            let code = self
                .get(symbol)
                .ok_or_else(|| Error::UnknownSymbol(format!("{:?}", symbol)))?;
            writer.write_bits(code.bits, code.length);
        }
        let (words, total_bits) = writer.finish();
        logger::log_words("encoded", &words, total_bits);
        Ok(BitVector::new(words, total_bits))
    }
}
