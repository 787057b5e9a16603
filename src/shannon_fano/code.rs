use std::collections::btree_map::{BTreeMap, Values};
use std::fmt::{self, Debug};
use std::io::{Read, Write};

use crate::error::Error;
use crate::Result;

/// Longest code a table entry can carry
pub const MAX_CODE_LENGTH: usize = u32::BITS as usize;

/// A unit that can be placed into a [`Table`].
///
/// Symbols are ordered so that table construction and iteration are
/// reproducible, and they know how to write themselves into the table
/// file format with a fixed width.
pub trait Symbol: Ord + Clone + Debug {
    fn write_symbol<W: Write>(&self, writer: &mut W) -> Result<()>;
    fn read_symbol<R: Read>(reader: &mut R) -> Result<Self>;
}

macro_rules! impl_unsigned_symbol {
    ($($t:ty),*) => {
        $(
            impl Symbol for $t {
                fn write_symbol<W: Write>(&self, writer: &mut W) -> Result<()> {
                    writer.write_all(&self.to_le_bytes())?;
                    Ok(())
                }

                fn read_symbol<R: Read>(reader: &mut R) -> Result<Self> {
                    let mut buf = [0; std::mem::size_of::<$t>()];
                    reader.read_exact(&mut buf)?;
                    Ok(<$t>::from_le_bytes(buf))
                }
            }
        )*
    };
}

impl_unsigned_symbol!(u8, u16, u32);

impl Symbol for char {
    fn write_symbol<W: Write>(&self, writer: &mut W) -> Result<()> {
        (*self as u32).write_symbol(writer)
    }

    fn read_symbol<R: Read>(reader: &mut R) -> Result<Self> {
        let scalar = u32::read_symbol(reader)?;
        char::from_u32(scalar).ok_or(Error::InvalidTable(
            "symbol is not a unicode scalar value",
        ))
    }
}

/// One table entry. `bits` is right-justified within `length`.
#[derive(Debug, Clone, PartialEq)]
pub struct Code<S> {
    pub symbol: S,
    /// only meaningful while the table is being built
    pub probability: f64,
    pub bits: u32,
    pub length: usize,
}

impl<S> Code<S> {
    pub fn new(symbol: S, probability: f64) -> Self {
        Code {
            symbol,
            probability,
            bits: 0,
            length: 0,
        }
    }

    /// append one bit behind the least significant end of the code
    pub fn push_bit(&mut self, bit: bool) {
        self.bits = self.bits << 1 | bit as u32;
        self.length += 1;
    }

    /// true if the first `self.length` bits of `other` equal this code
    pub fn is_prefix_of<T>(&self, other: &Code<T>) -> bool {
        if self.length > other.length {
            return false;
        }
        let shift = (other.length - self.length) as u32;
        other.bits.checked_shr(shift).unwrap_or(0) == self.bits
    }

    pub fn matches(&self, bits: u32, length: usize) -> bool {
        self.length == length && self.bits == bits
    }
}

/// Lookup map from symbol to its code. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<S: Symbol> {
    codes: BTreeMap<S, Code<S>>,
}

impl<S: Symbol> Table<S> {
    pub(crate) fn from_map(codes: BTreeMap<S, Code<S>>) -> Self {
        Table { codes }
    }

    pub(crate) fn from_codes(codes: Vec<Code<S>>) -> Self {
        let codes = codes
            .into_iter()
            .map(|code| (code.symbol.clone(), code))
            .collect();
        Table { codes }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn get(&self, symbol: &S) -> Option<&Code<S>> {
        self.codes.get(symbol)
    }

    /// codes in ascending symbol order
    pub fn iter(&self) -> Values<'_, S, Code<S>> {
        self.codes.values()
    }

    pub fn max_code_length(&self) -> usize {
        self.iter().map(|code| code.length).max().unwrap_or(0)
    }

    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Code<S>> = self.iter().collect();
        codes.iter().enumerate().all(|(index, first)| {
            codes[index + 1..]
                .iter()
                .all(|second| !first.is_prefix_of(second) && !second.is_prefix_of(first))
        })
    }
}

impl<'a, S: Symbol> IntoIterator for &'a Table<S> {
    type Item = &'a Code<S>;
    type IntoIter = Values<'a, S, Code<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: Symbol> fmt::Display for Table<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for code in self.iter() {
            writeln!(
                f,
                "{:?}\t{:0width$b}\t{}",
                code.symbol,
                code.bits,
                code.length,
                width = code.length
            )?;
        }
        Ok(())
    }
}

/// Packed MSB-first bit stream together with its valid bit count.
///
/// The unused low-order bits of the last word are always zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitVector {
    words: Vec<u32>,
    total_bits: usize,
}

impl BitVector {
    pub fn new(words: Vec<u32>, total_bits: usize) -> Self {
        BitVector { words, total_bits }
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn total_bits(&self) -> usize {
        self.total_bits
    }

    pub fn into_parts(self) -> (Vec<u32>, usize) {
        (self.words, self.total_bits)
    }
}
