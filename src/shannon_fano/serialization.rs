use std::collections::BTreeMap;
use std::io::{Read, Write};

use super::code::{BitVector, Code, Symbol, Table, MAX_CODE_LENGTH};
use crate::error::Error;
use crate::Result;

const TABLE_MAGIC: &[u8; 4] = b"SFT1";
const BIT_VECTOR_MAGIC: &[u8; 4] = b"SFB1";

fn read_magic<R: Read>(reader: &mut R) -> Result<[u8; 4]> {
    let mut magic = [0; 4];
    reader.read_exact(&mut magic)?;
    Ok(magic)
}

fn read_u32_le<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64_le<R: Read>(reader: &mut R) -> Result<u64> {
    let mut buf = [0; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8> {
    let mut buf = [0; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn validate_code<S>(code: &Code<S>) -> Result<()> {
    if code.length == 0 || code.length > MAX_CODE_LENGTH {
        return Err(Error::InvalidTable("code length out of range"));
    }
    if code.length < MAX_CODE_LENGTH && code.bits >> code.length != 0 {
        return Err(Error::InvalidTable("code bits exceed code length"));
    }
    Ok(())
}

impl<S: Symbol> Table<S> {
    /// Write the symbol to code mapping, probabilities are not stored.
    ///
    /// Layout (little endian): magic `SFT1`, `u32` entry count, then per
    /// entry in symbol order the symbol, `u32` bits and `u8` length.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(TABLE_MAGIC)?;
        writer.write_all(&(self.len() as u32).to_le_bytes())?;
        for code in self.iter() {
            code.symbol.write_symbol(writer)?;
            writer.write_all(&code.bits.to_le_bytes())?;
            writer.write_all(&[code.length as u8])?;
        }
        Ok(())
    }

    /// Read a table written by [`Table::write_to`].
    ///
    /// Rejects duplicate symbols, malformed codes and code sets that are
    /// not prefix free.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        if &read_magic(reader)? != TABLE_MAGIC {
            return Err(Error::InvalidTable("missing table header"));
        }
        let entry_count = read_u32_le(reader)?;
        let mut codes = BTreeMap::new();
        for _ in 0..entry_count {
            let symbol = S::read_symbol(reader)?;
            let bits = read_u32_le(reader)?;
            let length = read_u8(reader)? as usize;
            let code = Code {
                symbol: symbol.clone(),
                probability: 0.0,
                bits,
                length,
            };
            validate_code(&code)?;
            if codes.insert(symbol, code).is_some() {
                return Err(Error::InvalidTable("duplicate symbol"));
            }
        }
        let table = Table::from_map(codes);
        if !table.is_prefix_free() {
            return Err(Error::InvalidTable("codes are not prefix free"));
        }
        log::debug!("read table with {} entries", table.len());
        Ok(table)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        Self::read_from(&mut reader)
    }
}

impl BitVector {
    /// Layout: magic `SFB1`, `u64` total bits and `u64` word count (little
    /// endian), then the words big endian so the stream stays MSB first.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(BIT_VECTOR_MAGIC)?;
        writer.write_all(&(self.total_bits() as u64).to_le_bytes())?;
        writer.write_all(&(self.words().len() as u64).to_le_bytes())?;
        for word in self.words() {
            writer.write_all(&word.to_be_bytes())?;
        }
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        if &read_magic(reader)? != BIT_VECTOR_MAGIC {
            return Err(Error::InvalidBitVectorData("missing bit vector header"));
        }
        let total_bits = read_u64_le(reader)? as usize;
        let word_count = read_u64_le(reader)?;
        let mut words = Vec::new();
        for _ in 0..word_count {
            let mut buf = [0; 4];
            reader.read_exact(&mut buf)?;
            words.push(u32::from_be_bytes(buf));
        }
        Ok(BitVector::new(words, total_bits))
    }
}
