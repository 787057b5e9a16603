use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    InvalidInput(String, f64),
    CodeTooLong(String, usize),
    EmptyTable,
    UnknownSymbol(String),
    InvalidVector(usize, usize),
    NoMatchingCode(usize),
    TrailingBits(usize),
    InvalidTable(&'static str),
    InvalidBitVectorData(&'static str),
    EncoderWorkerFailed,
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    Io(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(symbol, probability) => {
                write!(
                    f,
                    "Invalid probability {} for symbol {}, probabilities must be finite and not negative",
                    probability, symbol
                )
            }
            Self::CodeTooLong(symbol, length) => {
                write!(
                    f,
                    "Code for symbol {} needs {} bits, but at most 32 are supported",
                    symbol, length
                )
            }
            Self::EmptyTable => write!(f, "Empty shannon-fano table"),
            Self::UnknownSymbol(symbol) => {
                write!(f, "Symbol {} not found in shannon-fano table", symbol)
            }
            Self::InvalidVector(words, total_bits) => {
                write!(
                    f,
                    "Invalid bit vector: {} words can not hold {} bits",
                    words, total_bits
                )
            }
            Self::NoMatchingCode(position) => {
                write!(
                    f,
                    "Invalid bit vector or missing shannon-fano code at bit {}",
                    position
                )
            }
            Self::TrailingBits(count) => {
                write!(f, "{} encoded bits remaining without a matching code", count)
            }
            Self::InvalidTable(reason) => write!(f, "Invalid table data: {}", reason),
            Self::InvalidBitVectorData(reason) => write!(f, "Invalid bit vector data: {}", reason),
            Self::EncoderWorkerFailed => write!(f, "Encoder worker terminated without a result"),
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::Io(error) => write!(f, "I/O error: {}", error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToOpenInputFileForReading(_, error)
            | Self::UnableToOpenOutputFileForWriting(_, error)
            | Self::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
