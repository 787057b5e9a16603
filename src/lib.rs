use std::{
    fs::{File, OpenOptions},
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
    sync::{mpsc, Arc},
};

pub use cli::CLIParser;
pub use error::Error;
pub use shannon_fano::{
    build_table, build_table_from_ranked_list, build_table_from_sequence, BitVector, Code,
    DecodeFailure, DecoderConfig, Symbol, Table,
};
use threadpool::ThreadPool;

pub mod binary_stream;
mod cli;
mod error;
mod logger;
pub mod shannon_fano;

pub type Result<T> = std::result::Result<T, error::Error>;

pub enum Arguments {
    Build {
        input_file: PathBuf,
        table_file: PathBuf,
        ranked: bool,
    },
    Encode {
        table_file: PathBuf,
        input_file: PathBuf,
        output_file: PathBuf,
        number_of_threads: usize,
    },
    Decode {
        table_file: PathBuf,
        input_file: PathBuf,
        output_file: PathBuf,
    },
    Show {
        table_file: PathBuf,
    },
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
    })
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| {
            Error::UnableToOpenOutputFileForWriting(file_path.display().to_string(), e)
        })
}

fn read_text(file_path: &Path) -> Result<String> {
    let input_file = open_input_file(file_path)?;
    Ok(io::read_to_string(BufReader::new(input_file))?)
}

fn read_table(file_path: &Path) -> Result<Table<char>> {
    let table_file = open_input_file(file_path)?;
    Table::read_from(&mut BufReader::new(table_file))
}

pub fn run(arguments: &Arguments) -> Result<()> {
    match arguments {
        Arguments::Build {
            input_file,
            table_file,
            ranked,
        } => build_table_file(input_file, table_file, *ranked),
        Arguments::Encode {
            table_file,
            input_file,
            output_file,
            number_of_threads,
        } => encode_text_file(table_file, input_file, output_file, *number_of_threads),
        Arguments::Decode {
            table_file,
            input_file,
            output_file,
        } => decode_text_file(table_file, input_file, output_file),
        Arguments::Show { table_file } => {
            print!("{}", read_table(table_file)?);
            Ok(())
        }
    }
}

/// Build a character table from a text file and store it.
///
/// In ranked mode the file lists the characters from most to least
/// frequent, whitespace is ignored.
pub fn build_table_file(input_file: &Path, table_file: &Path, ranked: bool) -> Result<()> {
    let text = read_text(input_file)?;
    let table: Table<char> = if ranked {
        Table::from_ranked_list(text.chars().filter(|c| !c.is_whitespace()))?
    } else {
        Table::from_sequence(text.chars())?
    };
    log::info!(
        "Built table with {} symbols from {}",
        table.len(),
        input_file.display()
    );
    let output_file = open_output_file(table_file)?;
    let mut writer = BufWriter::new(output_file);
    table.write_to(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Encode every line on its own, the lines are spread over a thread pool
/// that shares the table.
pub fn encode_lines(
    table: Arc<Table<char>>,
    lines: Vec<String>,
    number_of_threads: usize,
) -> Result<Vec<BitVector>> {
    let line_count = lines.len();
    let pool = ThreadPool::new(number_of_threads.max(1));
    let (sender, receiver) = mpsc::channel();
    for (index, line) in lines.into_iter().enumerate() {
        let table = Arc::clone(&table);
        let sender = sender.clone();
        pool.execute(move || {
            let encoded = table.encode(line.chars());
            let _ = sender.send((index, encoded));
        });
    }
    drop(sender);
    let mut results: Vec<(usize, Result<BitVector>)> = receiver.iter().collect();
    if results.len() != line_count {
        return Err(Error::EncoderWorkerFailed);
    }
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, encoded)| encoded).collect()
}

/// Encode a text file line by line, one bit-vector record per line.
///
/// Line terminators (`\n` or `\r\n`) are not encoded, so the table only
/// needs the characters of the lines themselves.
pub fn encode_text_file(
    table_file: &Path,
    input_file: &Path,
    output_file: &Path,
    number_of_threads: usize,
) -> Result<()> {
    let table = Arc::new(read_table(table_file)?);
    let lines: Vec<String> = read_text(input_file)?.lines().map(String::from).collect();
    log::info!(
        "Encoding {} lines on {} threads",
        lines.len(),
        number_of_threads
    );
    let encoded = encode_lines(table, lines, number_of_threads)?;
    let output_file = open_output_file(output_file)?;
    let mut writer = BufWriter::new(output_file);
    for vector in encoded.iter() {
        vector.write_to(&mut writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Decode the records written by [`encode_text_file`], writing every
/// decoded line followed by `\n`.
///
/// The output therefore always uses LF line endings and ends with a
/// newline, whatever the terminators of the encoded text were.
pub fn decode_text_file(table_file: &Path, input_file: &Path, output_file: &Path) -> Result<()> {
    let table = read_table(table_file)?;
    let mut bytes = Vec::new();
    BufReader::new(open_input_file(input_file)?).read_to_end(&mut bytes)?;
    let output_file = open_output_file(output_file)?;
    let mut writer = BufWriter::new(output_file);
    let mut reader = bytes.as_slice();
    let mut line_count = 0;
    while !reader.is_empty() {
        let vector = BitVector::read_from(&mut reader)?;
        let line: String = vector.decode(&table)?.into_iter().collect();
        writeln!(writer, "{}", line)?;
        line_count += 1;
    }
    writer.flush()?;
    log::info!("Decoded {} lines", line_count);
    Ok(())
}
