use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgAction, ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, thread};

const BUILD_COMMAND: &str = "build";
const ENCODE_COMMAND: &str = "encode";
const DECODE_COMMAND: &str = "decode";
const SHOW_COMMAND: &str = "show";

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_subcommands(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_subcommands(command: Command) -> Command {
        command
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(Self::create_build_command())
            .subcommand(Self::create_encode_command())
            .subcommand(Self::create_decode_command())
            .subcommand(Self::create_show_command())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_build_command() -> Command {
        let command = Command::new(BUILD_COMMAND)
            .about("Build a code table from the characters of a text file");
        let command = Self::register_input_file_argument(command);
        let command = Self::register_table_file_argument(command, "Path to the table output file");
        Self::register_ranked_argument(command)
    }

    fn create_encode_command() -> Command {
        let command =
            Command::new(ENCODE_COMMAND).about("Encode every line of a text file with a table");
        let command = Self::register_table_file_argument(command, "Path to the table file");
        let command = Self::register_input_file_argument(command);
        let command = Self::register_output_file_argument(command);
        Self::register_threads_argument(command)
    }

    fn create_decode_command() -> Command {
        let command = Command::new(DECODE_COMMAND).about("Decode an encoded file back into text");
        let command = Self::register_table_file_argument(command, "Path to the table file");
        let command = Self::register_input_file_argument(command);
        Self::register_output_file_argument(command)
    }

    fn create_show_command() -> Command {
        let command = Command::new(SHOW_COMMAND).about("Print the codes of a table");
        Self::register_table_file_argument(command, "Path to the table file")
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_table_file_argument(command: Command, help: &'static str) -> Command {
        command.arg(Self::create_table_file_argument(help))
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_ranked_argument(command: Command) -> Command {
        command.arg(Self::create_ranked_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to the input file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_table_file_argument(help: &'static str) -> Arg {
        Arg::new("table_file")
            .help(help)
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_output_file_argument() -> Arg {
        Arg::new("output_file")
            .help("Path to the output file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_ranked_argument() -> Arg {
        arg!(ranked: -r --ranked "Treat the input as characters ordered from most to least frequent")
            .action(ArgAction::SetTrue)
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of Threads")
            .default_value(get_number_of_threads().unwrap_or(1).to_string())
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        match matches.subcommand() {
            Some((BUILD_COMMAND, matches)) => Arguments::Build {
                input_file: Self::extract_path_argument(matches, "input_file"),
                table_file: Self::extract_path_argument(matches, "table_file"),
                ranked: Self::extract_ranked_argument(matches),
            },
            Some((ENCODE_COMMAND, matches)) => Arguments::Encode {
                table_file: Self::extract_path_argument(matches, "table_file"),
                input_file: Self::extract_path_argument(matches, "input_file"),
                output_file: Self::extract_path_argument(matches, "output_file"),
                number_of_threads: Self::extract_threads_argument(matches),
            },
            Some((DECODE_COMMAND, matches)) => Arguments::Decode {
                table_file: Self::extract_path_argument(matches, "table_file"),
                input_file: Self::extract_path_argument(matches, "input_file"),
                output_file: Self::extract_path_argument(matches, "output_file"),
            },
            Some((SHOW_COMMAND, matches)) => Arguments::Show {
                table_file: Self::extract_path_argument(matches, "table_file"),
            },
            _ => unreachable!("subcommand is required"),
        }
    }

    fn extract_path_argument(matches: &ArgMatches, id: &str) -> PathBuf {
        matches
            .get_one::<PathBuf>(id)
            .unwrap_or_else(|| panic!("Required argument {} not provided", id))
            .clone()
    }

    fn extract_ranked_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("ranked")
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn get_number_of_threads() -> io::Result<usize> {
    Ok(thread::available_parallelism()?.get())
}
