//! svdiff compares the lexical contents of two SystemVerilog source texts.
//! Inputs only need to be lexically valid, not necessarily syntactically
//! valid. Use '-' to read from stdin. Differences are reported to stdout;
//! the program exits 0 if no differences are found, else non-zero.
//!
//! Example usage:
//!   svdiff [options] file1 file2

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use svtext::analysis::equivalence::{format_equivalent, obfuscation_equivalent};
use svtext::diff::unified::{line_diffs_to_unified_diff, LineDiffs};

// Inputs differ, or a file could not be read / flags were invalid.
const INPUT_DIFFERENCE_ERROR_CODE: u8 = 1;
const USER_ERROR_CODE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DiffMode {
    /// Ignore whitespace, compare token texts. Useful for verifying
    /// formatter output.
    Format,
    /// Preserve whitespace, compare token text lengths for identifiers and
    /// comments. Useful for verifying obfuscator output.
    Obfuscate,
}

#[derive(Debug, Parser)]
#[command(name = "svdiff", about = "Lexical diff of two SystemVerilog files")]
struct Args {
    /// Difference function to apply.
    #[arg(long, value_enum, default_value_t = DiffMode::Format)]
    mode: DiffMode,

    /// Print a unified diff of the two texts when they differ.
    #[arg(long)]
    unified: bool,

    /// Lines of context in the unified diff.
    #[arg(long, default_value_t = 1)]
    context: usize,

    /// Emit the line-diff edit script as JSON.
    #[arg(long)]
    json: bool,

    /// First input file, or '-' for stdin.
    file1: PathBuf,

    /// Second input file, or '-' for stdin.
    file2: PathBuf,
}

fn read_input(path: &PathBuf) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        std::fs::read_to_string(path)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let content1 = match read_input(&args.file1) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}: {}", args.file1.display(), error);
            return ExitCode::from(USER_ERROR_CODE);
        }
    };
    let content2 = match read_input(&args.file2) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}: {}", args.file2.display(), error);
            return ExitCode::from(USER_ERROR_CODE);
        }
    };

    let mut report = String::new();
    let equivalent = match args.mode {
        DiffMode::Format => format_equivalent(&content1, &content2, &mut report),
        DiffMode::Obfuscate => obfuscation_equivalent(&content1, &content2, &mut report),
    };

    if equivalent {
        return ExitCode::SUCCESS;
    }

    print!("{}", report);
    if args.unified || args.json {
        let diffs = LineDiffs::new(&content1, &content2);
        if args.json {
            match serde_json::to_string_pretty(&diffs.edits) {
                Ok(rendered) => println!("{}", rendered),
                Err(error) => {
                    eprintln!("failed to serialize edits: {}", error);
                    return ExitCode::from(USER_ERROR_CODE);
                }
            }
        }
        if args.unified {
            let mut out = String::new();
            let name1 = args.file1.display().to_string();
            let name2 = args.file2.display().to_string();
            let _ = line_diffs_to_unified_diff(
                &mut out,
                &diffs,
                args.context,
                Some(&name1),
                Some(&name2),
            );
            print!("{}", out);
        }
    }
    ExitCode::from(INPUT_DIFFERENCE_ERROR_CODE)
}
