use clap::{CommandFactory, Parser};
use colored::Colorize;
use kfs_memleaks::config::{DEFAULT_MEMORY_MARKER, DEFAULT_TRACE_MARKER};
use kfs_memleaks::{Outcome, ScanConfig};
use memleaks_watch::{Input, InputReport, open_inputs, scan_input, write_report};
use std::io::{self, Write};
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Example:

    $ kennyfs -d mountpoint/ &> debug_output
    $ detect-memleaks debug_output

Exit status is 0 when no leaks are found, 1 when leaks are found and 2 when
the trace could not be scanned.";

#[derive(Parser, Debug)]
#[command(name = "detect-memleaks")]
#[command(about = "Scan KennyFS trace output for memory that was never freed", long_about = None)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Trace files to scan ('-' or no file reads standard input)
    files: Vec<PathBuf>,

    /// Print allocation statistics before the leak report
    #[arg(short, long)]
    stats: bool,

    /// Echo every input line with its line number
    #[arg(short, long, conflicts_with = "json")]
    debug: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    json: bool,

    /// Stop on a return without matching enter instead of dropping attribution
    #[arg(long)]
    strict: bool,

    /// Prefix of function enter/return lines
    #[arg(long, env = "KFS_TRACE_MARKER", default_value = DEFAULT_TRACE_MARKER)]
    trace_marker: String,

    /// Prefix of memory subsystem debug lines
    #[arg(long, env = "KFS_MEMORY_MARKER", default_value = DEFAULT_MEMORY_MARKER)]
    memory_marker: String,
}

fn main() {
    pretty_env_logger::init();
    let args = Cli::parse();

    let config = ScanConfig::default()
        .with_trace_marker(args.trace_marker.clone())
        .with_memory_marker(args.memory_marker.clone())
        .strict(args.strict);

    let inputs = match open_inputs(&args.files) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            eprintln!();
            eprintln!("{}", Cli::command().render_usage());
            std::process::exit(Outcome::ScanFailed.exit_code().into());
        }
    };

    let multiple = inputs.len() > 1;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut overall = Outcome::Clean;

    for input in inputs {
        let name = input.name.clone();
        let outcome = match run_input(input, &config, &args, multiple, &mut out) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("{} {}: {}", "Error:".red(), name, e);
                Outcome::ScanFailed
            }
        };
        overall = overall.max(outcome);
    }

    if overall != Outcome::Clean {
        std::process::exit(overall.exit_code().into());
    }
}

fn run_input<W: Write>(
    input: Input,
    config: &ScanConfig,
    args: &Cli,
    multiple: bool,
    out: &mut W,
) -> io::Result<Outcome> {
    log::debug!("scanning {}", input.name);

    if multiple && !args.json {
        writeln!(out, "{}", format!("==> {} <==", input.name).bold())?;
    }

    let result = if args.debug {
        scan_input(input.reader, config, Some(&mut *out as &mut dyn Write))
    } else {
        scan_input(input.reader, config, None)
    };

    if args.json {
        let report = InputReport::new(&input.name, &result);
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(report.outcome);
    }

    let outcome = match &result {
        Ok(report) => {
            write_report(out, report, args.stats)?;
            report.outcome()
        }
        Err(e) => {
            eprintln!("{} {}: {}", "Scan error:".red().bold(), input.name, e);
            eprintln!("The trace is not trustworthy; no leak report was produced.");
            Outcome::ScanFailed
        }
    };

    if multiple {
        writeln!(out)?;
    }
    Ok(outcome)
}
