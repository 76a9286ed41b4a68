//! Command line front end: reads a netlist and prints its truth table.
//!
//! Netlist problems (malformed lines, signals driven twice, cycles) are reported
//! on stderr and the process still exits with status 0. Only I/O failures make it
//! exit with a non-zero status.

use std::{
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use combtab::{
    Netlist, NetlistError, Result,
    dot::GraphvizStyle,
    table::{DEFAULT_CHUNK_SIZE, TruthTable},
};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "combtab",
    version,
    about = "Print the truth table of a combinational gate-level netlist"
)]
struct Cli {
    /// Netlist path, one gate per line (`NOT out in`, `XOR out a b`, `AND|OR|NAND|NOR out a b ...`).
    ///
    /// Reads standard input if absent or `-`.
    input: Option<PathBuf>,

    /// Print the circuit in Graphviz dot format instead of its truth table.
    #[clap(long)]
    dot: bool,

    /// Evaluate rows on all cores. The output is the same.
    #[clap(long)]
    parallel: bool,

    /// Rows evaluated together when running in parallel.
    #[clap(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Log more on stderr (-v info, -vv debug, -vvv trace).
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("could not install the logger: {}", e);
    }
}

fn read_netlist(input: Option<&Path>) -> Result<Netlist> {
    match input {
        Some(path) if path != Path::new("-") => {
            info!("reading netlist from {}", path.display());
            Netlist::from_file(path)
        }
        _ => {
            info!("reading netlist from standard input");
            Netlist::from_reader(io::stdin().lock())
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let netlist = read_netlist(cli.input.as_deref())?;
    info!(
        "{} signals, {} primary inputs",
        netlist.signal_count(),
        netlist.input_count()
    );

    let mut out = BufWriter::new(io::stdout().lock());
    if cli.dot {
        out.write_all(netlist.to_dot(&GraphvizStyle::default()).as_bytes())?;
        out.flush()?;
        return Ok(());
    }

    let table = TruthTable::new(&netlist)?;
    if cli.parallel {
        table.write_parallel(&mut out, cli.chunk_size)
    } else {
        table.write_to(&mut out)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ NetlistError::IoError(_)) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::SUCCESS
        }
    }
}
