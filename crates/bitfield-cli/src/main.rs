//! `bitfield`: runs BITFIELD sub-operations against a byte buffer and prints the replies.
//!
//! ```text
//! $ bitfield BITFIELD m SET u8 #0 39 SET u8 #1 39 SET u8 #2 39 GET u24 0
//! 0: 56
//! 1: 56
//! 2: 51
//! 3: 2565927
//! ```

mod seed;

use std::process::ExitCode;

use anyhow::Result;
use bitfield::{Command, Executor, bits};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Run BITFIELD sub-operations against a byte buffer")]
struct Args {
    /// Initial buffer as ASCII text.
    #[arg(long, default_value = "883", conflicts_with = "hex")]
    ascii: String,

    /// Initial buffer as hex, e.g. `383833` or `"0x38 0x38 0x33"`.
    #[arg(long)]
    hex: Option<String>,

    /// Print the final buffer in hex and binary.
    #[arg(long, default_value_t = false)]
    dump: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Sub-operations, optionally prefixed with `BITFIELD <key>`.
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    tokens: Vec<String>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).try_init();
}

/// Returns `false` when the batch was rejected.
fn run(args: &Args) -> Result<bool> {
    let buffer = match &args.hex {
        Some(hex) => seed::parse_hex(hex)?,
        None => args.ascii.as_bytes().to_vec(),
    };
    log::info!("initial buffer: {}", bits::format_hex(&buffer));

    let tokens: Vec<&str> = args.tokens.iter().map(String::as_str).collect();
    let command = match Command::from_tokens(&tokens) {
        Ok(command) => command,
        Err(e) => {
            match e.token() {
                Some(token) => log::debug!("rejected token {:?}", token),
                None => log::debug!("rejected command {:?}", tokens),
            }
            eprintln!("ERR {}", e);
            return Ok(false);
        }
    };

    if let Some(key) = &command.key {
        log::info!("key: {} ({} ops)", key, command.ops.len());
    }

    let mut executor = Executor::new(buffer);
    for (i, reply) in executor.run(&command.ops).iter().enumerate() {
        println!("{}: {}", i, reply);
    }

    if args.dump {
        println!("{}", bits::format_hex(executor.buffer()));
        println!("{}", bits::format_binary(executor.buffer()));
    }

    Ok(true)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("ERR {:#}", e);
            ExitCode::FAILURE
        }
    }
}
