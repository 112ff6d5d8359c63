//! coping - print coping patterns for pipe-to-pipe joints
//!
//! Usage:
//!   coping pattern -R <dia> -r <dia> --phi <deg>   Generate a pattern
//!   coping query '<query-string>'                 Serve a web-form query
//!   coping preview -R <dia> -r <dia> --phi <deg>   Export a 3D preview (OBJ)
//!   coping policies                               List refinement policies

mod cli;

use std::env;

use tracing_subscriber::EnvFilter;

use coping_pattern::{NonOverlap, Refinement};

use cli::{cmd_pattern, cmd_preview, cmd_query};

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "coping=info,coping_pattern=warn";

fn main() {
    // Logs go to stderr; stdout carries pattern bytes
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("coping");

    if args.len() < 2 {
        print_usage(prog);
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "pattern" => cmd_pattern(&args[2..]),
        "query" => cmd_query(&args[2..]),
        "preview" => cmd_preview(&args[2..]),
        "policies" => {
            cmd_policies();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage(prog);
            Ok(())
        }
        other => Err(format!("Unknown command: {}. Run '{} help' for usage.", other, prog)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_usage(prog: &str) {
    eprintln!("coping - coping patterns for pipe-to-pipe joints");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} pattern -R <dia> -r <dia> --phi <deg> [options]", prog);
    eprintln!("  {} query '<f=png&R=..&r=..&phi=..&t=..>' [-o file]", prog);
    eprintln!("  {} preview -R <dia> -r <dia> --phi <deg> [--segments n] [-o file.obj]", prog);
    eprintln!("  {} policies", prog);
    eprintln!();
    eprintln!("Pattern options:");
    eprintln!("  -t, --thickness <n>    Wall thickness of the cut tube (default: 0)");
    eprintln!("  -f, --format <fmt>     text, png or pdf (default: png)");
    eprintln!("  -o, --output <file>    Output file (- for stdout, default: stdout)");
    eprintln!("  --step <n>             Sampling step (default: 0.025)");
    eprintln!("  --policy <name>        Refinement policy (default: edge-offset)");
    eprintln!("  --non-overlap <name>   flush, full-width (default: flush)");
    eprintln!("  --config <file.yaml>   Generator/render settings");
    eprintln!("  --json                 Dump sample points as JSON");
    eprintln!();
    eprintln!("-R and -r are diameters. Set RUST_LOG=debug for more detail.");
}

fn cmd_policies() {
    println!("Refinement policies:");
    for refinement in Refinement::all() {
        println!("  {:<12} {}", refinement.name(), refinement.description());
    }
    println!();
    println!("Non-overlap policies:");
    for policy in [NonOverlap::Flush, NonOverlap::FullWidth] {
        println!("  {}", policy.name());
    }
}
