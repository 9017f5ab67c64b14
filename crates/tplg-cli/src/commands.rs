use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tplg_sdk::{CompileSummary, Topology};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command, format, ..
    } = cli;
    match command {
        Command::Compile(args) => cmd_compile(args, format),
        Command::Check(args) => cmd_check(args, format),
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    command: &'static str,
    input: &'a Path,
    #[serde(flatten)]
    summary: &'a CompileSummary,
}

fn load(input: &Path, session: &SessionArgs) -> anyhow::Result<Topology> {
    let mut topology = Topology::with_config(session.resolve()?)?;
    topology
        .load_file(input)
        .with_context(|| format!("reading {}", input.display()))?;
    Ok(topology)
}

fn cmd_compile(args: CompileArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut topology = load(&args.input, &args.session)?;
    let summary = topology
        .compile_to_path(&args.output)
        .with_context(|| format!("compiling {}", args.input.display()))?;
    match format {
        OutputFormat::Json => print_json("compile", &args.input, &summary),
        OutputFormat::Text => {
            println!(
                "{} Compiled {} → {}",
                "✓".green().bold(),
                args.input.display(),
                args.output.display().to_string().bold()
            );
            print_summary(&summary);
            Ok(())
        }
    }
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut topology = load(&args.input, &args.session)?;
    let summary = topology
        .check()
        .with_context(|| format!("checking {}", args.input.display()))?;
    match format {
        OutputFormat::Json => print_json("check", &args.input, &summary),
        OutputFormat::Text => {
            println!("{} {} is valid", "✓".green().bold(), args.input.display());
            print_summary(&summary);
            Ok(())
        }
    }
}

fn print_json(command: &'static str, input: &Path, summary: &CompileSummary) -> anyhow::Result<()> {
    let report = JsonReport {
        command,
        input,
        summary,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_summary(summary: &CompileSummary) {
    println!(
        "  Blocks: {} ({} bytes)",
        summary.blocks.to_string().bold(),
        summary.bytes
    );
    for (category, count) in &summary.categories {
        println!("    {:<14} {}", category.cyan(), count);
    }
    println!("  References resolved: {}", summary.references_resolved);
    for pass in &summary.passes {
        println!(
            "  {} {:<10} {} elements, {} refs",
            "·".dimmed(),
            pass.name,
            pass.elements,
            pass.resolved
        );
    }
}
