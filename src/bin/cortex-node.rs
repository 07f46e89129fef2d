#![forbid(unsafe_code)]
use clap::{Parser, Subcommand};
use colored::*;
use cortexchain::cli::{init_logging, render_block_line, render_chain};
use cortexchain::config::load_config;
use cortexchain::NodeContext;

#[derive(Parser)]
#[command(author, version, about = "Run an in-memory CortexChain node", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Appends payloads to a fresh ledger and prints the resulting chain
    Chain {
        /// Payload to append; repeat for several blocks
        #[arg(short, long = "data")]
        data: Vec<String>,
        /// Print the chain as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Print one line per block
        #[arg(long, conflicts_with = "json")]
        compact: bool,
    },
    /// Shows this node's configuration and identity
    Info,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config()?;
    init_logging(&config.logging)?;

    let ctx = NodeContext::new(config)?;

    match cli.command {
        Commands::Chain {
            data,
            json,
            compact,
        } => {
            for payload in data {
                ctx.submit(payload);
            }
            let snapshot = ctx.snapshot();
            snapshot.verify()?;

            if json {
                println!("{}", snapshot.to_json()?);
            } else if compact {
                for block in snapshot.iter() {
                    println!("{}", render_block_line(block));
                }
            } else {
                println!("{}", render_chain(&snapshot));
                println!(
                    "{} {} block(s), chain verified",
                    "✔".bright_green(),
                    snapshot.len()
                );
            }
        }
        Commands::Info => {
            println!("{}", "CortexChain node".bright_cyan().bold());
            println!("  Name:       {}", ctx.config.node.name.bright_white());
            println!("  Network:    {}", ctx.config.node.network_id.bright_white());
            println!("  Address:    {}", ctx.address().bright_yellow());
            println!("  Public key: {}", ctx.identity.public_key);
        }
    }

    Ok(())
}
