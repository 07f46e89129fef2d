#![forbid(unsafe_code)]
use clap::{Parser, Subcommand};
use colored::*;
use cortexchain::cli::init_logging;
use cortexchain::config::load_config;
use cortexchain::crypto::{derive_address, public_key_from_encoding};
use cortexchain::wallet::Wallet;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Create identities and derive addresses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates a new keypair and prints its address
    New {
        /// Label stored with the wallet
        #[arg(long)]
        name: Option<String>,
        /// Write the wallet as JSON to this path
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Derives the address of a hex-encoded public key (64-byte X || Y)
    Address {
        public_key: String,
        /// Hash the bytes even if they are not a valid curve point
        #[arg(long)]
        raw: bool,
    },
    /// Loads a wallet file, checks it, and prints its identity
    Show { path: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config()?;
    init_logging(&config.logging)?;

    match cli.command {
        Commands::New { name, out } => {
            let wallet = Wallet::new(name)?;
            print_wallet(&wallet);
            if let Some(path) = out {
                wallet.save(&path)?;
                println!("{} {}", "Saved to".bright_green(), path.display());
            }
        }
        Commands::Address { public_key, raw } => {
            let bytes = hex::decode(public_key.trim())?;
            if !raw {
                public_key_from_encoding(&bytes)?;
            }
            println!("{}", derive_address(&bytes));
        }
        Commands::Show { path } => {
            let wallet = Wallet::load(&path)?;
            print_wallet(&wallet);
        }
    }

    Ok(())
}

fn print_wallet(wallet: &Wallet) {
    println!("{}", "🔑 Wallet".bright_cyan().bold());
    if let Some(name) = &wallet.name {
        println!("  Name:       {}", name.bright_white());
    }
    println!("  Address:    {}", wallet.address.bright_yellow());
    println!("  Public key: {}", wallet.public_key);
    println!("  Created:    {}", wallet.created);
}
