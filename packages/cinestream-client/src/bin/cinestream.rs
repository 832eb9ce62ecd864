//! CineStream client binary.

use cinestream_client::{catalog, keys, Config, KeyFileWallet, Session, Status};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cinestream")]
#[command(about = "Watch movies, earn tokens", version)]
struct Cli {
    /// Config file name, without extension
    #[arg(short, long, default_value = "cinestream")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List featured movies
    Movies {
        /// Also list the movies registered on chain
        #[arg(long)]
        on_chain: bool,

        #[arg(long, default_value = "0")]
        from_index: u32,

        #[arg(long, default_value = "50")]
        limit: u32,
    },

    /// Connect the wallet and show the account
    Connect,

    /// Show the reward token balance
    Balance,

    /// Watch a movie and earn its reward
    Watch {
        title: String,
    },

    /// Register a movie (owner only)
    AddMovie {
        title: String,
        description: String,
        url: String,
    },

    /// Unregister a movie (owner only)
    RemoveMovie {
        title: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config, "CINESTREAM")?;

    info!(contract = %config.contract_id, chain_id = %config.chain_id, "Configuration loaded");

    if let Commands::Movies { on_chain: false, .. } = cli.command {
        print_featured();
        return Ok(ExitCode::SUCCESS);
    }

    let wallet = match keys::load_signer(&config.keys_path) {
        Ok(signer) => Some(KeyFileWallet::new(signer, config.confirm)),
        Err(e) => {
            warn!(error = %e, "No wallet available");
            None
        }
    };
    let mut session = Session::new(&config, wallet)?;

    let status = match cli.command {
        Commands::Movies {
            from_index, limit, ..
        } => {
            print_featured();
            let status = session.connect().await.clone();
            if !status.is_failure() {
                match session.movies(from_index, limit).await {
                    Ok(movies) => {
                        println!("\nOn chain ({}):", config.contract_id);
                        for movie in movies {
                            println!("  {:<20} {}  [{}]", movie.title, movie.description, movie.url);
                        }
                    }
                    Err(e) => warn!(error = %e, "Listing movies failed"),
                }
            }
            status
        }
        Commands::Connect | Commands::Balance => {
            let status = session.connect().await.clone();
            if let Some(account) = session.account() {
                println!("Account: {account}");
            }
            if let Some(chain_id) = session.wallet().and_then(|w| w.active_chain_id()) {
                println!("Network: {chain_id}");
            }
            println!("Balance: {} {}", session.balance(), config.token_symbol);
            status
        }
        Commands::Watch { title } => {
            if session.connect().await.is_failure() {
                session.status().clone()
            } else {
                match catalog::find(&title) {
                    Some(movie) => println!("Now playing: {}  {}", movie.title, movie.description),
                    None => warn!(title = %title, "Not on the featured shelf"),
                }
                let status = session.watch_movie(&title).await.clone();
                println!("Balance: {} {}", session.balance(), config.token_symbol);
                status
            }
        }
        Commands::AddMovie {
            title,
            description,
            url,
        } => {
            if session.connect().await.is_failure() {
                session.status().clone()
            } else {
                session.add_movie(&title, &description, &url).await.clone()
            }
        }
        Commands::RemoveMovie { title } => {
            if session.connect().await.is_failure() {
                session.status().clone()
            } else {
                session.remove_movie(&title).await.clone()
            }
        }
    };

    println!("{status}");
    if let Some(link) = session.explorer_link() {
        println!("Transaction: {link}");
    }
    Ok(exit_code(&status))
}

fn print_featured() {
    println!("Featured:");
    for movie in &catalog::FEATURED {
        println!("  {:<20} {}  ({})", movie.title, movie.description, movie.reward);
    }
}

fn exit_code(status: &Status) -> ExitCode {
    if status.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
