//! Rollkey transmitter binary.
//!
//! # Usage
//!
//! ```bash
//! # Check an enrollment secret against the printed checksum
//! rollkey enroll "mzxw6 ..."
//!
//! # Commit it: derive and persist a fresh identity
//! rollkey enroll "mzxw6 ..." --commit
//!
//! # Broadcast one activation
//! rollkey send
//!
//! # Show the provisioned identity and next counter value
//! rollkey status
//! ```

use clap::{Parser, Subcommand};
use rollkey_cli::{ConsoleBroadcaster, RedbStore};
use rollkey_core::{DecodedSecret, Remote, RemoteError, format_identifier};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Rollkey rolling-code transmitter
#[derive(Parser, Debug)]
#[command(name = "rollkey")]
#[command(about = "Rolling-code broadcast transmitter")]
#[command(version)]
struct Args {
    /// Path to the settings database
    #[arg(long, default_value = "rollkey.redb")]
    db: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode an enrollment secret and show its checksum; optionally commit
    Enroll {
        /// Base32 secret as printed on the receiver module
        secret: String,

        /// Derive and persist a fresh identity (replaces any previous one)
        #[arg(long)]
        commit: bool,
    },

    /// Broadcast one activation
    Send,

    /// Show the provisioned identity and next counter value
    Status,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("opening settings database {}", args.db);

    let store = RedbStore::open(&args.db)?;
    let remote = Remote::new(store, ConsoleBroadcaster);

    match args.command {
        Command::Enroll { secret, commit } => enroll(&remote, &secret, commit)?,
        Command::Send => {
            let activation = remote.activate()?;
            println!("sent counter {}", activation.counter);
        },
        Command::Status => status(&remote)?,
    }

    Ok(())
}

fn enroll(
    remote: &Remote<RedbStore, ConsoleBroadcaster>,
    raw: &str,
    commit: bool,
) -> Result<(), RemoteError> {
    let secret = DecodedSecret::decode(raw);

    // The same feedback a setup dialog would show live: compare against
    // the length and checksum printed on the receiver module.
    println!("{} bytes, checksum: {:08x}", secret.len(), secret.checksum());

    if !commit {
        println!("dry run; pass --commit to enroll");
        return Ok(());
    }

    let identity = remote.enroll(&secret)?;
    println!("enrolled identity {}", format_identifier(identity.identifier));
    Ok(())
}

fn status(remote: &Remote<RedbStore, ConsoleBroadcaster>) -> Result<(), RemoteError> {
    match remote.identity() {
        Ok(identity) => {
            println!("identifier:   {}", format_identifier(identity.identifier));
            println!("next counter: {}", remote.next_counter()?);
            Ok(())
        },
        Err(RemoteError::NotProvisioned) => {
            println!("not provisioned; run `rollkey enroll <SECRET> --commit`");
            Ok(())
        },
        Err(e) => Err(e),
    }
}
