//! Null special remote
//!
//! A special remote with no storage. Every key is absent, stores and
//! retrievals fail, removals succeed. Useful for checking that a host speaks
//! the protocol.
//!
//! ```bash
//! git annex initremote null type=external externaltype=null encryption=none
//! ```

use clap::Parser;
use annex_remote::{Annex, AnnexError, Config, Listener, Result, SpecialRemote};
use annex_remote::protocol::{Availability, InfoField};

/// Null special remote for git-annex
#[derive(Parser, Debug)]
#[command(name = "git-annex-remote-null")]
#[command(about = "git-annex external special remote that stores nothing")]
#[command(version)]
struct Args {
    /// Write logs to this file instead of stderr
    #[arg(short = 'l', long)]
    log_file: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(short = 'f', long, default_value = "warn")]
    log_filter: String,
}

/// Remote that holds no content
#[derive(Debug, Default)]
struct NullRemote {
    /// Keys the host asked about during this session
    checked: usize,
}

impl SpecialRemote for NullRemote {
    fn init_remote(&mut self, _annex: &mut Annex) -> Result<()> {
        Ok(())
    }

    fn prepare(&mut self, annex: &mut Annex) -> Result<()> {
        annex.debug("null remote ready")
    }

    fn transfer_store(&mut self, _annex: &mut Annex, _key: &str, _file: &str) -> Result<()> {
        Err(AnnexError::remote("null remote cannot store content"))
    }

    fn transfer_retrieve(&mut self, _annex: &mut Annex, key: &str, _file: &str) -> Result<()> {
        Err(AnnexError::remote(format!("{} is not stored in the null remote", key)))
    }

    fn check_present(&mut self, _annex: &mut Annex, _key: &str) -> Result<bool> {
        self.checked += 1;
        Ok(false)
    }

    fn remove(&mut self, _annex: &mut Annex, _key: &str) -> Result<()> {
        Ok(())
    }

    fn availability(&mut self, _annex: &mut Annex) -> Result<Availability> {
        Ok(Availability::Local)
    }

    fn info(&mut self, _annex: &mut Annex) -> Result<Vec<InfoField>> {
        Ok(vec![
            InfoField::new("storage", "none"),
            InfoField::new("keys checked", self.checked.to_string()),
        ])
    }
}

fn main() {
    let args = Args::parse();

    let mut builder = Config::builder().log_filter(args.log_filter);
    if let Some(path) = args.log_file {
        builder = builder.log_file(path);
    }

    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("git-annex-remote-null: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = annex_remote::logging::init_tracing(&config) {
        eprintln!("git-annex-remote-null: failed to set up logging: {}", e);
        std::process::exit(1);
    }

    tracing::info!("git-annex-remote-null v{}", annex_remote::VERSION);

    let mut listener = Listener::stdio(NullRemote::default(), config);
    if let Err(e) = listener.listen() {
        tracing::error!("Session ended: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Session closed");
}
