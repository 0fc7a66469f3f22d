use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use monthlycli::{cli, config, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize a Spotify account
    Auth(AuthOptions),

    /// Build this month's playlists
    Run(RunOptions),

    /// Compose a playlist cover from image URLs
    Cover(CoverOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Local name of the account to authorize
    #[clap(long)]
    pub user: Option<String>,

    /// Authorize the controller account that owns the playlists
    #[clap(long)]
    pub controller: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RunOptions {
    /// Only build playlists for this listener
    #[clap(long)]
    pub user: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CoverOptions {
    /// Large label, e.g. a month name
    #[clap(long)]
    pub label: String,

    /// Small label below the large one
    #[clap(long, default_value = "Top Tracks")]
    pub title: String,

    /// File the cover is written to
    #[clap(long, default_value = "cover.jpg")]
    pub out: PathBuf,

    /// Write the base64 text sent to Spotify instead of the JPEG
    #[clap(long)]
    pub base64: bool,

    /// Image URLs in slot order; pass "" to leave a slot empty
    pub sources: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth(opt) => cli::auth(opt.user, opt.controller).await,
        Command::Run(opt) => cli::run(opt.user).await,
        Command::Cover(opt) => {
            cli::cover(opt.sources, opt.label, opt.title, opt.out, opt.base64).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
