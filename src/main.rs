use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use scloud::{cli, config, config::Config, error, types::Sharing};

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
    /// Print the SoundCloud sign-in URL
    SignIn,

    /// Authorize with SoundCloud and print an access token
    Auth(AuthOptions),

    /// Upload an audio file as a new track
    Upload(UploadOptions),

    /// List your tracks
    Tracks,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Exchange an authorization code obtained out of band instead of
    /// waiting for the browser redirect
    #[clap(long)]
    pub code: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct UploadOptions {
    /// Audio file to upload
    pub path: PathBuf,

    /// Track title (defaults to SOUNDCLOUD_TRACK_TITLE, then the file name)
    #[clap(long)]
    pub title: Option<String>,

    /// Track visibility: public or private
    #[clap(long)]
    pub sharing: Option<Sharing>,

    /// Artwork image (defaults to SOUNDCLOUD_ARTWORK_PATH)
    #[clap(long, conflicts_with = "no_artwork")]
    pub artwork: Option<PathBuf>,

    /// Upload without artwork even if a default is configured
    #[clap(long)]
    pub no_artwork: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };

    match cli.command {
        Command::SignIn => cli::sign_in(&config),
        Command::Auth(opt) => cli::auth(config, opt.code).await,
        Command::Upload(opt) => {
            cli::upload(
                &config,
                opt.path,
                opt.title,
                opt.sharing,
                opt.artwork,
                opt.no_artwork,
            )
            .await
        }
        Command::Tracks => cli::list_tracks(&config).await,
        Command::Completions(_) => {}
    }
}
