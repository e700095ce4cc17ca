use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use toptracks::{cli, cli::PlaylistSpec, config, config::Credentials, error, warning};

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
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a playlist from the top tracks of the configured artists (default)
    Create(CreateOptions),

    /// Authorize with Spotify API and cache the token
    Auth(AuthOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct CreateOptions {
    /// Artist to include; can be repeated and replaces the built-in list
    #[clap(long = "artist", action = ArgAction::Append, num_args = 1)]
    artists: Vec<String>,

    /// Number of top tracks taken per artist
    #[clap(long)]
    tracks_per_artist: Option<usize>,

    /// Playlist name
    #[clap(long)]
    name: Option<String>,

    /// Playlist description
    #[clap(long)]
    description: Option<String>,

    /// Create a private playlist
    #[clap(long)]
    private: bool,

    /// Market (country code) for the top tracks lookup
    #[clap(long)]
    market: Option<String>,

    /// Only show which tracks would be added
    #[clap(long)]
    dry_run: bool,
}

impl CreateOptions {
    fn into_spec(self) -> PlaylistSpec {
        let defaults = PlaylistSpec::default();
        PlaylistSpec {
            name: self.name.unwrap_or(defaults.name),
            description: self.description.unwrap_or(defaults.description),
            public: !self.private,
            artists: if self.artists.is_empty() {
                defaults.artists
            } else {
                self.artists
            },
            tracks_per_artist: self.tracks_per_artist.unwrap_or(defaults.tracks_per_artist),
            market: self.market.unwrap_or(defaults.market),
            dry_run: self.dry_run,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Ignore the cached token and log in again
    #[clap(long)]
    force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Create(CreateOptions::default())) {
        Command::Create(opt) => cli::playlist(Credentials::from_env(), opt.into_spec()).await,
        Command::Auth(opt) => cli::auth(Credentials::from_env(), opt.force).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{}", e);
    }
}
