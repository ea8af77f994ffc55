use std::sync::Arc;

use clap::{
    ArgGroup, CommandFactory, Parser, Subcommand, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use plmv::{cli, config, error, spotify::insights, types::TimeRange};

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
    /// Authorize with Spotify API
    Auth(AuthOptions),

    /// Forget the stored token and profile
    Logout,

    /// Show the stored session
    Status,

    /// Show the profile of the logged in user
    Whoami,

    /// List your playlists
    Playlists(PlaylistsOptions),

    /// List the tracks of a playlist or of your Liked Songs
    Tracks(TracksOptions),

    #[clap(about = "Move tracks from a playlist or your Liked Songs to another playlist")]
    Move(MoveOptions),

    /// Create a new playlist
    Create(CreateOptions),

    /// Show your top tracks or artists
    Top(TopOptions),

    /// Show recently played tracks
    Recent(RecentOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Use the implicit grant instead of the authorization code flow
    #[clap(long)]
    pub implicit: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Only show playlists whose name contains this text
    #[clap(long)]
    pub search: Option<String>,

    /// Only show playlists you own
    #[clap(long)]
    pub owned: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TracksOptions {
    /// Playlist id, URI, link or name, or "liked"
    pub playlist: String,
}

#[derive(Parser, Debug, Clone)]
#[command(group(
    ArgGroup::new("selection")
        .required(true)
        .args(["tracks", "all"]),
))]
pub struct MoveOptions {
    /// Source playlist (id, URI, link or name), or "liked"
    #[clap(long)]
    pub from: String,

    /// Target playlist (id, URI, link or name)
    #[clap(long)]
    pub to: String,

    /// Track id, URI or link; can be repeated
    #[clap(long = "track", num_args = 1)]
    pub tracks: Vec<String>,

    /// Move every track of the source playlist
    #[clap(long)]
    pub all: bool,

    /// Only report what would be moved
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CreateOptions {
    /// Name of the new playlist
    pub name: String,

    /// Description shown below the name
    #[clap(long)]
    pub description: Option<String>,

    /// Show the playlist on your profile
    #[clap(long)]
    pub public: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum TopKindArg {
    Tracks,
    Artists,
}

impl From<TopKindArg> for cli::TopKind {
    fn from(kind: TopKindArg) -> Self {
        match kind {
            TopKindArg::Tracks => cli::TopKind::Tracks,
            TopKindArg::Artists => cli::TopKind::Artists,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct TopOptions {
    /// What to rank
    #[clap(value_enum, default_value = "tracks")]
    pub kind: TopKindArg,

    /// Period: short (4 weeks), medium (6 months) or long (all time)
    #[clap(long, default_value = "medium")]
    pub range: TimeRange,

    /// Number of entries (1-50)
    #[clap(long, default_value_t = insights::DEFAULT_LIMIT)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct RecentOptions {
    /// Number of entries (1-50)
    #[clap(long, default_value_t = 20)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
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

    let config = match config::Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => error!("Invalid configuration: {}", e),
    };

    match cli.command {
        Command::Auth(opt) => cli::auth(config, opt.implicit).await,
        Command::Logout => cli::logout(config).await,
        Command::Status => cli::status(config).await,
        Command::Whoami => cli::whoami(config).await,
        Command::Playlists(opt) => cli::playlists(config, opt.search, opt.owned).await,
        Command::Tracks(opt) => cli::tracks(config, opt.playlist).await,
        Command::Move(opt) => {
            cli::move_tracks(
                config,
                opt.from,
                opt.to,
                opt.tracks,
                opt.all,
                opt.dry_run,
            )
            .await
        }
        Command::Create(opt) => {
            cli::create(config, opt.name, opt.description, opt.public).await
        }
        Command::Top(opt) => cli::top(config, opt.kind.into(), opt.range, opt.limit).await,
        Command::Recent(opt) => cli::recent(config, opt.limit).await,
        Command::Completions(_) => {}
    }
}
