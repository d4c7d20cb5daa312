use anyhow::{Context, bail};
use botclient::config::Config;
use botclient::directory::{DirectorySnapshot, GuildDirectory, InMemoryDirectory};
use botclient::member_list::MemberListProjector;
use botclient::session::SessionState;
use botclient::types::Snowflake;
use chrono::Local;
use clap::Parser;
use log::info;
use std::path::PathBuf;

// Prints the member-list update the host would receive for one channel.
//
// Usage:
//   cargo run -- --snapshot demos/guild.json --channel 81384788765712385
//   cargo run -- -s demos/guild.json -C 81384788765712386 --pretty

#[derive(Debug, Parser)]
#[command(name = "botclient", version, about = "Project a guild member list from a directory snapshot")]
struct Args {
    /// JSON snapshot of guilds, roles, members, channels and presences.
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Channel whose member list is projected.
    #[arg(short = 'C', long)]
    channel: Snowflake,

    /// Optional JSON config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the payload.
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{:<5}] [{}] - {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::default(),
    };

    let raw = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("reading snapshot {}", args.snapshot.display()))?;
    let snapshot: DirectorySnapshot =
        serde_json::from_str(&raw).context("parsing directory snapshot")?;
    let directory = InMemoryDirectory::from_snapshot(snapshot);

    let Some(channel) = directory.channel(args.channel) else {
        bail!("channel {} is not in the snapshot", args.channel);
    };

    let mut session = SessionState::new();
    session.select_channel(channel.guild_id, Some(channel.id));

    let projector = MemberListProjector::new(config.show_member_list);
    let Some(update) = projector.project(&directory, &session) else {
        bail!("channel {} has no member list", args.channel);
    };
    info!(
        "Projected list {} for guild {}: {} online / {} members",
        update.id, update.guild_id, update.online_count, update.member_count
    );

    let out = if args.pretty {
        serde_json::to_string_pretty(&update)?
    } else {
        serde_json::to_string(&update)?
    };
    println!("{out}");
    Ok(())
}
