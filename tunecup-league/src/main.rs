//! tunecup - command-line front end for a music league
//!
//! Read commands print JSON snapshots to stdout; logs go to stderr.
//! Mutating commands write through the record stores, which persist after
//! every change.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tunecup_common::config::{resolve_data_folder, DataFolder, TomlConfig};
use tunecup_common::{Competitor, Round, Submission, Vote, VoteKey};
use tunecup_league::{League, LeagueStats};

/// Command-line arguments for tunecup
#[derive(Parser, Debug)]
#[command(name = "tunecup")]
#[command(about = "Standings and statistics for a music submission league")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to the platform config dir)
    #[arg(short, long, env = "TUNECUP_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Folder holding the league's store files
    #[arg(short, long, global = true)]
    data_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the data folder and any missing store file
    Init,
    /// Competitors ranked by points received
    Leaderboard,
    /// All rounds in store order
    Rounds,
    /// Points per submitter in one round
    RoundScores { round_id: String },
    /// Derived statistics for one competitor
    Profile { competitor_id: String },
    /// League-wide superlatives
    Superlatives,
    AddCompetitor {
        id: String,
        name: String,
    },
    RemoveCompetitor {
        id: String,
    },
    AddRound {
        id: String,
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        playlist_ref: String,
        /// Defaults to now (RFC 3339, UTC)
        #[arg(long)]
        created_at: Option<String>,
    },
    RemoveRound {
        id: String,
    },
    AddSubmission {
        track_ref: String,
        submitter_id: String,
        round_id: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        album: String,
        #[arg(long, default_value = "")]
        artists: String,
        #[arg(long, default_value = "")]
        comment: String,
        #[arg(long, default_value = "Yes")]
        visible_to_voters: String,
        #[arg(long)]
        created_at: Option<String>,
    },
    RemoveSubmission {
        track_ref: String,
    },
    AddVote {
        track_ref: String,
        voter_id: String,
        round_id: String,
        /// Stored verbatim; only plain integers count towards scores
        points: String,
        #[arg(long, default_value = "")]
        comment: String,
        #[arg(long)]
        created_at: Option<String>,
    },
    RemoveVote {
        track_ref: String,
        voter_id: String,
        round_id: String,
    },
}

/// Round score row with the submitter's display name resolved
#[derive(Debug, Serialize)]
struct RoundScoreRow<'a> {
    competitor_id: &'a str,
    name: &'a str,
    points: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let root = resolve_data_folder(args.data_folder.as_deref(), &config);
    let folder = DataFolder::new(root, config.files.clone());
    info!(
        "Data folder: {} ({:?} stores)",
        folder.root().display(),
        folder.format()
    );

    if let Command::Init = args.command {
        let created = folder.ensure_store_files()?;
        info!("Created {} store files", created);
        return Ok(());
    }

    let mut league = League::open(&folder).with_context(|| {
        format!(
            "Failed to open league in {} (run `tunecup init` first?)",
            folder.root().display()
        )
    })?;

    run(args.command, &mut league)
}

fn run(command: Command, league: &mut League) -> Result<()> {
    match command {
        // Handled in main before the league is opened
        Command::Init => Ok(()),
        Command::Leaderboard => print_json(&league.leaderboard()),
        Command::Rounds => print_json(league.rounds().get_all()),
        Command::RoundScores { round_id } => {
            let table = league.round_score_table(&round_id);
            let rows: Vec<RoundScoreRow> = table
                .iter()
                .map(|(competitor_id, points)| RoundScoreRow {
                    competitor_id,
                    name: league.competitor_name(competitor_id),
                    points,
                })
                .collect();
            print_json(&rows)
        }
        Command::Profile { competitor_id } => {
            let profile = LeagueStats::new(league).competitor_profile(&competitor_id);
            print_json(&profile)
        }
        Command::Superlatives => print_json(&LeagueStats::new(league).summary()),
        Command::AddCompetitor { id, name } => {
            let added = league.competitors_mut().add(Competitor::new(&id, name))?;
            report_added("Competitor", &id, added.is_some())
        }
        Command::RemoveCompetitor { id } => {
            let removed = league.competitors_mut().remove(&id)?;
            report_removed("Competitor", &id, removed)
        }
        Command::AddRound {
            id,
            name,
            description,
            playlist_ref,
            created_at,
        } => {
            let round = Round {
                id: id.clone(),
                created_at: created_at.unwrap_or_else(now),
                name,
                description,
                playlist_ref,
            };
            let added = league.rounds_mut().add(round)?;
            report_added("Round", &id, added.is_some())
        }
        Command::RemoveRound { id } => {
            let removed = league.rounds_mut().remove(&id)?;
            report_removed("Round", &id, removed)
        }
        Command::AddSubmission {
            track_ref,
            submitter_id,
            round_id,
            title,
            album,
            artists,
            comment,
            visible_to_voters,
            created_at,
        } => {
            let submission = Submission {
                track_ref: track_ref.clone(),
                title,
                album,
                artists,
                submitter_id,
                created_at: created_at.unwrap_or_else(now),
                comment,
                round_id,
                visible_to_voters,
            };
            let added = league.submissions_mut().add(submission)?;
            report_added("Submission", &track_ref, added.is_some())
        }
        Command::RemoveSubmission { track_ref } => {
            let removed = league.submissions_mut().remove(&track_ref)?;
            report_removed("Submission", &track_ref, removed)
        }
        Command::AddVote {
            track_ref,
            voter_id,
            round_id,
            points,
            comment,
            created_at,
        } => {
            let vote = Vote {
                track_ref,
                voter_id,
                created_at: created_at.unwrap_or_else(now),
                points_assigned: points,
                comment,
                round_id,
            };
            let label = format!("{}/{}/{}", vote.round_id, vote.track_ref, vote.voter_id);
            let added = league.votes_mut().add(vote)?;
            report_added("Vote", &label, added.is_some())
        }
        Command::RemoveVote {
            track_ref,
            voter_id,
            round_id,
        } => {
            let key = VoteKey::new(track_ref, voter_id, round_id);
            let removed = league.votes_mut().remove(&key)?;
            let label = format!("{}/{}/{}", key.round_id, key.track_ref, key.voter_id);
            report_removed("Vote", &label, removed)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_added(kind: &str, key: &str, added: bool) -> Result<()> {
    if !added {
        bail!("{} {} already exists", kind, key);
    }
    info!("{} {} added", kind, key);
    Ok(())
}

fn report_removed(kind: &str, key: &str, removed: bool) -> Result<()> {
    if !removed {
        bail!("{} {} not found", kind, key);
    }
    info!("{} {} removed", kind, key);
    Ok(())
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
