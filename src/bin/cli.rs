use anyhow::{bail, Context, Result};
use clap::Parser;
use playoff_pool::data::{save_json, save_leaderboard_to_csv, save_probabilities_to_csv};
use playoff_pool::{
    decided_results, eliminated_teams, expected_opponent, pick_status, report_in_background,
    PickStatus, PoolInputs, PoolReport, PoolSnapshot, ProbabilityTier,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "playoff-pool")]
#[command(about = "Scores an NFL playoff pick pool and projects each entrant's chance to win")]
struct Args {
    /// Season configuration (teams, seeds, Wild Card pairings)
    #[arg(long, env = "POOL_SEASON", default_value = "config/season_2025.json")]
    season: PathBuf,

    /// Pick sheet, CSV or JSON
    #[arg(long, env = "POOL_PARTICIPANTS", default_value = "data/participants.csv")]
    participants: PathBuf,

    /// Game feed snapshot (JSON)
    #[arg(long, env = "POOL_GAMES", default_value = "data/games_wildcard.json")]
    games: PathBuf,

    /// Bookmaker quotes (JSON); every matchup is a coin flip without them
    #[arg(long, env = "POOL_ODDS")]
    odds: Option<PathBuf>,

    /// Directory to write leaderboard.csv and probabilities.csv into
    #[arg(long, env = "POOL_CSV_DIR")]
    csv_dir: Option<PathBuf>,

    /// Show every pick for one participant
    #[arg(long)]
    participant: Option<String>,

    /// Print the full report as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let inputs = PoolInputs {
        season: args.season.clone(),
        participants: args.participants.clone(),
        games: args.games.clone(),
        odds: args.odds.clone(),
    };

    let snapshot = Arc::new(PoolSnapshot::load(&inputs)?);
    let report = report_in_background(snapshot.clone()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(name) = &args.participant {
        print_participant(&snapshot, name)?;
    }

    if let Some(dir) = &args.csv_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        save_leaderboard_to_csv(&report.leaderboard, dir.join("leaderboard.csv"))?;
        save_probabilities_to_csv(&report.probabilities, dir.join("probabilities.csv"))?;
        save_json(&report, dir.join("report.json"))?;
        println!("\nSaved leaderboard, probabilities and report to {}", dir.display());
    }

    Ok(())
}

fn print_report(report: &PoolReport) {
    println!("NFL Playoff Pool {}\n", report.season);

    println!("LEADERBOARD\n");
    for entry in &report.leaderboard {
        println!("{}", entry.format());
    }

    println!("\nELIMINATED TEAMS\n");
    if report.eliminated_teams.is_empty() {
        println!("No teams eliminated yet.");
    } else {
        println!("{}", report.eliminated_teams.join(", "));
    }

    println!("\nDIVISIONAL ROUND\n");
    for (conference, matchups) in &report.divisional {
        let name = |team: &Option<playoff_pool::Team>| {
            team.as_ref()
                .map(|t| t.abbreviation.clone())
                .unwrap_or_else(|| "TBD".to_string())
        };
        println!(
            "{}: {} vs {} | {} vs {}",
            conference,
            name(&matchups.div1_home),
            name(&matchups.div1_away),
            name(&matchups.div2_home),
            name(&matchups.div2_away)
        );
    }

    println!("\nWIN PROBABILITIES\n");
    let mut rows: Vec<_> = report.probabilities.probabilities.iter().collect();
    rows.sort_by(|a, b| b.1.vegas.total_cmp(&a.1.vegas).then(a.0.cmp(b.0)));
    for (i, (name, p)) in rows.iter().enumerate() {
        let tier = if report.probabilities.eliminated(name) {
            ProbabilityTier::Eliminated
        } else {
            ProbabilityTier::from_probability(p.vegas)
        };
        println!(
            "{}. {:<12} 50/50 {:>5.1}% | Vegas {:>5.1}% | {}",
            i + 1,
            name,
            p.fifty_fifty * 100.0,
            p.vegas * 100.0,
            tier.label()
        );
    }

    if !report.unresolved.is_empty() {
        println!("\nUNRESOLVED GAMES\n");
        for game in &report.unresolved {
            println!("{} ({}): {}", game.game_id, game.round.label(), game.reason);
        }
    }
}

fn print_participant(snapshot: &PoolSnapshot, name: &str) -> Result<()> {
    let Some(participant) = snapshot
        .participants
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name) || p.id == name)
    else {
        bail!("No participant named {}", name);
    };

    let results = decided_results(&snapshot.season, &snapshot.games);
    let eliminated = eliminated_teams(&snapshot.games);

    println!("\nPICKS FOR {}\n", participant.name.to_uppercase());
    for pick in participant.picks() {
        let status = match pick_status(pick, &results, &eliminated) {
            PickStatus::Correct => "correct",
            PickStatus::Incorrect => "wrong",
            PickStatus::Pending => "pending",
            PickStatus::Eliminated => "eliminated",
        };
        match expected_opponent(&snapshot.season, participant, pick.slot) {
            Some(opponent) => println!(
                "{:<10} {:<4} vs {:<4} {}",
                pick.slot, pick.team, opponent, status
            ),
            None => println!("{:<10} {:<12} {}", pick.slot, pick.team, status),
        }
    }
    Ok(())
}
