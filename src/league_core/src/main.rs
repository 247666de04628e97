//! League simulator CLI
//!
//! Mirrors the season pipeline: derive ratings, simulate fixtures and
//! results, write per-round tables and the standings evolution.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use league_core::{
    format_table, parse_results, read_season_totals, run_simulations, season_rng, simulate_season,
    standings_by_round, summarize, write_results, write_round_tables, PositionHistory,
    SeasonConfig, StrengthModel,
};

const RESULTS_FILE: &str = "all_match_results.txt";
const TABLES_DIR: &str = "Tables";
const EVOLUTION_FILE: &str = "evolution.json";

#[derive(Parser)]
#[command(name = "league_sim")]
#[command(about = "Simulate a double round-robin football league", long_about = None)]
struct Cli {
    /// Log every round
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive ratings from last season's goal totals
    Strengths {
        /// CSV with Team,GoalsScored,GoalsConceded
        #[arg(long)]
        totals: PathBuf,

        /// Output CSV with Team,ExpScored,ExpConceded
        #[arg(long)]
        out: PathBuf,

        /// Noise as a share of the weakest per-match average
        #[arg(long, default_value_t = league_core::constants::STRENGTH_NOISE_PROPORTION)]
        noise: f64,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Schedule and play a season
    Simulate {
        /// CSV with Team,ExpScored,ExpConceded
        #[arg(long)]
        strengths: PathBuf,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// JSON season config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Overrides the config seed
        #[arg(long)]
        seed: Option<u64>,

        /// Draw the second half independently instead of mirroring the first
        #[arg(long)]
        independent: bool,

        /// Keep ratings fixed for the whole season
        #[arg(long)]
        static_strengths: bool,
    },

    /// Rebuild per-round tables from a results file
    Tables {
        /// CSV with Team,ExpScored,ExpConceded (team list)
        #[arg(long)]
        strengths: PathBuf,

        /// Results file written by `simulate`
        #[arg(long)]
        results: PathBuf,

        /// Output directory
        #[arg(long)]
        out: PathBuf,
    },

    /// Run many seasons and summarise final positions
    Batch {
        /// CSV with Team,ExpScored,ExpConceded
        #[arg(long)]
        strengths: PathBuf,

        #[arg(long, default_value_t = 1000)]
        runs: usize,

        /// JSON season config
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Strengths {
            totals,
            out,
            noise,
            seed,
        } => {
            let file = File::open(&totals)
                .with_context(|| format!("Failed to open totals file: {}", totals.display()))?;
            let rows = read_season_totals(file)?;
            let model = StrengthModel::from_season_totals(&rows, noise, &mut season_rng(seed))?;

            let writer = File::create(&out)
                .with_context(|| format!("Failed to create ratings file: {}", out.display()))?;
            model.write_csv(writer)?;
            info!("wrote ratings for {} teams to {}", model.len(), out.display());
        }

        Commands::Simulate {
            strengths,
            out,
            config,
            seed,
            independent,
            static_strengths,
        } => {
            let mut model = load_strengths(&strengths)?;
            let mut config = load_config(config.as_deref())?;
            if seed.is_some() {
                config.seed = seed;
            }
            if independent {
                config.symmetric = false;
            }
            if static_strengths {
                config.adaptive = false;
            }

            let mut rng = season_rng(config.seed);
            let outcome = simulate_season(&mut model, &config, &mut rng)?;

            fs::create_dir_all(&out)
                .with_context(|| format!("Failed to create output directory: {}", out.display()))?;
            let results_path = out.join(RESULTS_FILE);
            let writer = BufWriter::new(File::create(&results_path).with_context(|| {
                format!("Failed to create results file: {}", results_path.display())
            })?);
            write_results(&outcome.results, writer)?;

            write_outputs(&out, &outcome.tables, &outcome.positions)?;
            print!("{}", format_table(outcome.final_table()));
        }

        Commands::Tables {
            strengths,
            results,
            out,
        } => {
            let model = load_strengths(&strengths)?;
            let text = fs::read_to_string(&results)
                .with_context(|| format!("Failed to read results file: {}", results.display()))?;
            let rounds = parse_results(&text)
                .with_context(|| format!("Failed to parse results file: {}", results.display()))?;

            let tables = standings_by_round(&model.names(), &rounds)?;
            let positions = PositionHistory::from_tables(&tables);
            write_outputs(&out, &tables, &positions)?;
            if let Some(last) = tables.last() {
                print!("{}", format_table(last));
            }
        }

        Commands::Batch {
            strengths,
            runs,
            config,
            seed,
        } => {
            let model = load_strengths(&strengths)?;
            let config = load_config(config.as_deref())?;
            let outcomes = run_simulations(&model, &config, runs, seed.or(config.seed))?;

            println!(
                "{:<20}{:>8}{:>10}{:>8}{:>10}{:>6}{:>6}",
                "Team", "Title%", "Points", "SD", "MeanRank", "Best", "Worst"
            );
            for s in summarize(&outcomes) {
                println!(
                    "{:<20}{:>8.1}{:>10.2}{:>8.2}{:>10.2}{:>6}{:>6}",
                    s.team,
                    s.title_probability * 100.0,
                    s.mean_points,
                    s.points_std_dev,
                    s.mean_rank,
                    s.best_rank,
                    s.worst_rank
                );
            }
        }
    }

    Ok(())
}

fn load_strengths(path: &Path) -> Result<StrengthModel> {
    StrengthModel::from_csv_path(path)
        .with_context(|| format!("Failed to load ratings: {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<SeasonConfig> {
    match path {
        Some(p) => SeasonConfig::from_json_file(p)
            .with_context(|| format!("Failed to load config: {}", p.display())),
        None => Ok(SeasonConfig::default()),
    }
}

fn write_outputs(
    out: &Path,
    tables: &[Vec<league_core::Standing>],
    positions: &PositionHistory,
) -> Result<()> {
    let table_paths = write_round_tables(&out.join(TABLES_DIR), tables)?;
    info!("wrote {} round tables", table_paths.len());

    let evolution_path = out.join(EVOLUTION_FILE);
    let writer = BufWriter::new(File::create(&evolution_path).with_context(|| {
        format!("Failed to create evolution file: {}", evolution_path.display())
    })?);
    serde_json::to_writer_pretty(writer, positions)?;
    Ok(())
}
