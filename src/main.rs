use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use swiss_pairer::config::AppConfig;
use swiss_pairer::pairing::SwissPairing;
use swiss_pairer::session::{seeded_rng, Tournament, TournamentSink};
use swiss_pairer::simulate;
use swiss_pairer::storage::{
    expand_round_files, JsonlOutput, OutputFormat, TextFileInput, TextFileOutput, TextStdOutput,
};

#[derive(Parser)]
#[command(name = "swiss-pairer")]
#[command(about = "Read the state of a Swiss tournament and generate standings and pairings for the next round")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./swiss-pairer.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Seed for random tie-breaks
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// List of players, one per line
    #[arg(long, short = 'p')]
    players_file: PathBuf,

    /// Round results, specify once for each round
    #[arg(long = "round-file", short = 'r')]
    round_files: Vec<PathBuf>,

    /// Glob pattern for additional round files (loaded in sorted order)
    #[arg(long)]
    rounds_glob: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current standings
    Standings {
        #[command(flatten)]
        input: InputArgs,

        /// Output format: "text" or "jsonl"
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Output standings and pairings for the next round
    Pair {
        #[command(flatten)]
        input: InputArgs,

        /// Write current standings to this file
        #[arg(long, short = 's')]
        output_standings: Option<PathBuf>,

        /// Write next-round pairings to this file
        #[arg(long, short = 'o')]
        output_pairings: Option<PathBuf>,

        /// Output format: "text" or "jsonl"
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Simulate tournaments where the stronger player always wins
    Simulate {
        /// Number of players (even)
        #[arg(long)]
        players: Option<usize>,

        /// Rounds per tournament
        #[arg(long)]
        rounds: Option<usize>,

        /// Number of tournaments to play
        #[arg(long)]
        runs: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config {:?}", cli.config))?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let json = cli.json_logs;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();

    tracing::debug!("Starting swiss-pairer v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Standings { input, format } => {
            let session = load_session(&config, &input)?;
            match format.unwrap_or(config.output.format) {
                OutputFormat::Text => session.output_standings(&mut TextStdOutput::stdout())?,
                OutputFormat::Jsonl => session.output_standings(&mut JsonlOutput::stdout())?,
            }
        }

        Commands::Pair {
            input,
            output_standings,
            output_pairings,
            format,
        } => {
            let mut session = load_session(&config, &input)?;
            let format = format.unwrap_or(config.output.format);

            match (output_standings, output_pairings, format) {
                (Some(standings), Some(pairings), OutputFormat::Text) => {
                    let mut sink = TextFileOutput::new(standings, pairings)
                        .with_separator(config.output.separator.clone());
                    emit(&mut session, &mut sink)?;
                }
                (Some(standings), Some(pairings), OutputFormat::Jsonl) => {
                    let mut sink = JsonlOutput::files(&standings, &pairings)?;
                    emit(&mut session, &mut sink)?;
                }
                (_, _, OutputFormat::Text) => emit(&mut session, &mut TextStdOutput::stdout())?,
                (_, _, OutputFormat::Jsonl) => emit(&mut session, &mut JsonlOutput::stdout())?,
            }
        }

        Commands::Simulate {
            players,
            rounds,
            runs,
        } => {
            if let Some(players) = players {
                config.simulation.players = players;
            }
            if let Some(rounds) = rounds {
                config.simulation.rounds = rounds;
            }
            if let Some(runs) = runs {
                config.simulation.runs = runs;
            }
            config.validate_simulation()?;
            run_simulations(&config)?;
        }
    }

    Ok(())
}

fn load_session(config: &AppConfig, input: &InputArgs) -> Result<Tournament<SwissPairing>> {
    let round_files = expand_round_files(&input.round_files, input.rounds_glob.as_deref())
        .context("Failed to resolve round files")?;
    let source = TextFileInput::new(input.players_file.clone(), round_files)
        .with_separator(config.input.separator.clone())
        .with_default_rating(config.input.default_rating);

    Tournament::load(&source, SwissPairing::new(), seeded_rng(config.seed))
        .context("Failed to load tournament")
}

fn emit(session: &mut Tournament<SwissPairing>, sink: &mut impl TournamentSink) -> Result<()> {
    session
        .output_standings(sink)
        .context("Failed to write standings")?;
    session
        .output_pairings(sink)
        .context("Failed to generate pairings")?;
    Ok(())
}

fn run_simulations(config: &AppConfig) -> Result<()> {
    let params = config.simulation.params();
    let mut failures = 0;

    for attempt in 0..config.simulation.runs {
        let seed = config.seed.map(|s| s.wrapping_add(u64::from(attempt)));
        let report = simulate::run(&params, SwissPairing::new(), seeded_rng(seed))
            .with_context(|| format!("Simulation {} failed", attempt))?;

        if report.strongest_on_top {
            println!("OK {}", attempt);
        } else {
            failures += 1;
            println!("FAILED {}: strongest player {} did not finish on top", attempt, report.strongest);
            for row in &report.ranking {
                println!("  {} ({}) {}", row.name, row.rating, row.score);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} simulations failed", failures, config.simulation.runs);
    }
    Ok(())
}
