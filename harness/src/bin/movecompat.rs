//! `movecompat`: command-line front end for compatibility queries.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use movecompat_harness::demo::demo_dex;
use movecompat_harness::party::{check_party, parse_party};
use movecompat_harness::query::{
    lookup_species, resolve_abilities, resolve_species, run_batch, search_by_name, BatchQuery, HitOrder, QueryMode,
};
use movecompat_harness::report::{
    batch_report, distributions_report, party_report, search_report, species_report, verify_report, QueryReport,
};
use movecompat_kernel::dex::dataset::Dex;
use movecompat_kernel::dex::ids::{BreedingCategory, TypeTag, MAX_LEVEL};
use movecompat_kernel::dex::species::Stat;
use movecompat_search::policy::{SearchPolicy, DEFAULT_MAX_ITERATIONS};

#[derive(Parser)]
#[command(
    name = "movecompat",
    about = "Decide whether one individual can hold a set of abilities at once",
    version
)]
struct Cli {
    /// Path to a JSON data set. The bundled demo data is used if omitted.
    #[arg(long, env = "MOVECOMPAT_DATA", global = true)]
    data: Option<PathBuf>,

    /// Bound on processed states per search.
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS, global = true)]
    max_iterations: u64,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Compatible,
    Individually,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Id,
    Name,
    Hp,
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    /// Sum of the base stats.
    Total,
}

impl OrderArg {
    fn to_order(self, descending: bool) -> HitOrder {
        let stat = match self {
            Self::Id => return HitOrder::Id,
            Self::Name => return HitOrder::Name,
            Self::Hp => Stat::Hp,
            Self::Attack => Stat::Attack,
            Self::Defense => Stat::Defense,
            Self::SpAttack => Stat::SpAttack,
            Self::SpDefense => Stat::SpDefense,
            Self::Speed => Stat::Speed,
            Self::Total => Stat::Total,
        };
        HitOrder::Stat { stat, descending }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search one species.
    Search {
        /// Species name or id.
        species: String,
        /// Ability names or ids.
        #[arg(required = true)]
        abilities: Vec<String>,
        #[arg(short, long, default_value_t = MAX_LEVEL)]
        level: u8,
        /// Print the witness as text instead of a JSON report.
        #[arg(long)]
        text: bool,
    },

    /// Show one species entry.
    Species {
        /// Species name or id.
        species: String,
    },

    /// Query every species passing the filters.
    Batch {
        /// Ability names or ids.
        abilities: Vec<String>,
        #[arg(short, long, default_value_t = MAX_LEVEL)]
        level: u8,
        /// Restrict to one species (name or id); it must still pass the filters.
        #[arg(long)]
        species: Option<String>,
        /// Required type tag; repeatable.
        #[arg(long = "type", value_name = "TAG")]
        types: Vec<u8>,
        /// Required breeding category; repeatable.
        #[arg(long = "category", value_name = "CATEGORY")]
        categories: Vec<u8>,
        #[arg(long, value_enum, default_value = "compatible")]
        mode: ModeArg,
        #[arg(long, value_enum, default_value = "id")]
        order: OrderArg,
        /// Highest stat first; only applies to stat orders.
        #[arg(long)]
        descending: bool,
    },

    /// Check every member of a party-data string.
    Party {
        /// Entries joined by `_x_`.
        data: String,
    },

    /// List every distribution event.
    Distributions,

    /// Print the data set digest.
    Digest,

    /// Verify a report previously written by this tool.
    Verify {
        /// Report file.
        path: PathBuf,
    },
}

fn load_dex(path: Option<&PathBuf>) -> anyhow::Result<Dex> {
    match path {
        Some(path) => {
            Dex::load(path).with_context(|| format!("loading data set {}", path.display()))
        }
        None => demo_dex().context("loading bundled demo data"),
    }
}

fn emit(report: &QueryReport) -> anyhow::Result<()> {
    let bytes = report.to_json_bytes()?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let policy = SearchPolicy {
        max_iterations: cli.max_iterations,
        ..SearchPolicy::default()
    };

    let data = cli.data;

    match cli.command {
        Commands::Search {
            species,
            abilities,
            level,
            text,
        } => {
            let dex = load_dex(data.as_ref())?;
            let (request, result) = search_by_name(&dex, &species, level, &abilities, &policy)?;
            if text {
                match result.outcome.trace() {
                    Some(trace) => print!("{}", trace.render(&dex)),
                    None => println!("{}", result.outcome.kind()),
                }
            } else {
                emit(&search_report(&dex, &request, &result)?)?;
            }
        }
        Commands::Species { species } => {
            let dex = load_dex(data.as_ref())?;
            emit(&species_report(&dex, lookup_species(&dex, &species)?)?)?;
        }
        Commands::Batch {
            abilities,
            level,
            species,
            types,
            categories,
            mode,
            order,
            descending,
        } => {
            let dex = load_dex(data.as_ref())?;
            let mut query = BatchQuery::new(level, resolve_abilities(&dex, &abilities)?);
            query.species = species.as_deref().map(|s| resolve_species(&dex, s)).transpose()?;
            query.types = types.into_iter().map(TypeTag).collect();
            query.categories = categories.into_iter().map(BreedingCategory).collect();
            query.mode = match mode {
                ModeArg::Compatible => QueryMode::Compatible,
                ModeArg::Individually => QueryMode::Individually,
            };
            query.order = order.to_order(descending);
            let batch = run_batch(&dex, &query, &policy)?;
            emit(&batch_report(&dex, &query, &batch)?)?;
        }
        Commands::Party { data: party } => {
            let dex = load_dex(data.as_ref())?;
            let members = parse_party(&party)?;
            let verdicts = check_party(&dex, &members, &policy)?;
            emit(&party_report(&dex, &verdicts)?)?;
        }
        Commands::Distributions => emit(&distributions_report(&load_dex(data.as_ref())?)?)?,
        Commands::Digest => println!("{}", load_dex(data.as_ref())?.digest()?),
        Commands::Verify { path } => {
            let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            verify_report(&bytes)?;
            println!("ok");
        }
    }
    Ok(())
}
