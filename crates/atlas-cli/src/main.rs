//! atlas CLI — country explorer in the terminal

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use atlas::catalog::{Catalog, Country, CountryFilter, Facets};
use atlas::config::catalog::DEFAULT_POPULAR_LIMIT;
use atlas::data::{FavoritesStore, FileStore, Settings};

/// atlas — browse countries and keep a favorites list
#[derive(Parser)]
#[command(name = "atlas", version, about)]
struct Cli {
    /// Directory holding the favorites record (overrides settings)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Act as this user (overrides the configured default user)
    #[arg(long, short, global = true)]
    user: Option<String>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the favorites list
    #[command(subcommand)]
    Favorites(FavoritesCommand),

    /// Browse the country list
    #[command(subcommand)]
    Countries(CountriesCommand),

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// Print the user's favorite codes
    List,
    /// Add a code if absent, remove it if present
    Toggle { code: String },
    /// Exit 0 if the code is a favorite, 1 otherwise
    Check { code: String },
    /// Print the user's favorites with country names
    Show(CountriesSource),
}

#[derive(Subcommand)]
enum CountriesCommand {
    /// Countries whose name contains QUERY
    Search {
        query: String,
        #[command(flatten)]
        source: CountriesSource,
    },
    /// Countries matching every given criterion
    Filter {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        capital: Option<String>,
        /// Exact common name
        #[arg(long)]
        name: Option<String>,
        /// Name substring
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        source: CountriesSource,
    },
    /// Distinct values for each filter criterion
    Facets(CountriesSource),
    /// Most populous countries
    Popular {
        #[arg(long, default_value_t = DEFAULT_POPULAR_LIMIT)]
        limit: usize,
        #[command(flatten)]
        source: CountriesSource,
    },
    /// Details for one country
    Get {
        code: String,
        #[command(flatten)]
        source: CountriesSource,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print current settings
    Show,
    /// Update settings (`--data-dir` sets the favorites directory)
    Set {
        #[arg(long)]
        default_user: Option<String>,
        #[arg(long)]
        countries: Option<PathBuf>,
        #[arg(long)]
        search_limit: Option<usize>,
    },
}

#[derive(Args)]
struct CountriesSource {
    /// Country list JSON (countries API v3.1 format)
    #[arg(long)]
    countries: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Run a command, returning the process exit code
fn run(cli: Cli) -> Result<i32> {
    let settings = Settings::load().context("Failed to load settings")?;
    debug!(?settings, "Loaded settings");

    match cli.command {
        Command::Favorites(cmd) => {
            let data_dir = match cli.data_dir {
                Some(dir) => dir,
                None => settings.resolved_data_dir()?,
            };
            let user = cli
                .user
                .or_else(|| settings.default_user.clone())
                .ok_or_else(|| anyhow!("No user given; pass --user or set a default user"))?;
            let store = FavoritesStore::new(FileStore::new(data_dir));
            run_favorites(&store, &user, cmd, &settings)
        }
        Command::Countries(cmd) => run_countries(cmd, &settings),
        Command::Config(cmd) => run_config(cmd, settings, cli.data_dir),
    }
}

fn run_favorites(
    store: &FavoritesStore<FileStore>,
    user: &str,
    cmd: FavoritesCommand,
    settings: &Settings,
) -> Result<i32> {
    match cmd {
        FavoritesCommand::List => {
            let favorites = store.try_get_favorites(user)?;
            for code in favorites {
                println!("{}", code);
            }
        }
        FavoritesCommand::Toggle { code } => {
            let toggle = store.try_toggle_favorite(user, &code)?;
            if toggle.is_now_favorite {
                println!("{} added to favorites", code);
            } else {
                println!("{} removed from favorites", code);
            }
        }
        FavoritesCommand::Check { code } => {
            if store.is_favorite(user, &code) {
                println!("{} is a favorite", code);
            } else {
                println!("{} is not a favorite", code);
                return Ok(1);
            }
        }
        FavoritesCommand::Show(source) => {
            let favorites = store.try_get_favorites(user)?;
            if favorites.is_empty() {
                println!("No favorites yet");
                return Ok(0);
            }
            let catalog = load_catalog(&source, settings)?;
            for code in &favorites {
                match catalog.by_code(code) {
                    Some(country) => println!("{:<4} {}", code, country.name()),
                    None => println!("{:<4} (unknown)", code),
                }
            }
        }
    }
    Ok(0)
}

fn run_countries(cmd: CountriesCommand, settings: &Settings) -> Result<i32> {
    match cmd {
        CountriesCommand::Search { query, source } => {
            let catalog = load_catalog(&source, settings)?;
            let found = catalog.search(&query);
            print_countries(&found, settings.search_limit);
            println!(
                "Showing {} of {} countries",
                found.len().min(settings.search_limit),
                catalog.count()
            );
        }
        CountriesCommand::Filter {
            region,
            language,
            currency,
            capital,
            name,
            search,
            source,
        } => {
            let catalog = load_catalog(&source, settings)?;
            let filter = CountryFilter {
                search,
                region,
                language,
                currency,
                capital,
                country: name,
            };
            let found = catalog.filtered(&filter);
            print_countries(&found, usize::MAX);
            println!(
                "Showing {} of {} countries ({} filters)",
                found.len(),
                catalog.count(),
                filter.active_count()
            );
        }
        CountriesCommand::Facets(source) => {
            let facets = load_catalog(&source, settings)?.facets();
            for (title, values) in facet_sections(&facets) {
                print_facet(title, values);
            }
        }
        CountriesCommand::Popular { limit, source } => {
            let catalog = load_catalog(&source, settings)?;
            for country in catalog.popular(limit) {
                println!("{:<4} {:<32} {:>14}", country.cca3, country.name(), country.population);
            }
        }
        CountriesCommand::Get { code, source } => {
            let catalog = load_catalog(&source, settings)?;
            let Some(country) = catalog.by_code(&code) else {
                println!("No country with code {}", code);
                return Ok(1);
            };
            print_country_details(country);
        }
    }
    Ok(0)
}

fn run_config(cmd: ConfigCommand, mut settings: Settings, data_dir: Option<PathBuf>) -> Result<i32> {
    match cmd {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigCommand::Set {
            default_user,
            countries,
            search_limit,
        } => {
            if let Some(user) = default_user {
                settings.default_user = Some(user).filter(|u| !u.is_empty());
            }
            if let Some(dir) = data_dir {
                settings.data_dir = Some(dir);
            }
            if let Some(path) = countries {
                settings.countries_file = Some(path);
            }
            if let Some(limit) = search_limit {
                settings.search_limit = limit;
            }
            settings.save().context("Failed to save settings")?;
            println!("Settings saved");
        }
    }
    Ok(0)
}

fn load_catalog(source: &CountriesSource, settings: &Settings) -> Result<Catalog> {
    let path: &Path = source
        .countries
        .as_deref()
        .or(settings.countries_file.as_deref())
        .ok_or_else(|| anyhow!("No country list; pass --countries or set one with `atlas config set --countries`"))?;
    Ok(Catalog::load_from(path)?)
}

fn print_countries(countries: &[&Country], limit: usize) {
    for country in countries.iter().take(limit) {
        println!("{:<4} {:<32} {}", country.cca3, country.name(), country.region);
    }
}

/// One titled section per filter dropdown
fn facet_sections(facets: &Facets) -> [(&'static str, &[String]); 5] {
    [
        ("Regions", facets.regions.as_slice()),
        ("Languages", facets.languages.as_slice()),
        ("Currencies", facets.currencies.as_slice()),
        ("Capitals", facets.capitals.as_slice()),
        ("Countries", facets.countries.as_slice()),
    ]
}

fn print_facet(title: &str, values: &[String]) {
    println!("{} ({}):", title, values.len());
    for value in values {
        println!("  {}", value);
    }
}

fn print_country_details(country: &Country) {
    println!("{} ({})", country.name(), country.cca3);
    if !country.name.official.is_empty() {
        println!("  Official name: {}", country.name.official);
    }
    println!("  Region:        {}", country.region);
    if let Some(subregion) = &country.subregion {
        println!("  Subregion:     {}", subregion);
    }
    if !country.capital.is_empty() {
        println!("  Capital:       {}", country.capital.join(", "));
    }
    println!("  Population:    {}", country.population);
    let languages: Vec<_> = country.language_names().collect();
    if !languages.is_empty() {
        println!("  Languages:     {}", languages.join(", "));
    }
    let currencies: Vec<_> = country.currency_names().collect();
    if !currencies.is_empty() {
        println!("  Currencies:    {}", currencies.join(", "));
    }
}
