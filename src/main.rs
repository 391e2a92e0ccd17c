//! settingkit CLI
//!
//! Entry point for the `settingkit` command-line tool.

use clap::{Args, Parser, Subcommand};
use settingkit::env::{decode_env_value, encode_env_value};
use settingkit::{
    decode_kv, initialize, InitOptions, LayerOrigin, Settings, SettingValue, TomlDirResolver,
    DEFAULT_ENV_PREFIX,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "settingkit")]
#[command(about = "Layered settings: defaults, user overlays and environment overrides", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the layers and print the merged settings
    Show {
        #[command(flatten)]
        layers: LayerArgs,

        /// Output in JSON format, with layer provenance
        #[arg(long)]
        json: bool,
    },

    /// Decode one raw value the way environment overrides are decoded
    Decode {
        /// Raw value, e.g. "(BOOL)1" or "a=1&b=x,y"
        value: String,

        /// Decode as a key-value string only
        #[arg(long)]
        kv: bool,
    },

    /// Print the merged settings as environment variable assignments
    ExportEnv {
        #[command(flatten)]
        layers: LayerArgs,
    },
}

#[derive(Args)]
struct LayerArgs {
    /// TOML file with initialization options; flags below override it
    #[arg(long, short = 'o')]
    options: Option<PathBuf>,

    /// Directory holding the layer files
    #[arg(long, short = 'r', default_value = ".")]
    root: PathBuf,

    /// Base package for relative layer identifiers
    #[arg(long)]
    package: Option<String>,

    /// Default layer identifier (e.g., config.settings)
    #[arg(long, short = 'd')]
    defaults: Option<String>,

    /// User layer identifiers, applied in order
    #[arg(long, short = 'u')]
    user: Vec<String>,

    /// Environment variable prefix (default: STK_ITEM_)
    #[arg(long)]
    prefix: Option<String>,

    /// Skip environment overrides
    #[arg(long)]
    no_env: bool,

    /// Replace lists and tuples instead of merging them
    #[arg(long)]
    cover_lists: bool,

    /// Replace mappings instead of updating them
    #[arg(long)]
    cover_dicts: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show { layers, json } => {
            run_show(layers, json);
        }
        Commands::Decode { value, kv } => {
            run_decode(&value, kv);
        }
        Commands::ExportEnv { layers } => {
            run_export_env(layers);
        }
    }
}

fn load(args: LayerArgs) -> Settings {
    let mut resolver = TomlDirResolver::new(&args.root);
    if let Some(package) = args.package {
        resolver = resolver.with_package(package);
    }

    let mut options = match &args.options {
        Some(path) => match InitOptions::from_file(path) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Error loading options: {}", e);
                process::exit(1);
            }
        },
        None => InitOptions::default(),
    };

    if args.defaults.is_some() {
        options.defaults = args.defaults;
    }
    options.user.extend(args.user);
    if let Some(prefix) = args.prefix {
        options.env_prefix = Some(prefix);
    }
    if args.no_env {
        options.env_prefix = None;
    }
    options.list_or_tuple_cover |= args.cover_lists;
    options.dict_cover |= args.cover_dicts;

    match initialize(resolver, options) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    }
}

fn run_show(args: LayerArgs, json_output: bool) {
    let settings = load(args);

    if json_output {
        let output = serde_json::json!({
            "settings": settings.snapshot(),
            "sources": settings.sources(),
        });

        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        if settings.snapshot().is_empty() {
            println!("No settings loaded.");
            return;
        }

        for (name, value) in settings.snapshot() {
            println!("{} = {}", name, value);
        }
    }
}

fn run_decode(raw: &str, kv_only: bool) {
    let decoded = if kv_only {
        decode_kv(raw).map(SettingValue::Map)
    } else {
        decode_env_value(raw)
    };

    match decoded {
        Ok(value) => println!("{}", value),
        Err(e) => {
            eprintln!("Decode error: {}", e);
            process::exit(1);
        }
    }
}

fn run_export_env(args: LayerArgs) {
    let settings = load(args);
    let prefix = settings
        .sources()
        .iter()
        .rev()
        .find(|source| source.origin == LayerOrigin::Environment)
        .map(|source| source.id.clone())
        .unwrap_or_else(|| DEFAULT_ENV_PREFIX.to_string());

    for (name, value) in settings.snapshot() {
        match encode_env_value(value) {
            Some(encoded) => println!("{}{}=\"{}\"", prefix, name, encoded),
            None => tracing::debug!(name = %name, kind = value.kind(), "not expressible as an environment value"),
        }
    }
}
