use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use urlshort::source::{self, store, Encoding};

#[derive(Parser)]
#[command(name = "urlshort-cli")]
#[command(about = "Manage the urlshort redirect store", long_about = None)]
struct Cli {
    /// Store file
    #[arg(short, long, default_value = "paths.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import rules from a YAML or JSON file, creating the store if missing
    Import {
        /// Rules file (.yaml, .yml or .json)
        rules: PathBuf,
    },
    /// Print the URL stored for a path
    Lookup {
        path: String,
    },
    /// Print every stored rule
    Export {
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

impl From<Format> for Encoding {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => Encoding::Yaml,
            Format::Json => Encoding::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Import { rules } => {
            let records = read_rules(&rules)?;
            let db = store::create(&cli.db)?;
            let written = store::import(&db, &records)?;
            println!("Imported {} rules into {}", written, cli.db.display());
        }
        Commands::Lookup { path } => {
            let db = store::open(&cli.db)?;
            match store::lookup(&db, &path)? {
                Some(url) => println!("{}", url),
                None => {
                    eprintln!("No rule for {}", path);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Export { format } => {
            let db = store::open(&cli.db)?;
            let records = store::export(&db)?;
            print!("{}", source::encode(&records, format.into())?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn read_rules(path: &Path) -> Result<Vec<source::PathRecord>, Box<dyn std::error::Error>> {
    let encoding = Encoding::from_path(path)
        .ok_or_else(|| format!("{}: expected a .yaml, .yml or .json file", path.display()))?;
    let bytes = std::fs::read(path)?;
    Ok(source::decode(&bytes, encoding)?)
}
