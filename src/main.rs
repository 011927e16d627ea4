use clap::{Parser as ClapParser, Subcommand};
use std::fs;
use std::path::PathBuf;
use subc::config::Config;
use subc::error::CompileError;

#[derive(ClapParser)]
#[command(author, version, about = "Front end for a pragmatic subset of C")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize a C source file and print the finalized token stream
    Tokenize {
        /// Path to a .c file, or a bare name resolved in the sources directory
        source: String,
        /// Emit the token stream as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a C source file and print the AST as JSON
    Parse {
        /// Path to a .c file, or a bare name resolved in the sources directory
        source: String,
        /// Pretty-print the JSON tree
        #[arg(long)]
        pretty: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the active configuration
    Show,
    /// Write a default configuration file
    Init,
}

fn resolve_source(name: &str, config: &Config) -> Result<PathBuf, CompileError> {
    let direct = PathBuf::from(name);
    if direct.exists() {
        return Ok(direct);
    }

    let candidate = config.sources_dir.join(format!("{}.c", name));
    if candidate.exists() {
        return Ok(candidate);
    }

    Err(CompileError::FileNotFound(format!(
        "{} (also tried {})\n\nTo fix this:\n1. Pass a path to a .c file\n2. Or put {}.c in {}\n3. Or set SUBC_SOURCES_DIR to your sources directory",
        name,
        candidate.display(),
        name,
        config.sources_dir.display()
    )))
}

fn load_source(name: &str, config: &Config) -> Result<String, CompileError> {
    let path = resolve_source(name, config)?;
    fs::read_to_string(&path).map_err(CompileError::Io)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Commands::Tokenize { source, json } => {
            let text = load_source(&source, &config)?;
            let tokens = subc::tokenize(&text)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for token in &tokens {
                    println!("{}", token);
                }
            }
        }
        Commands::Parse { source, pretty } => {
            let text = load_source(&source, &config)?;
            let program = subc::parse_source(&text)?;
            let rendered = if pretty {
                serde_json::to_string_pretty(&program)?
            } else {
                serde_json::to_string(&program)?
            };
            println!("{}", rendered);
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigCommands::Init => {
                let path = Config::get_config_path();
                if path.exists() {
                    println!("Config file already exists at: {}", path.display());
                } else {
                    config.save()?;
                    println!("Initialized config file at: {}", path.display());
                }
            }
        },
    }

    Ok(())
}
