//! My Starter - Entry Point
//!
//! Command-line access to the configuration store and the file utilities.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use log::info;

use my_starter::error::handlers::{exit_code, handle_error};
use my_starter::storage::{self, text};
use my_starter::utils::logging::setup_logging;
use my_starter::{ConfigStore, ToolkitError, ToolkitSettings};

#[derive(Parser, Debug)]
#[command(name = "my-starter")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file to use instead of the packaged one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a configuration value
    Get {
        key: String,
        /// Printed when the key is absent or blank
        #[arg(long)]
        default: Option<String>,
    },
    /// Set a configuration value
    Set {
        key: String,
        value: String,
        /// Persist the configuration file afterwards
        #[arg(long)]
        save: bool,
    },
    /// List files by extension
    List {
        root: PathBuf,
        #[arg(long = "ext", required = true)]
        extensions: Vec<String>,
        #[arg(long)]
        recursive: bool,
    },
    /// Print a text file
    Cat {
        file: PathBuf,
        /// Encoding label, defaults to the configured default encoding
        #[arg(long)]
        encoding: Option<String>,
    },
    /// Zip a single file next to itself
    Zip { file: PathBuf },
    /// Print the creation time of a file
    Created { file: PathBuf },
}

fn main() {
    setup_logging();
    let args = Args::parse();

    if let Err(e) = run(args) {
        handle_error(&e);
        process::exit(exit_code(&e));
    }
}

fn run(args: Args) -> Result<(), ToolkitError> {
    let settings = ToolkitSettings::load()?;
    let store = ConfigStore::from_settings(&settings);
    if let Some(path) = args.config {
        store.set_override_path(path)?;
    }

    match args.command {
        Command::Get { key, default } => {
            let value = match default {
                Some(fallback) => Some(store.get_or_default(&key, &fallback)?),
                None => store.get(&key)?,
            };
            if let Some(value) = value {
                println!("{value}");
            }
        }
        Command::Set { key, value, save } => {
            store.set(&key, &value)?;
            if save {
                store.save()?;
                info!("Configuration written to {}", store.config_path().display());
            }
        }
        Command::List {
            root,
            extensions,
            recursive,
        } => {
            for file in storage::list_files(&root, extensions.as_slice(), recursive)? {
                println!("{}", file.display());
            }
        }
        Command::Cat { file, encoding } => {
            let encoding = match encoding {
                Some(label) => text::encoding_for_label(&label)?,
                None => settings.encoding()?,
            };
            for line in text::read_lines(&file, encoding)? {
                println!("{line}");
            }
        }
        Command::Zip { file } => {
            let archive = storage::zip_single_file(&file)?;
            println!("{}", archive.display());
        }
        Command::Created { file } => {
            println!("{}", storage::creation_time(&file).to_rfc3339());
        }
    }

    Ok(())
}
