//! perf-config CLI
//!
//! Entry point for the `perf-config` command-line tool.

use clap::{CommandFactory, Parser};
use perf_config::{split_key, ConfigError, ConfigPaths, ConfigSet, Resolved, Scope};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "perf-config")]
#[command(about = "Get and set variables in a configuration file", version)]
struct Cli {
    /// Use system config file
    #[arg(long)]
    system: bool,

    /// Use user config file
    #[arg(long)]
    user: bool,

    /// Show current config variables
    #[arg(short = 'l', long, conflicts_with = "list_all")]
    list: bool,

    /// Show current and all possible config variables with default values
    #[arg(short = 'a', long)]
    list_all: bool,

    /// Config variables to show (section.name) or set (section.name=value)
    #[arg(value_name = "section.name[=value]")]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<i32, ConfigError> {
    if cli.system && cli.user {
        eprintln!("Error: only one config file at a time");
        eprintln!("{}", Cli::command().render_usage());
        return Ok(1);
    }
    if (cli.list || cli.list_all) && !cli.args.is_empty() {
        eprintln!("Error: takes no arguments");
        eprintln!("{}", Cli::command().render_usage());
        return Ok(1);
    }

    let paths = ConfigPaths::from_env()?;
    let scope = if cli.system {
        Scope::System
    } else if cli.user {
        Scope::User
    } else {
        Scope::Merged
    };
    let mut view = ConfigSet::load(&paths, scope)?;

    if cli.list_all {
        for (key, value) in view.entries_with_defaults() {
            println!("{}={}", key, value);
        }
        return Ok(0);
    }
    if cli.list || cli.args.is_empty() {
        return Ok(list_config(&view, &paths, cli));
    }

    // Assignments against the merged view land in the user scope, so
    // they go through a store loaded from the user file alone
    let mut writeback = if scope == Scope::Merged && cli.args.iter().any(|a| a.contains('=')) {
        Some(ConfigSet::load(&paths, Scope::User)?)
    } else {
        None
    };

    let mut status = 0;
    for arg in &cli.args {
        let code = match arg.split_once('=') {
            None => show_key(&view, arg),
            Some((_, "")) => {
                eprintln!("{}", ConfigError::MissingValue { key: arg.clone() });
                1
            }
            Some((key, value)) => {
                let file = write_path(cli, &paths)?;
                match writeback.as_mut() {
                    Some(store) => set_key(store, file, key, value)?,
                    None => set_key(&mut view, file, key, value)?,
                }
            }
        };
        status |= code;
    }
    Ok(status)
}

fn list_config(view: &ConfigSet, paths: &ConfigPaths, cli: &Cli) -> i32 {
    if view.is_empty() {
        match report_file(cli, paths) {
            Some(path) => {
                eprintln!("Nothing configured, please check your {}", path.display())
            }
            None => eprintln!("Nothing configured"),
        }
        return 1;
    }
    for entry in view.entries() {
        println!("{}.{}={}", entry.section, entry.name, entry.value);
    }
    0
}

fn show_key(view: &ConfigSet, key: &str) -> i32 {
    let (section, name) = match split_key(key) {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };
    match view.query(&section, &name) {
        Some(Resolved::Current(value)) => {
            println!("{}.{}={}", section, name, value);
            0
        }
        Some(Resolved::Default(value)) => {
            println!("{}.{}={} (default)", section, name, value);
            0
        }
        None => {
            eprintln!("No such config variable: '{}.{}'", section, name);
            1
        }
    }
}

fn set_key(store: &mut ConfigSet, file: &Path, key: &str, value: &str) -> Result<i32, ConfigError> {
    let (section, name) = match split_key(key) {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(1);
        }
    };
    store.set_value(&section, &name, value)?;
    store.write(file)?;
    Ok(0)
}

/// File an assignment lands in for the current flags
fn write_path<'a>(cli: &Cli, paths: &'a ConfigPaths) -> Result<&'a Path, ConfigError> {
    if cli.system {
        return Ok(paths.system.as_path());
    }
    match &paths.user {
        Some(path) => Ok(path.as_path()),
        None => Err(io::Error::new(
            io::ErrorKind::NotFound,
            "HOME environment variable not set",
        )
        .into()),
    }
}

/// File named in the "Nothing configured" hint
fn report_file<'a>(cli: &Cli, paths: &'a ConfigPaths) -> Option<&'a PathBuf> {
    if cli.system {
        Some(&paths.system)
    } else if cli.user {
        paths.user.as_ref()
    } else {
        paths.exclusive.as_ref().or(paths.user.as_ref())
    }
}
