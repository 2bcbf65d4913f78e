//! ENSplit - name-addressed payment splitting (simulated)
//!
//! Usage:
//!   ensplit                         Interactive shell on the built-in demo names
//!   ensplit --config <PATH>         Start from a TOML seed file
//!   ensplit --strict                Reject incomplete recipients and bad totals
//!   ensplit --dump-config <PATH>    Write the built-in demo seed and exit

mod cli;

use std::io;
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ensplit::{default_demo_toml, SeedConfigToml};

/// Start-up options
#[derive(Clone, Debug, Default)]
struct Options {
    /// Seed file to load instead of the demo
    config_path: Option<PathBuf>,
    /// Force strict resolution
    strict: bool,
}

/// What the invocation asks for
enum Command {
    Shell(Options),
    DumpConfig(PathBuf),
    Help,
    Version,
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut options = Options::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| anyhow::anyhow!("--config needs a path"))?;
                options.config_path = Some(PathBuf::from(path));
            }
            "--dump-config" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| anyhow::anyhow!("--dump-config needs a path"))?;
                return Ok(Command::DumpConfig(PathBuf::from(path)));
            }
            "--strict" => options.strict = true,
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            other => anyhow::bail!("unknown argument: {other} (try --help)"),
        }
        i += 1;
    }

    Ok(Command::Shell(options))
}

fn init_tracing() -> anyhow::Result<()> {
    // Quiet by default so log lines don't interleave with the shell
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let options = match parse_args(args)? {
        Command::Shell(options) => options,
        Command::DumpConfig(path) => {
            default_demo_toml().save_to_file(&path)?;
            println!("Wrote demo seed to {}", path.display());
            return Ok(());
        }
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Version => {
            println!("ensplit {}", ensplit::VERSION);
            return Ok(());
        }
    };

    init_tracing()?;

    let mut seed = match &options.config_path {
        Some(path) => {
            info!("Loading seed config from {:?}", path);
            SeedConfigToml::load_from_file(path)?
        }
        None => default_demo_toml(),
    };
    if options.strict {
        seed.strict = true;
    }

    let store = seed.into_store();
    info!(
        names = store.list_names().len(),
        mode = ?store.resolver().mode(),
        "store ready"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    cli::Shell::new(store, stdin.lock(), stdout.lock()).run()?;
    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_help() {
    println!("ENSplit v{}", ensplit::VERSION);
    println!("Send one payment to a name; it splits across the name's recipients.");
    println!();
    println!("USAGE:");
    println!("    ensplit [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>         Load names and history from a TOML seed file");
    println!("    --strict                    Fail on incomplete recipients and bad totals");
    println!("    --dump-config <PATH>        Write the built-in demo seed to PATH and exit");
    println!("    -h, --help                  Print help");
    println!("    -V, --version               Print version");
    println!();
    println!("ENVIRONMENT:");
    println!("    RUST_LOG                    Log filter (default: warn)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let Command::Shell(options) = parse_args(&[]).unwrap() else {
            panic!("expected shell");
        };
        assert!(options.config_path.is_none());
        assert!(!options.strict);
    }

    #[test]
    fn test_parse_options() {
        let Command::Shell(options) =
            parse_args(&args(&["--strict", "-c", "seed.toml"])).unwrap()
        else {
            panic!("expected shell");
        };
        assert!(options.strict);
        assert_eq!(options.config_path, Some(PathBuf::from("seed.toml")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["--config"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_parse_exits_early() {
        assert!(matches!(parse_args(&args(&["-h"])).unwrap(), Command::Help));
        assert!(matches!(parse_args(&args(&["-V"])).unwrap(), Command::Version));
        assert!(matches!(
            parse_args(&args(&["--dump-config", "out.toml"])).unwrap(),
            Command::DumpConfig(_)
        ));
    }
}
