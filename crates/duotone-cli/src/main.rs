//! duotone - expand CSS `light-dark()` into light and dark theme rule sets
//!
//! Commands:
//! - `build`: transform stylesheets once
//! - `watch`: transform, then rebuild whenever a stylesheet changes

mod build;
mod config;
mod watch;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::DuotoneConfig;

/// Expand CSS light-dark() into theme-scoped rule sets
#[derive(Parser, Debug)]
#[command(name = "duotone")]
#[command(about = "Expand CSS light-dark() into light and dark theme rule sets")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./duotone.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transform stylesheets
    Build(BuildArgs),
    /// Transform stylesheets and rebuild them when they change
    Watch(BuildArgs),
}

#[derive(Args, Debug, Default)]
struct BuildArgs {
    /// Stylesheets or directories of stylesheets
    inputs: Vec<PathBuf>,

    /// Output directory (required for more than one stylesheet)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Print without optional whitespace
    #[arg(long)]
    compact: bool,

    /// Keep nested rules instead of flattening them
    #[arg(long)]
    no_flatten: bool,

    /// Skip invalid rules instead of failing the stylesheet
    #[arg(long)]
    recover: bool,
}

impl BuildArgs {
    /// Command-line flags override the configuration file.
    fn apply(self, config: &mut DuotoneConfig) {
        if !self.inputs.is_empty() {
            config.build.inputs = self.inputs;
        }
        if self.out_dir.is_some() {
            config.build.out_dir = self.out_dir;
        }
        if self.compact {
            config.build.style = duotone_css::rules::OutputStyle::Compact;
        }
        if self.no_flatten {
            config.build.flatten_nesting = false;
        }
        if self.recover {
            config.build.recover = true;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir()?;
    let mut config = DuotoneConfig::discover(cli.config.as_deref(), &cwd)?;

    let (args, watching) = match cli.command {
        Command::Build(args) => (args, false),
        Command::Watch(args) => (args, true),
    };
    args.apply(&mut config);

    if config.build.inputs.is_empty() {
        bail!("No input stylesheets given (pass them as arguments or set build.inputs in duotone.toml)");
    }

    let options = config.transform_options();
    let inputs = &config.build.inputs;

    if watching {
        let Some(out_dir) = config.build.out_dir.as_deref() else {
            bail!("watch needs an output directory (-o or build.out_dir)");
        };
        return watch::run(inputs, out_dir, &options);
    }

    let jobs = build::plan(inputs, config.build.out_dir.as_deref())?;
    let report = build::build_all(&jobs, &options);
    report.log();
    report.into_result()
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from the default.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn,duotone_cli=info",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use duotone_css::rules::OutputStyle;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_build_flags() {
        let cli = Cli::try_parse_from([
            "duotone", "-vv", "build", "a.css", "styles", "-o", "dist", "--compact", "--no-flatten",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.inputs, vec![PathBuf::from("a.css"), PathBuf::from("styles")]);
        assert_eq!(args.out_dir, Some(PathBuf::from("dist")));
        assert!(args.compact && args.no_flatten && !args.recover);
    }

    #[test]
    fn flags_override_config() {
        let mut config = DuotoneConfig::default();
        config.build.inputs = vec![PathBuf::from("from-config")];
        config.build.out_dir = Some(PathBuf::from("config-dist"));

        BuildArgs {
            compact: true,
            recover: true,
            ..BuildArgs::default()
        }
        .apply(&mut config);

        assert_eq!(config.build.inputs, vec![PathBuf::from("from-config")]);
        assert_eq!(config.build.out_dir, Some(PathBuf::from("config-dist")));
        assert_eq!(config.build.style, OutputStyle::Compact);
        assert!(config.build.recover);
        assert!(config.build.flatten_nesting);

        BuildArgs {
            inputs: vec![PathBuf::from("cli.css")],
            no_flatten: true,
            ..BuildArgs::default()
        }
        .apply(&mut config);

        assert_eq!(config.build.inputs, vec![PathBuf::from("cli.css")]);
        assert!(!config.build.flatten_nesting);
    }
}
