use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gendercast::{
    extract_gender_features, ClassifierAdapter, FeatureMapping, GenderCastError, Outcome, Shell,
    ShellConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Predict a gender label for a name", long_about = None)]
struct Args {
    /// Model artifact (JSON). Overrides GENDERCAST_MODEL_PATH.
    #[arg(long, global = true, value_name = "PATH")]
    model: Option<PathBuf>,
    /// Use the heuristic stand-in if the model cannot be loaded.
    #[arg(long, global = true)]
    allow_fallback: bool,
    /// Maximum characters read from each name.
    #[arg(long, global = true)]
    max_chars: Option<usize>,
    /// Print labels without emoji.
    #[arg(long, global = true)]
    no_emoji: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict labels for names given as arguments or in a file.
    Predict {
        names: Vec<String>,
        /// File with one name per line.
        #[arg(long, value_name = "FILE", conflicts_with = "names")]
        file: Option<PathBuf>,
        /// Print one JSON object per name.
        #[arg(long)]
        json: bool,
    },
    /// Print the feature mapping for a name as JSON.
    Features { name: String },
    /// Show the model's most informative features.
    Inspect {
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },
    /// Read names from stdin interactively (the default).
    Repl,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = resolve_config(&args, ShellConfig::from_env());

    match args.command.unwrap_or(Command::Repl) {
        Command::Features { name } => features(&name, &config),
        Command::Predict { names, file, json } => {
            let shell = start_shell(config);
            let inputs = match file {
                Some(path) => read_names(&path)
                    .with_context(|| format!("failed to read names from {}", path.display()))?,
                None => names,
            };
            predict(&shell, &inputs, json)
        }
        Command::Inspect { count } => {
            let shell = start_shell(config);
            inspect(&shell, count)
        }
        Command::Repl => {
            let shell = start_shell(config);
            let stdin = io::stdin();
            let summary = shell
                .run_interactive(stdin.lock(), io::stdout())
                .context("interactive session failed")?;
            info!(
                requests = summary.requests,
                predicted = summary.predicted,
                "session ended"
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Command-line flags override `base`, which normally comes from the environment.
fn resolve_config(args: &Args, base: ShellConfig) -> ShellConfig {
    let mut config = base;

    if let Some(path) = &args.model {
        config.model_path = path.clone();
    }
    if args.allow_fallback {
        config.allow_fallback = true;
    }
    if let Some(max) = args.max_chars {
        config.max_name_chars = gendercast::config::clamp_max_name_chars(max);
    }
    if args.no_emoji {
        config.emoji = false;
    }

    config
}

fn start_shell(config: ShellConfig) -> Shell {
    let adapter = ClassifierAdapter::from_config(&config);
    info!(
        model = %config.model_path.display(),
        available = adapter.is_available(),
        fallback = adapter.is_fallback(),
        "gendercast started"
    );
    Shell::new(adapter, config)
}

fn read_names(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut names = Vec::new();
    for line in reader.lines() {
        names.push(line?);
    }
    Ok(names)
}

/// The mapping `predict` would classify for this input, or `None` if it is empty.
fn feature_mapping(name: &str, config: &ShellConfig) -> Option<FeatureMapping> {
    let name = config.normalize_input(name);
    if name.is_empty() {
        return None;
    }
    Some(extract_gender_features(&name))
}

fn features(name: &str, config: &ShellConfig) -> Result<ExitCode> {
    let Some(mapping) = feature_mapping(name, config) else {
        eprintln!("Input cannot be empty. Type a name.");
        return Ok(ExitCode::from(1));
    };

    println!("{}", serde_json::to_string_pretty(&mapping)?);
    Ok(ExitCode::SUCCESS)
}

fn predict(shell: &Shell, inputs: &[String], json: bool) -> Result<ExitCode> {
    let outcomes = shell.predict_batch(inputs);

    for outcome in &outcomes {
        if json {
            println!("{}", serde_json::to_string(&outcome.to_json())?);
        } else {
            println!("{}", shell.render(outcome));
        }
    }

    Ok(ExitCode::from(exit_status(&outcomes)))
}

fn inspect(shell: &Shell, count: usize) -> Result<ExitCode> {
    match shell.adapter().most_informative_features(count) {
        Ok(ranked) => {
            println!("Most informative features");
            for feature in ranked {
                println!(
                    "{:>8} = {:<8} {:>8} : {:<8} = {:>6.1} : 1.0",
                    feature.feature,
                    format!("{:?}", feature.value),
                    feature.favoured.as_str(),
                    feature.disfavoured.as_str(),
                    feature.ratio
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ GenderCastError::ModelUnavailable { .. }) => {
            eprintln!("{err}");
            Ok(ExitCode::from(2))
        }
        Err(err) => {
            eprintln!("{err}");
            Ok(ExitCode::from(1))
        }
    }
}

/// 0 if every name was predicted, 2 if the model is missing, 1 otherwise.
fn exit_status(outcomes: &[Outcome]) -> u8 {
    let unavailable = outcomes
        .iter()
        .any(|o| matches!(o.result, Err(GenderCastError::ModelUnavailable { .. })));

    if unavailable {
        2
    } else if outcomes.iter().all(Outcome::is_success) {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gendercast::{FeatureKey, Label, Prediction};

    fn ok(name: &str, label: &str) -> Outcome {
        Outcome {
            name: name.to_string(),
            result: Ok(Prediction::from_model(Label::from(label))),
        }
    }

    fn failed(name: &str, err: GenderCastError) -> Outcome {
        Outcome {
            name: name.to_string(),
            result: Err(err),
        }
    }

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv.iter().copied()).unwrap()
    }

    #[test]
    fn exit_status_all_predicted() {
        assert_eq!(exit_status(&[ok("Zara", "female"), ok("Peter", "male")]), 0);
        assert_eq!(exit_status(&[]), 0);
    }

    #[test]
    fn exit_status_any_failure() {
        let outcomes = [ok("Zara", "female"), failed("", GenderCastError::EmptyInput)];
        assert_eq!(exit_status(&outcomes), 1);

        let outcomes = [failed("Sam", GenderCastError::ClassifierFailure("boom".into()))];
        assert_eq!(exit_status(&outcomes), 1);
    }

    #[test]
    fn exit_status_unavailable_wins() {
        let outcomes = [
            failed("", GenderCastError::EmptyInput),
            failed("Zara", GenderCastError::unavailable("model file missing")),
            ok("Peter", "male"),
        ];
        assert_eq!(exit_status(&outcomes), 2);
    }

    #[test]
    fn max_chars_flag_is_clamped() {
        let args = parse(&["gendercast", "--max-chars", "0", "predict", "Zara"]);
        let config = resolve_config(&args, ShellConfig::default());
        assert_eq!(config.max_name_chars, 1);

        let args = parse(&["gendercast", "predict", "Zara", "--max-chars", "100000"]);
        let config = resolve_config(&args, ShellConfig::default());
        assert_eq!(config.max_name_chars, 256);
    }

    #[test]
    fn flags_override_environment() {
        let base = ShellConfig::from_lookup(|key| match key {
            "GENDERCAST_EMOJI" => Some("1".to_string()),
            "GENDERCAST_MODEL_PATH" => Some("/srv/env.json".to_string()),
            "GENDERCAST_MAX_NAME_CHARS" => Some("12".to_string()),
            _ => None,
        });
        assert!(base.emoji);

        let args = parse(&[
            "gendercast",
            "--no-emoji",
            "--model",
            "/tmp/cli.json",
            "--allow-fallback",
            "repl",
        ]);
        let config = resolve_config(&args, base);

        assert!(!config.emoji);
        assert!(config.allow_fallback);
        assert_eq!(config.model_path, PathBuf::from("/tmp/cli.json"));
        assert_eq!(config.max_name_chars, 12);
    }

    #[test]
    fn environment_kept_without_flags() {
        let base = ShellConfig::from_lookup(|key| {
            (key == "GENDERCAST_ALLOW_FALLBACK").then(|| "true".to_string())
        });

        let config = resolve_config(&parse(&["gendercast"]), base.clone());
        assert_eq!(config, base);
    }

    #[test]
    fn features_use_the_predict_normalization() {
        let config = ShellConfig {
            max_name_chars: 5,
            ..ShellConfig::default()
        };

        let mapping = feature_mapping(" Alexandra", &config).unwrap();
        assert_eq!(mapping, extract_gender_features("Alex"));
        assert_eq!(mapping.get(FeatureKey::Suffix), "x");

        assert!(feature_mapping("     Anna", &config).is_none());
        assert!(feature_mapping("   ", &ShellConfig::default()).is_none());
    }
}
