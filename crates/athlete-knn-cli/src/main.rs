use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::io::{self, Write};
use std::path::PathBuf;

use athlete_knn::data_handling::FeatureColumn;
use athlete_knn_cli::knn::cross_validate::{run_cross_validation, write_report};
use athlete_knn_cli::knn::input::RunConfig;
use athlete_knn_cli::knn::predict::{prompt_feature_point, run_predict};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(
            env_logger::Env::default().filter_or("ATHLETE_KNN_LOG", "error,athlete_knn=info"),
        )
        .init();

    let matches = Command::new("athlete-knn")
        .version(clap::crate_version!())
        .about("k-nearest-neighbors sport and event prediction from athlete age, height and weight")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            with_common_args(
                Command::new("predict")
                    .about("Predict the sport and recommend an event for one athlete"),
            )
            .arg(feature_arg("age", "Age in years"))
            .arg(feature_arg("height", "Height in centimetres"))
            .arg(feature_arg("weight", "Weight in kilograms")),
        )
        .subcommand(
            with_common_args(
                Command::new("cross-validate")
                    .about("Measure accuracy with leave-one-out cross-validation"),
            )
            .arg(
                Arg::new("parallel")
                    .long("parallel")
                    .help("Evaluate held-out athletes on all cores.")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("sample")
                    .long("sample")
                    .help("Only hold out this many randomly chosen athletes.")
                    .value_parser(clap::value_parser!(usize))
                    .value_hint(ValueHint::Other),
            )
            .arg(
                Arg::new("seed")
                    .long("seed")
                    .help("Seed for --sample.")
                    .value_parser(clap::value_parser!(u64))
                    .value_hint(ValueHint::Other),
            ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("predict", sub_m)) => handle_predict(sub_m),
        Some(("cross-validate", sub_m)) => handle_cross_validate(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn with_common_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("config")
                .help("Path to a JSON run configuration file")
                .required(false)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Path to the athletes CSV file. Overrides the data file \
                     specified in the configuration file.",
                )
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("k")
                .short('k')
                .long("k")
                .help("Number of neighbors that vote.")
                .value_parser(clap::value_parser!(usize))
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("label")
                .long("label")
                .help("Attribute to predict.")
                .value_parser(["sport", "event"])
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("degenerate")
                .long("degenerate")
                .help("How to scale a feature column without variance.")
                .value_parser(["fail", "unit-range"])
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("no_scale")
                .long("no-scale")
                .help("Use raw feature values instead of min-max scaled ones.")
                .action(ArgAction::SetTrue),
        )
}

fn feature_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .allow_negative_numbers(true)
        .value_parser(clap::value_parser!(f64))
        .value_hint(ValueHint::Other)
}

/// Print the default configuration when neither a config nor a data file is given.
fn print_template_if_unconfigured(matches: &ArgMatches) -> Result<bool> {
    if matches.get_one::<PathBuf>("config").is_some()
        || matches.get_one::<String>("data").is_some()
    {
        return Ok(false);
    }
    eprintln!("[athlete-knn] No config file provided; here is a template to start from.");
    println!("{}", serde_json::to_string_pretty(&RunConfig::default())?);
    Ok(true)
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    if print_template_if_unconfigured(matches)? {
        return Ok(());
    }
    let config_path = matches.get_one::<PathBuf>("config");
    let config = RunConfig::from_arguments(config_path.map(PathBuf::as_path), matches)?;

    let known = FeatureColumn::ALL
        .iter()
        .filter_map(|&column| {
            matches
                .get_one::<f64>(column.name())
                .map(|&value| (column, value))
        })
        .collect::<Vec<_>>();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let raw = prompt_feature_point(
        &mut stdin.lock(),
        &mut stdout.lock(),
        &config.knn.features,
        &known,
    )?;

    let mut out = stdout.lock();
    match run_predict(&config, &raw, &mut out) {
        Ok(()) => out.flush().map_err(Into::into),
        Err(e) => {
            log::error!("Prediction failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_cross_validate(matches: &ArgMatches) -> Result<()> {
    if print_template_if_unconfigured(matches)? {
        return Ok(());
    }
    let config_path = matches.get_one::<PathBuf>("config");
    let config = RunConfig::from_arguments(config_path.map(PathBuf::as_path), matches)?;
    log::info!(
        "[athlete-knn] Cross-validating {} with k={}",
        config.data,
        config.knn.k
    );

    match run_cross_validation(&config) {
        Ok(report) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_report(&mut out, &report)?;
            out.flush().map_err(Into::into)
        }
        Err(e) => {
            log::error!("Cross-validation failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
