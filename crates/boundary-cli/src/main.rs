use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use boundary_cli::evaluate::input::RunConfig;
use boundary_cli::evaluate::run::{run_evaluation, summary_lines};
use boundary_eval::config::save_yaml;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("BOUNDARY_LOG", "error,boundary=info"))
        .init();

    let matches = Command::new("boundary")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("Evaluate a binary classifier and plot its decision boundary")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("evaluate")
                .about("Score a linear model on labelled 2-D samples and render the decision boundary")
                .arg(
                    Arg::new("samples")
                        .help("Path to the labelled samples (*.csv or *.tsv)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a YAML run configuration. Defaults are used when omitted.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path of the SVG figure. Overrides the output_file of the configuration.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("report_file")
                        .long("report")
                        .help("Also write an HTML report to this path.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .help("Figure width in pixels.")
                        .value_parser(clap::value_parser!(u32).range(1..)),
                )
                .arg(
                    Arg::new("height")
                        .long("height")
                        .help("Figure height in pixels.")
                        .value_parser(clap::value_parser!(u32).range(1..)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the metrics as JSON instead of text.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Write the default run configuration as YAML")
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Write to this file instead of stdout.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("evaluate", sub_m)) => handle_evaluate(sub_m),
        Some(("config", sub_m)) => handle_config(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_evaluate(matches: &ArgMatches) -> Result<()> {
    let samples_path: &PathBuf = matches
        .get_one("samples")
        .ok_or_else(|| anyhow::anyhow!("Missing samples path"))?;
    let config_path: Option<&PathBuf> = matches.get_one("config");
    log::info!("[boundary::evaluate] Samples: {:?}", samples_path);

    let config = RunConfig::from_arguments(config_path, matches)?;

    match run_evaluation(samples_path, &config) {
        Ok(evaluation) => {
            if matches.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&evaluation.metrics)?);
            } else {
                for line in summary_lines(&config, &evaluation) {
                    println!("{}", line);
                }
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Evaluation failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_config(matches: &ArgMatches) -> Result<()> {
    let config = RunConfig::default();
    match matches.get_one::<PathBuf>("output_file") {
        Some(path) => {
            save_yaml(&config, path)?;
            eprintln!("[boundary::config] Default config written to {:?}", path);
        }
        None => print!("{}", serde_yaml::to_string(&config)?),
    }
    Ok(())
}
