//! APK Triage command line front-end.

#![forbid(anonymous_parameters, unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications, unused_results)]

use apk_triage_core::{
    analyze_package, cli, initialize_config, initialize_logger, print_error, ErrorKind, Results,
    RiskTier,
};
use colored::Colorize;
use log::debug;
use std::{path::Path, process::exit};

fn main() {
    let cli = cli::generate_cli().get_matches();

    let config = match initialize_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            initialize_logger(cli.is_present("verbose"), cli.is_present("quiet"));
            print_error(format!("{:#}", e));
            exit(1);
        }
    };
    initialize_logger(config.is_verbose(), config.is_quiet());

    let mut failures = 0;
    for package in cli.values_of("package").into_iter().flatten() {
        match analyze_package(package, &config, &config.cancellation()) {
            Ok(results) => print_summary(&results),
            Err(e) => {
                failures += 1;
                let stage = e
                    .downcast_ref::<ErrorKind>()
                    .and_then(ErrorKind::stage)
                    .map_or_else(String::new, |stage| format!(" in the {} stage", stage));
                print_error(format!(
                    "the analysis of {} failed{}: {:#}",
                    Path::new(package).display(),
                    stage,
                    e
                ));
            }
        }
    }

    if failures > 0 {
        exit(1);
    }
}

/// Prints the tier of an analyzed package.
fn print_summary(results: &Results) {
    let tier = results.risk().tier();
    let text = tier.to_string();
    let tier_text = match tier {
        RiskTier::None => text.green(),
        RiskTier::Low => text.yellow(),
        RiskTier::Medium => text.bright_red(),
        RiskTier::High => text.red().bold(),
    };

    println!(
        "{}: {} findings, risk tier {}",
        results.package_name().italic(),
        results.risk().findings().len(),
        tier_text
    );
    for warning in results.warnings() {
        debug!("{}", warning);
    }
}
