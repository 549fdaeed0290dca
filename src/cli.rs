//! Command line interface.

use clap::{crate_version, App, Arg};

/// Generates the command line interface.
pub fn generate_cli() -> App<'static, 'static> {
    App::new("APK Triage")
        .version(crate_version!())
        .about("Static triage of Android packages: finds suspicious signals and packs the evidence")
        .arg(
            Arg::with_name("package")
                .help("Package archives (.apk) to analyze")
                .value_name("PACKAGE")
                .required(true)
                .multiple(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .conflicts_with("quiet")
                .help("If you'd like the analyzer to talk more than necessary"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help(
                    "If you'd like a zen analyzer. Only warnings, errors and findings will be shown",
                ),
        )
        .arg(
            Arg::with_name("threads")
                .short("t")
                .long("threads")
                .value_name("THREADS")
                .takes_value(true)
                .help("Number of threads of the code scan"),
        )
        .arg(
            Arg::with_name("results")
                .long("results")
                .value_name("RESULTS")
                .takes_value(true)
                .help("Folder where the results, images and bundles are stored"),
        )
        .arg(
            Arg::with_name("work-dir")
                .long("work-dir")
                .value_name("WORK_DIR")
                .takes_value(true)
                .help("Folder where packages are extracted while they are analyzed"),
        )
        .arg(
            Arg::with_name("rules")
                .long("rules")
                .value_name("RULES")
                .takes_value(true)
                .help("JSON file replacing the built-in category rules"),
        )
        .arg(
            Arg::with_name("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .takes_value(true)
                .help("Cancels the analysis of a package after the given seconds"),
        )
        .arg(
            Arg::with_name("no-images")
                .long("no-images")
                .help("Does not extract images"),
        )
        .arg(
            Arg::with_name("no-manifest")
                .long("no-manifest")
                .help("Does not analyze the manifest"),
        )
        .arg(
            Arg::with_name("no-code")
                .long("no-code")
                .help("Does not scan the contents of the files"),
        )
        .arg(
            Arg::with_name("no-resources")
                .long("no-resources")
                .help("Does not list the resources"),
        )
        .arg(
            Arg::with_name("no-bundle")
                .long("no-bundle")
                .help("Does not create the evidence bundle"),
        )
        .arg(
            Arg::with_name("no-json")
                .long("no-json")
                .help("Does not write the JSON results"),
        )
        .arg(
            Arg::with_name("xml-manifest")
                .long("xml-manifest")
                .help("Parses the manifest as plain text XML instead of matching patterns"),
        )
}
