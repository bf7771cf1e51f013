// src/main.rs

use clap::Parser;
use log::info;
use std::error::Error;
use std::fs;

use burst_analysis::cli::{Args, MeasureSelection};
use burst_analysis::comparison::GroupComparison;
use burst_analysis::crate_version;
use burst_analysis::data_input::recording_loader::CsvRecordingLoader;
use burst_analysis::plot_functions::plot_cdf_comparison::plot_cdf_comparison;
use burst_analysis::plot_functions::plot_relative_frequency::plot_relative_frequency;
use burst_analysis::report;

/// Exit code when any group or measure stage failed.
const EXIT_STAGE_FAILURE: i32 = 2;
/// Exit code for configuration, load and I/O failures.
const EXIT_LOAD_FAILURE: i32 = 1;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    println!("burst-analysis {}", crate_version());

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {err}", err.kind());
            std::process::exit(EXIT_LOAD_FAILURE);
        }
    };
    if let Some(path) = &args.write_config {
        fs::write(path, config.to_toml_string()?)?;
        println!("Effective configuration written to {}", path.display());
    }

    println!("\n--- Analysing {} vs {} ---", args.eki.display(), args.wt.display());
    let loader = CsvRecordingLoader::new(&args.eki, &args.wt, config.header_lines);
    let report = GroupComparison::new(&config).run(&loader);

    if args.print_data {
        report::print_data(&report);
    }
    match args.print_measure {
        Some(MeasureSelection::All) => report::print_all_measures(&report),
        Some(MeasureSelection::One(measure)) => report::print_specific(&report, measure),
        None => {}
    }
    report::print_quantile_table(&report);
    report::print_comparisons(&report);

    if args.plots {
        fs::create_dir_all(&args.output_dir)?;
        let root_name = args.root_name();
        println!("\n--- Generating Plots ---");
        plot_cdf_comparison(&report, &config, &args.output_dir, &root_name)?;
        plot_relative_frequency(&report, &config, &args.output_dir, &root_name)?;
    }

    if let Some(path) = &args.json {
        report::write_json_summary(&report, path)?;
    }

    if report.has_failures() {
        report::print_failures(&report);
        let code = if report.has_load_failures() {
            EXIT_LOAD_FAILURE
        } else {
            EXIT_STAGE_FAILURE
        };
        info!("{} stage(s) failed.", report.failures.len());
        std::process::exit(code);
    }
    Ok(())
}

// src/main.rs
