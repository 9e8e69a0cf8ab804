mod report;

use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use alsmix_core::analysis::{detect_issues, score_project};
use alsmix_core::config::Config;
use alsmix_core::dispatch::{apply_changes, read_batch, Outcome};
use alsmix_core::document::{derive_output_path, Document};
use alsmix_core::project::read_project;

const USAGE: &str = "\
Usage: alsmix [-v|--verbose] <command> ...

Commands:
  inspect <file.als>                          List tracks, devices and detected issues
  apply <file.als> <changes.json> [out.als]   Apply a change batch; output defaults to <file>-modified.als
  score <file.als>                            Score the mix against common mixing practice";

fn init_logging(verbose: bool) {
    use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("alsmix")
        .join("alsmix.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path)
        .or_else(|_| File::create(std::env::temp_dir().join("alsmix.log")))
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("warning: logging disabled, cannot create log file: {}", e);
            return;
        }
    };

    if let Err(e) = WriteLogger::init(log_level, LogConfig::default(), log_file) {
        eprintln!("warning: logging disabled: {}", e);
        return;
    }

    log::info!("alsmix starting (log level: {:?})", log_level);
}

fn usage() -> ExitCode {
    eprintln!("{}", USAGE);
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose_flag = args.iter().any(|a| a == "--verbose" || a == "-v");
    let positional: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| *a != "--verbose" && *a != "-v")
        .collect();

    let config = Config::load();
    init_logging(verbose_flag || config.verbose());

    let result = match positional.as_slice() {
        ["inspect", input] => inspect(Path::new(input)),
        ["score", input] => score(Path::new(input)),
        ["apply", input, changes] => apply(&config, Path::new(input), Path::new(changes), None),
        ["apply", input, changes, output] => apply(
            &config,
            Path::new(input),
            Path::new(changes),
            Some(Path::new(output)),
        ),
        _ => return usage(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn inspect(input: &Path) -> Result<(), Box<dyn Error>> {
    let doc = Document::open(input)?;
    let snapshot = read_project(&doc)?;
    let issues = detect_issues(&snapshot);
    println!("{}", report::format_project(&snapshot, &issues));
    Ok(())
}

fn score(input: &Path) -> Result<(), Box<dyn Error>> {
    let doc = Document::open(input)?;
    let snapshot = read_project(&doc)?;
    let score = score_project(&snapshot);
    println!("{}", report::format_score(&snapshot, &score));
    Ok(())
}

fn apply(
    config: &Config,
    input: &Path,
    changes_path: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let mut doc = Document::open(input)?;
    let batch = read_batch(changes_path)?;

    if batch.changes.is_empty() {
        println!("No changes to apply.");
        return Ok(());
    }

    println!("Applying {} changes...", batch.changes.len());
    let report = apply_changes(&mut doc, &batch.changes);
    for result in &report.results {
        match &result.outcome {
            Ok(Outcome::Applied(desc)) => println!("  {}", desc),
            Ok(Outcome::Skipped) => {}
            Err(e) => eprintln!("ERROR: {}", e),
        }
    }

    let output = output.map_or_else(
        || derive_output_path(input, config.output_suffix()),
        Path::to_path_buf,
    );
    doc.save(&output, config.compression_level())?;

    println!();
    println!("Written to: {}", output.display());
    println!("Applied {} changes successfully.", report.applied_count());
    let failed = report.error_count();
    if failed > 0 {
        println!("{} changes failed.", failed);
    }
    Ok(())
}
