use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use fileclass_core::{
    resolve_base_dir, starter_rules, validate_rules, ApplyOptions, ClassificationEngine,
    ClassificationManager, ClassificationReport, ClassificationResult, ClassificationRule,
    Config, FileclassError, Result, RuleStore, RulesDocument,
};

mod args;
use args::{Cli, Commands, ConfigAction, RulesAction, Shell};

const LOG_ENV: &str = "FILECLASS_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = resolve_base_dir(cli.base_dir).and_then(|base_dir| {
        let rules = cli.rules.as_deref();
        match cli.command {
            Some(Commands::Classify {
                paths,
                json,
                no_content,
            }) => handle_classify(&base_dir, rules, &paths, json, no_content),
            Some(Commands::Scan {
                dir,
                no_recursive,
                apply,
                target,
                dry_run,
                json,
            }) => {
                let apply = match (apply, target) {
                    (true, Some(target_root)) => Some(ApplyOptions {
                        target_root,
                        dry_run,
                    }),
                    _ => None,
                };
                handle_scan(&base_dir, rules, &dir, !no_recursive, apply, json)
            }
            Some(Commands::Rules { action }) => handle_rules(action, &base_dir, rules),
            Some(Commands::Config { action }) => handle_config(action, &base_dir),
            Some(Commands::Completions { shell }) => {
                handle_completions(shell);
                Ok(())
            }
            None => {
                Cli::command().print_help().ok();
                Ok(())
            }
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Log filter: `FILECLASS_LOG` if set, otherwise derived from -v / -q
fn init_tracing(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(format!("fileclass_core={level},fileclass={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "fileclass", &mut io::stdout());
}

/// Rule file: --rules > config > default
fn rules_file(base_dir: &Path, rules: Option<&Path>) -> Result<PathBuf> {
    match rules {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Config::load(base_dir)?.classifier_for(base_dir).rules_file),
    }
}

fn load_engine(
    base_dir: &Path,
    rules: Option<&Path>,
    no_content: bool,
) -> Result<ClassificationEngine> {
    let mut config = Config::load(base_dir)?.classifier_for(base_dir);
    if let Some(path) = rules {
        config.rules_file = path.to_path_buf();
    }
    if no_content {
        config.enable_content_analysis = false;
    }

    let mut engine = ClassificationEngine::new(config);
    engine.initialize()?;
    Ok(engine)
}

fn handle_classify(
    base_dir: &Path,
    rules: Option<&Path>,
    paths: &[PathBuf],
    json: bool,
    no_content: bool,
) -> Result<()> {
    let mut engine = load_engine(base_dir, rules, no_content)?;
    let threshold = engine.config().default_confidence_threshold;

    let results: Vec<(PathBuf, ClassificationResult)> = paths
        .iter()
        .map(|p| (p.clone(), engine.classify_file(p, None)))
        .collect();

    if json {
        let value: Vec<_> = results
            .iter()
            .map(|(path, result)| serde_json::json!({ "path": path, "result": result }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for (path, result) in &results {
        println!();
        println!("{}", path.display().to_string().bold());
        print_result(result, threshold);
    }
    println!();
    Ok(())
}

fn print_result(result: &ClassificationResult, threshold: f64) {
    let category = match &result.subcategory {
        Some(sub) => format!("{}/{}", result.category, sub),
        None => result.category.clone(),
    };
    println!("  {:<12} {}", "category:".dimmed(), category.cyan());
    println!("  {:<12} {}", "suggested:".dimmed(), result.suggested_path);
    println!(
        "  {:<12} {}",
        "confidence:".dimmed(),
        format_confidence(result.confidence, threshold)
    );
    for reason in &result.reasoning {
        println!("    {} {}", "-".dimmed(), reason.dimmed());
    }
}

fn format_confidence(confidence: f64, threshold: f64) -> colored::ColoredString {
    let text = format!("{:.2}", confidence);
    if confidence >= threshold {
        text.green()
    } else {
        text.yellow()
    }
}

fn handle_scan(
    base_dir: &Path,
    rules: Option<&Path>,
    dir: &Path,
    recursive: bool,
    apply: Option<ApplyOptions>,
    json: bool,
) -> Result<()> {
    let engine = load_engine(base_dir, rules, false)?;
    let threshold = engine.config().default_confidence_threshold;
    let mut manager = ClassificationManager::new(engine);

    let report = manager.classify_directory(dir, recursive, apply.as_ref())?;

    if json {
        let value = serde_json::json!({ "report": report, "stats": manager.stats() });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_report(&report, dir, threshold, apply.as_ref());

    let stats = manager.stats();
    println!();
    println!(
        "{} {} files, average confidence {:.2}, {} applied, {} for review",
        "Summary:".cyan().bold(),
        stats.total_classified,
        stats.average_confidence,
        stats.auto_applied,
        stats.manual_review
    );
    Ok(())
}

fn print_report(
    report: &ClassificationReport,
    dir: &Path,
    threshold: f64,
    apply: Option<&ApplyOptions>,
) {
    println!();
    for outcome in &report.outcomes {
        let shown = outcome.path.strip_prefix(dir).unwrap_or(&outcome.path);
        let mut line = format!(
            "[{}] {:<16} {} -> {}",
            format_confidence(outcome.result.confidence, threshold),
            outcome.result.category,
            shown.display(),
            outcome.result.suggested_path
        );
        if let Some(dest) = &outcome.destination {
            let verb = if apply.is_some_and(|a| a.dry_run) {
                "would move"
            } else {
                "moved"
            };
            line.push_str(&format!(" ({} to {})", verb, dest.display()));
        }
        println!("{}", line);
    }

    let mut counts: Vec<_> = report.category_counts().into_iter().collect();
    counts.sort();
    println!();
    println!("{}", "Categories:".cyan().bold());
    for (category, count) in counts {
        println!("  {:<16} {}", category, count);
    }

    let review = report.below_threshold(threshold);
    if !review.is_empty() {
        println!();
        println!(
            "{} {} file(s) below {:.2}",
            "Review:".yellow().bold(),
            review.len(),
            threshold
        );
    }
}

fn handle_rules(action: RulesAction, base_dir: &Path, rules: Option<&Path>) -> Result<()> {
    let path = rules_file(base_dir, rules)?;

    match action {
        RulesAction::List => {
            let store = RuleStore::load(&path);
            println!();
            println!("{} {}", "Rules:".cyan().bold(), path.display().to_string().dimmed());
            for rule in store.rules() {
                print_rule_line(rule);
            }
            println!();
        }
        RulesAction::Show { name } => {
            let store = RuleStore::load(&path);
            let rule = store
                .get(&name)
                .ok_or(FileclassError::RuleNotFound { name })?;
            println!("{}", serde_json::to_string_pretty(rule)?);
        }
        RulesAction::Find { query } => {
            let store = RuleStore::load(&path);
            let found = store.find_rules(&query);
            if found.is_empty() {
                println!("No rules match: {}", query);
            }
            for rule in found {
                print_rule_line(rule);
            }
        }
        RulesAction::Validate { file } => {
            let file = file.unwrap_or(path);
            let content = std::fs::read_to_string(&file)?;
            let doc: RulesDocument = serde_json::from_str(&content)?;
            let report = validate_rules(&doc.rules);

            for warning in &report.warnings {
                println!("{} {}", "[WARN]".yellow().bold(), warning);
            }
            if !report.is_valid() {
                return Err(FileclassError::InvalidRules {
                    errors: report.errors,
                });
            }
            println!(
                "{} {} rule(s) in {}",
                "Valid:".green(),
                doc.rules.len(),
                file.display()
            );
        }
        RulesAction::Init { force } => {
            if path.exists() && !force {
                println!(
                    "{} {} (use --force to overwrite)",
                    "Exists:".yellow(),
                    path.display()
                );
                return Ok(());
            }
            let mut store = RuleStore::with_rules(&path, Vec::new());
            store.save(starter_rules())?;
            println!(
                "{} {} ({} rules)",
                "Initialized:".green(),
                path.display(),
                store.len()
            );
        }
        RulesAction::Add {
            name,
            pattern,
            target,
            confidence,
            content_patterns,
        } => {
            let mut store = RuleStore::load(&path);
            let rule = ClassificationRule::new(&name, pattern, target, confidence)
                .with_content_patterns(content_patterns);
            store.add_rule(rule)?;
            println!("{} {}", "Added:".green(), name);
        }
        RulesAction::Remove { name } => {
            let mut store = RuleStore::load(&path);
            let removed = store.delete_rule(&name)?;
            println!("{} {}", "Removed:".green(), removed.name);
        }
        RulesAction::Stats => {
            let stats = RuleStore::load(&path).statistics();
            println!();
            println!("{} {}", "Rule file:".cyan().bold(), stats.rules_file.display());
            println!("{} {}", "Total rules:".cyan().bold(), stats.total_rules);
            println!("{}", "By category:".cyan().bold());
            for (category, count) in &stats.categories {
                println!("  {:<16} {}", category, count);
            }
            let d = stats.confidence_distribution;
            println!(
                "{} low {} / medium {} / high {}",
                "Confidence:".cyan().bold(),
                d.low,
                d.medium,
                d.high
            );
            println!();
        }
    }

    Ok(())
}

fn print_rule_line(rule: &ClassificationRule) {
    println!(
        "  {:<24} {:<20} {:<18} {:.2}",
        rule.name.bold(),
        rule.pattern.yellow(),
        rule.target_path.cyan(),
        rule.confidence
    );
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(FileclassError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
