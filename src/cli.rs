//! Command-line interface: local developer entry point over the library's
//! three contracts. Reads a file (or stdin), resolves the language from an
//! explicit tag or the file extension, and prints JSON or a terminal
//! summary.

use crate::config::AnalysisConfig;
use crate::core::{Language, Severity};
use crate::engine::DefectAnalyzer;
use crate::risk;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "defectlens")]
#[command(about = "Static code analysis and defect risk scoring", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full defect analysis (rules + classifier + fused score)
    Analyze {
        /// Source file to analyze (stdin when omitted)
        path: Option<PathBuf>,

        /// Language tag (python, javascript, typescript, java, cpp, go);
        /// inferred from the file extension when omitted
        #[arg(short, long)]
        language: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Optional TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Extract the structural model (functions, classes, imports)
    Parse {
        /// Source file to parse (stdin when omitted)
        path: Option<PathBuf>,

        /// Language tag; inferred from the file extension when omitted
        #[arg(short, long)]
        language: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Compute size and complexity metrics
    Metrics {
        /// Source file to measure (stdin when omitted)
        path: Option<PathBuf>,

        /// Language tag; inferred from the file extension when omitted
        #[arg(short, long)]
        language: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

#[derive(Serialize)]
struct AnalyzeReport {
    #[serde(flatten)]
    prediction: crate::core::DefectPrediction,
    severity_summary: BTreeMap<Severity, usize>,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            path,
            language,
            format,
            config,
        } => {
            let code = read_source(path.as_deref())?;
            let language = resolve_language(language.as_deref(), path.as_deref())?;
            let config = load_config(config.as_deref())?;
            let engine = DefectAnalyzer::with_config(config)?;

            let prediction = engine.analyze(&code, language);
            let report = AnalyzeReport {
                severity_summary: risk::summarize(&prediction.flagged_sections),
                prediction,
            };

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Terminal => print_analysis(&report),
            }
        }
        Commands::Parse {
            path,
            language,
            format,
        } => {
            let code = read_source(path.as_deref())?;
            let language = resolve_language(language.as_deref(), path.as_deref())?;
            let result = crate::parse(&code, language);

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Terminal => {
                    println!("language: {}", result.language);
                    println!("functions: {}", result.functions.len());
                    println!("classes: {}", result.classes.len());
                    println!("imports: {}", result.imports.len());
                    println!("complexity: {}", result.complexity_score);
                    for error in &result.errors {
                        println!("note: {error}");
                    }
                }
            }
        }
        Commands::Metrics {
            path,
            language,
            format,
        } => {
            let code = read_source(path.as_deref())?;
            let language = resolve_language(language.as_deref(), path.as_deref())?;
            let record = crate::metrics::metrics(&code, language);

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                OutputFormat::Terminal => {
                    println!("total lines:    {}", record.total_lines);
                    println!("code lines:     {}", record.code_lines);
                    println!("blank lines:    {}", record.blank_lines);
                    println!("comment lines:  {}", record.comment_lines);
                    println!("functions:      {}", record.function_count);
                    println!("classes:        {}", record.class_count);
                    println!("imports:        {}", record.import_count);
                    println!("complexity:     {}", record.complexity_score);
                    println!("avg fn length:  {:.1}", record.avg_function_length);
                }
            }
        }
    }

    Ok(())
}

fn read_source(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .context("failed to read stdin")?;
            Ok(code)
        }
    }
}

fn resolve_language(tag: Option<&str>, path: Option<&std::path::Path>) -> Result<Language> {
    if let Some(tag) = tag {
        return Language::from_tag(tag)
            .with_context(|| format!("unknown language tag '{tag}'"));
    }
    if let Some(path) = path {
        if let Some(language) = Language::from_path(path) {
            return Ok(language);
        }
    }
    bail!("language could not be inferred; pass --language")
}

fn load_config(path: Option<&std::path::Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("invalid config {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn print_analysis(report: &AnalyzeReport) {
    println!(
        "risk: {} ({:.3}, confidence {:.1})",
        report.prediction.risk_level, report.prediction.risk_score, report.prediction.confidence
    );

    let counts: Vec<String> = report
        .severity_summary
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(severity, count)| format!("{severity}: {count}"))
        .collect();
    if !counts.is_empty() {
        println!("findings: {}", counts.join(", "));
    }

    for section in &report.prediction.flagged_sections {
        println!(
            "  line {:>4} [{}] {} ({})",
            section.line, section.severity, section.issue, section.rule_id
        );
    }

    for issue in report
        .prediction
        .issues_detected
        .iter()
        .filter(|issue| issue.contains("Line too long") || issue.contains("Deep nesting") || issue.contains("Complex boolean"))
    {
        println!("  smell: {issue}");
    }
}
