//! UML skeleton code generator - command line entry point
//!
//! Usage:
//!   umbrello-codegen generate --model model.json --language cpp [--output DIR] [--config policy.toml]
//!   umbrello-codegen keywords --language java
//!   umbrello-codegen datatypes --language python
//!   umbrello-codegen languages

mod config;
mod logging;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use umbrello_codegen::naming::reserved_keywords;
use umbrello_codegen::types::TypeMapper;
use umbrello_codegen::{
    CodeGenerationPolicy, CodeGenerator, GenerationObserver, GenerationReport, GenerationStatus,
    Language, OverwriteAnswer, OverwriteChoice, OverwritePolicy, OverwritePrompt,
};
use umbrello_model::Classifier;

use crate::logging::LoggingConfig;

#[derive(Parser, Debug)]
#[clap(name = "umbrello-codegen")]
#[clap(version, about = "Generate skeleton source code from a UML model snapshot")]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[clap(long, global = true)]
    json_logs: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate code for a model snapshot
    Generate(GenerateArgs),
    /// List the reserved words of a language
    Keywords {
        #[clap(short, long, value_enum)]
        language: Language,
    },
    /// List the built-in datatypes of a language
    Datatypes {
        #[clap(short, long, value_enum)]
        language: Language,
    },
    /// List the supported languages
    Languages,
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Model snapshot (JSON)
    #[clap(short, long)]
    model: PathBuf,

    #[clap(short, long, value_enum)]
    language: Language,

    /// Output directory (overrides the policy)
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Policy file (TOML, YAML or JSON)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// What to do with existing files (overrides the policy)
    #[clap(long, value_enum)]
    overwrite: Option<OverwritePolicy>,

    /// Classifier id or name to generate; repeatable, all when omitted
    #[clap(long = "classifier")]
    classifiers: Vec<String>,

    /// Directory with heading templates; enables headings
    #[clap(long)]
    headings: Option<PathBuf>,
}

impl GenerateArgs {
    fn apply_to(&self, policy: &mut CodeGenerationPolicy) {
        if let Some(output) = &self.output {
            policy.output_directory = output.clone();
        }
        if let Some(overwrite) = self.overwrite {
            policy.overwrite_policy = overwrite;
        }
        if let Some(headings) = &self.headings {
            policy.headings_directory = headings.clone();
            policy.include_headings = true;
        }
    }
}

/// Asks on stderr, reads the answer from stdin
struct TerminalPrompt;

impl OverwritePrompt for TerminalPrompt {
    fn ask(&mut self, existing: &Path) -> OverwriteAnswer {
        let mut stdin = io::stdin().lock();
        loop {
            eprint!(
                "{} exists. [o]verwrite, [r]ename, [c]ancel (uppercase applies to all): ",
                existing.display()
            );
            let _ = io::stderr().flush();

            let mut line = String::new();
            match stdin.read_line(&mut line) {
                // closed stdin cancels
                Ok(0) | Err(_) => {
                    return OverwriteAnswer {
                        choice: OverwriteChoice::Cancel,
                        apply_to_all: true,
                    }
                }
                Ok(_) => {}
            }
            if let Some(answer) = parse_answer(line.trim()) {
                return answer;
            }
        }
    }
}

fn parse_answer(input: &str) -> Option<OverwriteAnswer> {
    let first = input.chars().next()?;
    let choice = match first.to_ascii_lowercase() {
        'o' => OverwriteChoice::Overwrite,
        'r' => OverwriteChoice::Rename,
        'c' => OverwriteChoice::Cancel,
        _ => return None,
    };
    Some(OverwriteAnswer {
        choice,
        apply_to_all: first.is_ascii_uppercase(),
    })
}

/// Prints every written file
struct ConsoleObserver;

impl GenerationObserver for ConsoleObserver {
    fn code_generated(&mut self, classifier: &Classifier, success: bool) {
        if !success {
            eprintln!("failed: {}", classifier.name);
        }
    }

    fn file_written(&mut self, path: &Path) {
        println!("{}", path.display());
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init_logging(&LoggingConfig::from_verbosity(args.verbose, args.json_logs)) {
        eprintln!("Failed to initialize logging: {e:#}");
    }

    match run(args.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> anyhow::Result<ExitCode> {
    match command {
        Command::Generate(args) => generate(args),
        Command::Keywords { language } => {
            for keyword in reserved_keywords(language) {
                println!("{keyword}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Datatypes { language } => {
            let mapper = TypeMapper::new(language, &CodeGenerationPolicy::default());
            for datatype in mapper.default_datatypes() {
                println!("{datatype}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Languages => {
            for language in Language::ALL {
                println!("{}\t{}", language.id(), language.name());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn generate(args: GenerateArgs) -> anyhow::Result<ExitCode> {
    let mut policy = config::load_policy(args.config.as_deref())?;
    args.apply_to(&mut policy);

    let generator = CodeGenerator::from_file(&args.model, policy, args.language)
        .with_context(|| format!("Failed to load model {}", args.model.display()))?;

    tracing::info!(
        model = %args.model.display(),
        language = %args.language,
        output = %generator.policy().output_directory.display(),
        "Starting code generation"
    );

    let mut observer = ConsoleObserver;
    let report = if args.classifiers.is_empty() {
        generator.generate_all(&mut observer, Box::new(TerminalPrompt))
    } else {
        generator
            .generate(&args.classifiers, &mut observer, Box::new(TerminalPrompt))
            .context("Failed to select classifiers")?
    };

    print_summary(&report);
    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_summary(report: &GenerationReport) {
    for outcome in &report.outcomes {
        match &outcome.status {
            GenerationStatus::Failed { reason } => eprintln!("{}: {}", outcome.name, reason),
            GenerationStatus::Skipped { reason } => {
                tracing::info!(classifier = %outcome.name, %reason, "skipped")
            }
            GenerationStatus::Generated { .. } => {}
        }
    }
    eprintln!(
        "{} generated, {} skipped, {} failed{}",
        report.generated(),
        report.skipped(),
        report.failed(),
        if report.stopped_early { " (stopped)" } else { "" }
    );
}
