//! Simple CLI for metric expression evaluation.
//!
//! Evaluates metric paths and formulas against an evaluation-context JSON
//! document, for inspecting report expressions outside the dashboard.

use clap::{Parser, Subcommand};
use metricpath::{
    EvaluationContext, FormulaEvaluator, evaluate_formula, evaluate_metric, tokenize,
};
use serde_json::from_str as parse_json;
use std::fs;
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(name = "metricpath")]
#[command(about = "Evaluate metric expressions against a session context")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula expression against a context
    Evaluate {
        /// Formula expression, e.g. "current - previous"
        expression: String,
        /// JSON file with the evaluation context (stdin if not provided)
        #[arg(short, long)]
        file: Option<String>,
        /// Target metric path for context variables, e.g. "leftLeg.peakFlexion"
        #[arg(short, long)]
        target: Option<String>,
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Resolve a plain metric path against a context
    Resolve {
        /// Metric path, e.g. "leftLeg.peakFlexion" or "opiScore"
        path: String,
        /// JSON file with the evaluation context (stdin if not provided)
        #[arg(short, long)]
        file: Option<String>,
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Validate an expression's syntax without evaluating it
    Parse {
        /// Formula expression to check
        expression: String,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Evaluate {
            expression,
            file,
            target,
            pretty,
        } => {
            let context = read_context(file.as_deref());
            let result = evaluate_formula(&expression, &context, target.as_deref());
            print_result(&result, pretty);
            if !result.success {
                process::exit(1);
            }
        }
        Commands::Resolve { path, file, pretty } => {
            let context = read_context(file.as_deref());
            let result = evaluate_metric(&path, &context);
            print_result(&result, pretty);
            if !result.success {
                process::exit(1);
            }
        }
        Commands::Parse { expression } => {
            for token in tokenize(&expression) {
                println!("{token:?}");
            }
            if let Err(e) = FormulaEvaluator::check(&expression) {
                eprintln!("Syntax error: {e}");
                process::exit(1);
            }
        }
    }
}

fn read_context(file: Option<&str>) -> EvaluationContext {
    let data = match file {
        Some(filename) => match fs::read_to_string(filename) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{filename}': {e}");
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {e}");
                process::exit(1);
            }
            buffer
        }
    };

    match parse_json(&data) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("Error parsing context JSON: {e}");
            process::exit(1);
        }
    }
}

fn print_result(result: &metricpath::EvaluatedValue, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    };
    match rendered {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing result: {e}");
            process::exit(1);
        }
    }
}
