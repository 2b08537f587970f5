// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

// adastat is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// adastat is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with adastat. If not, see <https://www.gnu.org/licenses/>.

//! The `adastat` command-line surface: argument parsing, per-file
//! scheduling over `rayon`, and diagnostic reporting. The library crate
//! here is split out from `main.rs` only so the CLI itself is unit
//! testable without spawning a process.

use adastat_checkers::Registry;
use adastat_errors::{Diagnostic, Handler, ToolError};
use adastat_eval::{Budget, Evaluator, EvaluatorConfig, MergePredicate};
use adastat_ir::Program;
use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "adastat", version, about = "Abstract-interpretation static analyzer for an Ada-like imperative language")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Runs the fixpoint analysis and checker pass over one or more IR files.
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// IR files to analyze, one JSON-encoded `Program` per file.
    #[arg(long = "files", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Project root, used only to make reported paths relative; has no
    /// effect on the analysis itself (front-end/project layout is out of
    /// scope here).
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Checkers to run; repeatable. Defaults to every checker this build
    /// registers.
    #[arg(long = "checker")]
    pub checkers: Vec<String>,

    /// Accepted for interface compatibility with a front end that names a
    /// type-resolution strategy; this build has exactly one.
    #[arg(long, default_value = "default_robust")]
    pub typer: String,

    #[arg(long, default_value = "default")]
    pub type_interpreter: String,

    #[arg(long, value_enum, default_value = "unknown")]
    pub call_strategy: CallStrategy,

    /// `always` or `bounded:<N>`.
    #[arg(long, default_value = "always")]
    pub merge_predicate: String,

    #[arg(long, value_enum, default_value = "line")]
    pub format: OutputFormat,

    #[arg(long, default_value_t = 10_000)]
    pub max_iterations: usize,

    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Exit non-zero when any file's analysis hits its iteration/time
    /// budget before converging, instead of only warning about it.
    #[arg(long)]
    pub strict_budget: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum CallStrategy {
    Unknown,
    Topdown,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Line,
    Json,
}

#[derive(Serialize)]
struct DiagnosticRecord<'a> {
    file: &'a str,
    line: u32,
    column: u32,
    procedure: &'a str,
    kind: String,
    gravity: String,
    message: &'a str,
}

impl RunArgs {
    fn parsed_merge_predicate(&self) -> anyhow::Result<MergePredicate> {
        if self.merge_predicate == "always" {
            return Ok(MergePredicate::Always);
        }
        match self.merge_predicate.strip_prefix("bounded:") {
            Some(n) => {
                let n: usize = n.parse().with_context(|| format!("invalid merge predicate `{}`", self.merge_predicate))?;
                Ok(MergePredicate::Bounded(n))
            }
            None => anyhow::bail!("invalid --merge-predicate `{}` (expected `always` or `bounded:<N>`)", self.merge_predicate),
        }
    }

    fn registry(&self) -> Registry {
        if self.checkers.is_empty() {
            return Registry::full();
        }
        let mut registry = Registry::new();
        let candidates: Vec<(&'static str, Box<dyn adastat_checkers::Checker>)> = vec![
            ("null-dereference", Box::new(adastat_checkers::NullDerefChecker)),
            ("contract", Box::new(adastat_checkers::ContractChecker)),
            ("same-operands", Box::new(adastat_checkers::SameOperandsChecker)),
            ("duplicate-test", Box::new(adastat_checkers::DuplicateTestChecker)),
        ];
        for (name, checker) in candidates {
            if self.checkers.iter().any(|c| c == name) {
                registry.register(checker);
            }
        }
        registry
    }
}

/// Analyzes every `run_args.files` entry (in parallel via `rayon`), prints
/// findings in the requested format, and returns the process exit code.
pub fn run(args: RunArgs) -> anyhow::Result<i32> {
    if args.typer != "default_robust" && args.typer != "default" {
        anyhow::bail!("unknown --typer `{}`", args.typer);
    }
    if args.type_interpreter != "default" {
        anyhow::bail!("unknown --type-interpreter `{}`", args.type_interpreter);
    }
    if matches!(args.call_strategy, CallStrategy::Topdown) {
        tracing::warn!("--call-strategy topdown requested, but interprocedural analysis is out of scope for this build; falling back to unknown");
    }

    let merge_predicate = args.parsed_merge_predicate()?;
    let config = EvaluatorConfig { merge_predicate, max_rounds: args.max_iterations, ..EvaluatorConfig::default() };
    let timeout = args.timeout_ms.map(Duration::from_millis);

    // Each file gets its own `Registry`: its checkers are zero-sized and
    // cheap to rebuild, and a fresh instance per closure sidesteps needing
    // `Checker` trait objects to be `Sync` just to share one across
    // `rayon`'s worker threads.
    let outcomes: Vec<anyhow::Result<FileOutcome>> = args.files.par_iter().map(|path| analyze_file(path, &config, args.max_iterations, timeout, &args.registry())).collect();

    let mut exit_code = 0;
    let mut all_diagnostics = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(file_outcome) => {
                if file_outcome.incomplete && args.strict_budget {
                    exit_code = 1;
                }
                all_diagnostics.extend(file_outcome.diagnostics);
            }
            Err(e) => {
                eprintln!("error: {e:#}");
                exit_code = 1;
            }
        }
    }

    match args.format {
        OutputFormat::Line => {
            for d in &all_diagnostics {
                println!("{}", d.render_line());
            }
        }
        OutputFormat::Json => {
            for d in &all_diagnostics {
                let record = DiagnosticRecord {
                    file: &d.span.file,
                    line: d.span.start.line,
                    column: d.span.start.column,
                    procedure: &d.enclosing_procedure,
                    kind: d.kind.to_string(),
                    gravity: d.gravity.to_string(),
                    message: &d.message,
                };
                println!("{}", serde_json::to_string(&record)?);
            }
        }
    }

    Ok(exit_code)
}

struct FileOutcome {
    diagnostics: Vec<Diagnostic>,
    incomplete: bool,
}

fn analyze_file(path: &PathBuf, config: &EvaluatorConfig, max_iterations: usize, timeout: Option<Duration>, registry: &Registry) -> anyhow::Result<FileOutcome> {
    let span = tracing::info_span!("analyze_file", file = %path.display());
    let _enter = span.enter();

    let text = std::fs::read_to_string(path).map_err(|source| ToolError::Io { path: path.display().to_string(), source })?;
    let mut program: Program = {
        let _span = tracing::info_span!("load_ir").entered();
        serde_json::from_str(&text).map_err(|e| ToolError::MalformedIr(e.to_string()))?
    };

    let handler = Handler::new();
    let mut diagnostics = Vec::new();
    let mut incomplete = false;

    for procedure in &mut program.procedures {
        {
            let _span = tracing::info_span!("interpret_types", procedure = %procedure.name).entered();
            adastat_eval::universal::rewrite_universal_types(procedure);
        }

        let result = {
            let _span = tracing::info_span!("fixpoint", procedure = %procedure.name).entered();
            let evaluator = Evaluator::new(config.clone());
            let budget = Budget::new(max_iterations, timeout);
            evaluator.analyze(procedure, &handler, &budget)
        };
        incomplete |= result.incomplete;

        {
            let _span = tracing::info_span!("run_checkers", procedure = %procedure.name).entered();
            registry.run_all(procedure, &result, &handler);
        }
    }

    if let Some(breach) = handler.take_invariant_breach() {
        return Err(breach.into());
    }
    for warning in handler.warnings() {
        tracing::warn!(%warning, file = %path.display());
    }
    diagnostics.extend(handler.diagnostics());
    diagnostics.sort_by(|a: &Diagnostic, b: &Diagnostic| (a.span.file.clone(), a.span.start).cmp(&(b.span.file.clone(), b.span.start)));
    Ok(FileOutcome { diagnostics, incomplete })
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(files: Vec<&str>) -> RunArgs {
        RunArgs {
            files: files.into_iter().map(PathBuf::from).collect(),
            project: None,
            checkers: Vec::new(),
            typer: "default_robust".into(),
            type_interpreter: "default".into(),
            call_strategy: CallStrategy::Unknown,
            merge_predicate: "always".into(),
            format: OutputFormat::Line,
            max_iterations: 10_000,
            timeout_ms: None,
            strict_budget: false,
        }
    }

    #[test]
    fn parses_the_always_merge_predicate() {
        let a = args(vec!["f.json"]);
        assert_eq!(a.parsed_merge_predicate().unwrap(), MergePredicate::Always);
    }

    #[test]
    fn parses_a_bounded_merge_predicate() {
        let mut a = args(vec!["f.json"]);
        a.merge_predicate = "bounded:4".into();
        assert_eq!(a.parsed_merge_predicate().unwrap(), MergePredicate::Bounded(4));
    }

    #[test]
    fn rejects_a_malformed_merge_predicate() {
        let mut a = args(vec!["f.json"]);
        a.merge_predicate = "bounded:oops".into();
        assert!(a.parsed_merge_predicate().is_err());
    }

    #[test]
    fn an_empty_checker_list_registers_every_checker() {
        let a = args(vec!["f.json"]);
        assert_eq!(a.registry().names().len(), 4);
    }

    #[test]
    fn a_named_checker_list_registers_only_those_checkers() {
        let mut a = args(vec!["f.json"]);
        a.checkers = vec!["contract".into()];
        assert_eq!(a.registry().names(), vec!["contract"]);
    }
}
