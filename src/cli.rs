//! Minimal CLI: check payloads against an event namespace, or describe one.
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;

use function_types::{Instance, Namespace, events, path_de};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON/NDJSON event payloads against the built-in event schemas
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// build every input document into an instance and report pass/fail
    Check(CheckOut),
    /// print the schemas of an event namespace
    Describe(DescribeOut),
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum EventKind {
    Dynamodb,
    Sqs,
    #[value(name = "api-gateway-v2")]
    ApiGatewayV2,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /detail/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// event namespace to check against
    #[arg(long, value_enum)]
    event: EventKind,

    /// schema to build (the namespace root if omitted)
    #[arg(long)]
    schema: Option<String>,

    /// print the serialized instances of passing documents
    #[arg(long, default_value_t = false)]
    emit: bool,

    /// output .json file for --emit (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct DescribeOut {
    #[arg(long, value_enum)]
    event: EventKind,
}

/// One input document, tagged with where it came from.
struct Document {
    origin: String,
    value: serde_json::Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl EventKind {
    fn namespace(self) -> &'static Namespace {
        match self {
            EventKind::Dynamodb => events::dynamodb(),
            EventKind::Sqs => events::sqs(),
            EventKind::ApiGatewayV2 => events::api_gateway_v2(),
        }
    }
}

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .map_err(|error| anyhow!("failed to resolve input file paths: {error}"))?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            if self.ndjson {
                for (ix, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let origin = format!("{source_path_str}:{}", ix + 1);
                    let value = serde_json::from_str::<serde_json::Value>(line)
                        .with_context(|| format!("failed to parse JSON line ({origin})"))?;
                    self.preprocess(origin, value, &mut out)?;
                }
            } else {
                let value = serde_json::from_str::<serde_json::Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                self.preprocess(source_path_str, value, &mut out)?;
            }
        }
        Ok(out)
    }

    fn preprocess(&self, origin: String, value: serde_json::Value, out: &mut Vec<Document>) -> Result<()> {
        let value = match self.json_pointer.as_deref() {
            None => value,
            Some(pointer) => value
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| anyhow!("JSON pointer {pointer} matched nothing in {origin}"))?,
        };
        match self.jq_expr.as_deref() {
            None => out.push(Document { origin, value }),
            Some(jq_expr) => {
                let results = crate::jq_exec::run_jaq(jq_expr, &value)
                    .with_context(|| format!("failed to apply jq expression to {origin}"))?;
                let many = results.len() > 1;
                for (ix, value) in results.into_iter().enumerate() {
                    let origin = if many { format!("{origin}#{ix}") } else { origin.clone() };
                    out.push(Document { origin, value });
                }
            }
        }
        Ok(())
    }
}

impl CheckOut {
    fn check_one(&self, ns: &Namespace, doc: &Document) -> Result<Instance, String> {
        let raw = path_de::raw_from_value(doc.value.clone()).map_err(|error| error.to_string())?;
        let built = match self.schema.as_deref() {
            Some(name) => ns.build_as(name, &raw),
            None => ns.build(&raw),
        };
        built.map_err(|error| error.to_string())
    }

    fn run(&self) -> Result<ExitCode> {
        let ns = self.event.namespace();
        if let Some(name) = self.schema.as_deref() {
            if ns.schema(name).is_none() {
                bail!("namespace {} has no schema named {name}", ns.name());
            }
        }

        let documents = self.input_settings.load_documents()?;
        tracing::debug!(count = documents.len(), namespace = ns.name(), "loaded documents");

        let outcomes = documents
            .par_iter()
            .map(|doc| {
                tracing::debug!(origin = %doc.origin, "building");
                (doc, self.check_one(ns, doc))
            })
            .collect::<Vec<_>>();

        let mut failed = 0usize;
        let mut emitted = Vec::new();
        for (doc, outcome) in &outcomes {
            match outcome {
                Ok(instance) => {
                    println!("{} {}", "✅".green(), doc.origin);
                    if self.emit {
                        let json = instance
                            .to_json()
                            .with_context(|| format!("failed to encode {}", doc.origin))?;
                        emitted.push(json);
                    }
                }
                Err(error) => {
                    failed += 1;
                    tracing::warn!(origin = %doc.origin, %error, "document rejected");
                    println!("{} {}: {}", "❌".red(), doc.origin, error.red());
                }
            }
        }

        if self.emit {
            let emitted = match emitted.len() {
                1 => emitted.remove(0),
                _ => serde_json::Value::Array(emitted),
            };
            let src = serde_json::to_string_pretty(&emitted)?;
            match self.out.as_ref() {
                Some(out) => {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &src)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                }
                None => println!("{src}"),
            }
        }

        tracing::info!(total = outcomes.len(), failed, "check finished");
        Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }
}

impl DescribeOut {
    fn run(&self) -> Result<ExitCode> {
        let ns = self.event.namespace();
        let root = ns.root().map(|root| root.name());
        println!("{}", ns.name().bold());
        for schema in ns.schemas() {
            let marker = if Some(schema.name()) == root { " (root)" } else { "" };
            println!("\n{}{}", schema.name().cyan(), marker);
            for (field, desc) in schema.iter() {
                println!("  {field}: {desc}");
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Check(target) => target.run(),
            Command::Describe(target) => target.run(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                return Err(format!("glob pattern matched no files: {pattern}").into());
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //
