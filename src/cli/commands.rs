use crate::error::RouterError;
use crate::host::{MemoryStackHost, RecordingUrlOpener, StackHost, UrlOpener};
use crate::manifest::{RouteManifest, ScreenRegistry};
use crate::router::{Opened, Router};
use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Command-line interface for routable
///
/// Inspects and exercises route manifests without a UI.
#[derive(Parser, Debug)]
#[command(name = "routable")]
#[command(about = "Route manifest inspection and navigation simulator", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List mapped routes in resolution order
    Routes {
        /// Route manifest (YAML or JSON)
        #[arg(short, long, env = "ROUTABLE_MANIFEST")]
        manifest: PathBuf,

        /// Print JSON instead of one line per route
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Resolve paths and print the matched route and parameters as JSON
    Resolve {
        #[arg(short, long, env = "ROUTABLE_MANIFEST")]
        manifest: PathBuf,

        /// Paths to resolve
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Run navigation operations against an in-memory stack
    ///
    /// Operations: `open:PATH`, `pop`, `unload:PATH` (tear down the shared
    /// screen cached for PATH), `external:URL`.
    Simulate {
        #[arg(short, long, env = "ROUTABLE_MANIFEST")]
        manifest: PathBuf,

        /// Issue every operation without animation
        #[arg(long, default_value_t = false)]
        no_animate: bool,

        /// Operations, applied in order
        #[arg(required = true)]
        ops: Vec<SimOp>,
    },
}

/// One simulator operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimOp {
    Open(String),
    Pop,
    Unload(String),
    External(String),
}

/// Error for an unrecognised simulator operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimOpParseError(String);

impl fmt::Display for SimOpParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown operation '{}' (expected open:PATH, pop, unload:PATH or external:URL)",
            self.0
        )
    }
}

impl std::error::Error for SimOpParseError {}

impl FromStr for SimOp {
    type Err = SimOpParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "pop" {
            return Ok(SimOp::Pop);
        }
        match s.split_once(':') {
            Some(("open", path)) => Ok(SimOp::Open(path.to_string())),
            Some(("unload", path)) => Ok(SimOp::Unload(path.to_string())),
            Some(("external", url)) => Ok(SimOp::External(url.to_string())),
            _ => Err(SimOpParseError(s.to_string())),
        }
    }
}

impl fmt::Display for SimOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimOp::Open(path) => write!(f, "open:{path}"),
            SimOp::Pop => f.write_str("pop"),
            SimOp::Unload(path) => write!(f, "unload:{path}"),
            SimOp::External(url) => write!(f, "external:{url}"),
        }
    }
}

/// Parse arguments from the process and run
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    execute(&cli, &mut stdout.lock())
}

/// Run `cli`, writing command output to `out`
pub fn execute(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Commands::Routes { manifest, json } => {
            let router = load_router(manifest)?;
            if *json {
                let routes: Vec<_> = router.routes().iter().map(|d| d.summary()).collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&routes)?)?;
            } else {
                writeln!(out, "[routes] count={}", router.routes().len())?;
                for route in router.routes() {
                    let d = route.directives;
                    let mut flags = Vec::new();
                    if d.modal {
                        flags.push("modal".to_string());
                    }
                    if d.shared {
                        flags.push("shared".to_string());
                    }
                    if d.resets {
                        flags.push("resets".to_string());
                    }
                    if let Some(t) = d.transition {
                        flags.push(format!("transition={t}"));
                    }
                    if let Some(p) = d.presentation {
                        flags.push(format!("presentation={p}"));
                    }
                    let line = format!(
                        "[route] {} -> {} {}",
                        route.template,
                        route.summary().target,
                        flags.join(",")
                    );
                    writeln!(out, "{}", line.trim_end())?;
                }
            }
            Ok(())
        }
        Commands::Resolve { manifest, paths } => {
            let router = load_router(manifest)?;
            let results: Vec<Value> = paths
                .iter()
                .map(|path| match router.resolve(path) {
                    Ok(resolved) => json!({ "path": path, "resolved": &*resolved }),
                    Err(err) => json!({ "path": path, "error": err.to_string() }),
                })
                .collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
            Ok(())
        }
        Commands::Simulate {
            manifest,
            no_animate,
            ops,
        } => {
            let router = load_router(manifest)?;
            let report = simulate(&router, ops, !*no_animate);
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            Ok(())
        }
    }
}

fn load_router(manifest: &Path) -> Result<Router> {
    RouteManifest::from_path(manifest)?.build_router(&ScreenRegistry::with_placeholders())
}

/// Outcome of one simulator operation
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub op: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a simulation produced
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub steps: Vec<StepReport>,
    pub journal: Vec<crate::host::HostCommand>,
    pub stack: Vec<String>,
    pub presented: Option<String>,
    pub shared: Vec<String>,
    pub opened_urls: Vec<String>,
}

/// Run `ops` against a fresh in-memory stack attached to `router`.
///
/// Failing operations are reported and the run continues.
pub fn simulate(router: &Router, ops: &[SimOp], animated: bool) -> SimulationReport {
    let host = Arc::new(MemoryStackHost::new());
    let opener = Arc::new(RecordingUrlOpener::new());
    router.attach_stack_host(Arc::clone(&host) as Arc<dyn StackHost>);
    router.set_url_opener(Some(Arc::clone(&opener) as Arc<dyn UrlOpener>));

    let steps = ops
        .iter()
        .map(|op| {
            debug!(op = %op, "Simulating operation");
            let outcome = run_op(router, op, animated);
            let (result, error) = match outcome {
                Ok(v) => (Some(v), None),
                Err(e) => (None, Some(e.to_string())),
            };
            StepReport {
                op: op.to_string(),
                result,
                error,
            }
        })
        .collect();

    SimulationReport {
        steps,
        journal: host.journal(),
        stack: host.stack_titles(),
        presented: host.presented().map(|s| s.title().into_owned()),
        shared: router.shared_screens(),
        opened_urls: opener.opened().iter().map(|u| u.to_string()).collect(),
    }
}

fn run_op(router: &Router, op: &SimOp, animated: bool) -> std::result::Result<Value, RouterError> {
    match op {
        SimOp::Open(path) => match router.open(path, animated)? {
            Opened::Callback { arity } => Ok(json!({ "callback": { "arity": arity } })),
            Opened::Navigated { screen, plan } => Ok(json!({
                "screen": screen.title(),
                "screen_id": screen.id(),
                "plan": plan,
            })),
        },
        SimOp::Pop => Ok(json!({ "pop": router.pop(animated)? })),
        SimOp::Unload(path) => match router.shared_screen(path) {
            Some(screen) => {
                screen.unload();
                Ok(json!({ "unloaded": screen.title() }))
            }
            None => Ok(json!({ "unloaded": null })),
        },
        SimOp::External(url) => {
            router.open_external(url)?;
            Ok(json!({ "external": url }))
        }
    }
}
