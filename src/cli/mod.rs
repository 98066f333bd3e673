//! # CLI Module
//!
//! Command-line tooling for route manifests.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! List every route in resolution order with its directives:
//!
//! ```bash
//! routable routes --manifest routes.yaml
//! routable routes --manifest routes.yaml --json
//! ```
//!
//! ### `resolve`
//!
//! Resolve one or more paths and print the matched template and parameters:
//!
//! ```bash
//! routable resolve --manifest routes.yaml users/42 settings
//! ```
//!
//! ### `simulate`
//!
//! Run a sequence of navigation operations against an in-memory stack and
//! print each step, the stack host's command journal and the final stack:
//!
//! ```bash
//! routable simulate --manifest routes.yaml open:home open:users/42 open:login pop
//! ```
//!
//! Screens and callbacks named by the manifest are stood in for by
//! placeholders. `--manifest` may also come from `ROUTABLE_MANIFEST`.

mod commands;


pub use commands::{
    execute, run_cli, simulate, Cli, Commands, SimOp, SimOpParseError, SimulationReport,
    StepReport,
};
