/*! Turn dependence analysis results into readable output.
 *
 * The maps produced by `depgraph-core` are keyed by instruction and block
 * handles, which is the right shape for tooling but not for humans. These
 * emitters render them as a sorted text report, a Graphviz view of the
 * control-dependence graph, or JSON for downstream consumers.
 */

pub mod config;
pub mod dot;
pub mod emitter;
pub mod output;
pub mod report;

pub use config::{EmitterConfig, IndentStyle, VerbosityLevel};
pub use dot::DotEmitter;
pub use emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
pub use output::{to_json, write_report, OutputFormat};
pub use report::ReportEmitter;
