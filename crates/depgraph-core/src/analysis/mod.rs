/*! Dependence analyses over a function's control-flow graph.
 *
 * Two builders do the actual work: `DataDependenceBuilder` classifies what
 * each memory access must wait on, `ControlDependenceBuilder` computes which
 * branch decisions gate each block. Everything they consume — the CFG, the
 * post-dominator tree, aliasing, the memory-dependence oracle — sits behind
 * a trait so the builders can be driven by scripted oracles in tests.
 */

pub mod alias;
pub mod cfg;
pub mod control_dependence;
pub mod data_dependence;
pub mod memory_dependence;
pub mod pdg;
pub mod post_dominator;

pub use alias::{AliasOracle, AliasResult, AllocAliasAnalysis};
pub use cfg::ControlFlowGraph;
pub use control_dependence::{ControlDependenceBuilder, ControlDependenceMap};
pub use data_dependence::{
    DataDependenceBuilder, DependenceKind, DependenceRecord, Diagnostic, LocalDependenceMap,
    NonLocalDependenceMap,
};
pub use memory_dependence::{
    LocalDepResult, MemoryDependenceOracle, MemoryFootprint, NonLocalDep, WalkingMemoryOracle,
};
pub use pdg::{FunctionDependences, ProgramDependenceGraph};
pub use post_dominator::{PostDominatorTree, PostDominators};

use crate::instructions::InstRef;
use thiserror::Error;

/// Internal-consistency violations between the dependence builders and the
/// oracles they consume. These are contract breaches, not analysis facts:
/// once one occurs the result maps cannot be trusted, so the enclosing run
/// must stop rather than degrade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("invalid dependence record computed for {0}")]
    InvalidRecord(InstRef),
    #[error("duplicate local dependence record for {0}")]
    DuplicateLocalRecord(InstRef),
    #[error("unrecognized memory instruction {0} at non-local resolution")]
    UnrecognizedMemoryInstruction(InstRef),
    #[error("instruction {0} has no derivable memory footprint")]
    MissingFootprint(InstRef),
}
