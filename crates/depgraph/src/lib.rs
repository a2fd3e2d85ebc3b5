/*! Unified interface for program dependence analysis.
 *
 * Single import for everything you need: building IR modules, running the
 * data- and control-dependence analyses, and rendering the results as text,
 * Graphviz, or JSON.
 */

pub use depgraph_core as core;
pub use depgraph_emit as emit;

pub use depgraph_core::{
    analysis::control_dependence::ControlDependenceMap,
    analysis::data_dependence::{
        DependenceKind, DependenceRecord, Diagnostic, LocalDependenceMap, NonLocalDependenceMap,
    },
    analysis::memory_dependence::NonLocalDep,
    analysis::pdg::{FunctionDependences, ProgramDependenceGraph},
    analysis::AnalysisError,
    block::{BasicBlock, BlockId, Terminator},
    builder::{FunctionBuilder, ModuleBuilder},
    function::Function,
    instructions::{InstRef, Instruction},
    module::Module,
    types::Type,
    values::Value,
};

pub use depgraph_emit::{write_report, DotEmitter, EmitterConfig, OutputFormat, ReportEmitter};
