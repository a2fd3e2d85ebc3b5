/*! Core IR types and dependence analyses.
 *
 * Optimizers, slicers, and verifiers all ask the same two questions of a
 * function body: which instructions must this memory operation wait for, and
 * on which branch decisions does this block's execution depend. This crate
 * provides a small block-structured IR, the oracles those questions need
 * (control-flow graph, post-dominators, aliasing, memory dependence), and
 * the builders that turn oracle answers into queryable dependence maps.
 */

pub mod analysis;
pub mod block;
pub mod builder;
pub mod function;
pub mod instructions;
pub mod module;
pub mod types;
pub mod values;

pub use analysis::control_dependence::{ControlDependenceBuilder, ControlDependenceMap};
pub use analysis::data_dependence::{
    DataDependenceBuilder, DependenceKind, DependenceRecord, Diagnostic, LocalDependenceMap,
    NonLocalDependenceMap,
};
pub use analysis::pdg::{FunctionDependences, ProgramDependenceGraph};
pub use analysis::AnalysisError;
pub use block::{BasicBlock, BlockId, Terminator};
pub use builder::{FunctionBuilder, ModuleBuilder};
pub use function::{Function, FunctionBody, FunctionSignature, Linkage};
pub use instructions::{InstRef, Instruction, MemoryOrdering};
pub use module::Module;
pub use types::Type;
pub use values::{Constant, Value, ValueId};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrError {
    #[error("Type error: {0}")]
    TypeError(String),
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),
    #[error("Builder error: {0}")]
    BuilderError(String),
    #[error("Function not found: {0}")]
    FunctionNotFound(String),
}

pub type Result<T> = std::result::Result<T, IrError>;

#[cfg(test)]
mod tests;
