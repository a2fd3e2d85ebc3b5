use crate::analysis::memory_dependence::{
    LocalDepResult, MemoryDependenceOracle, MemoryFootprint, NonLocalDep,
};
use crate::analysis::AnalysisError;
use crate::function::Function;
use crate::instructions::{InstRef, Instruction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Relationship between a memory access and the dependency found for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependenceKind {
    /// The dependency may overwrite the queried memory without producing
    /// the exact value observed.
    Clobber,
    /// The dependency is the unique prior definition of the observed state.
    Def,
    /// The state originates outside the function body; no instruction
    /// accompanies it.
    NonFuncLocal,
    /// The block-local search was inconclusive; resolved separately.
    NonLocal,
    /// The oracle could not analyze the access.
    Unknown,
    /// Sentinel for "not computed"; never legal inside a result map.
    Invalid,
}

impl std::fmt::Display for DependenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DependenceKind::Clobber => "Clobber",
            DependenceKind::Def => "Def",
            DependenceKind::NonFuncLocal => "NonFuncLocal",
            DependenceKind::NonLocal => "NonLocal",
            DependenceKind::Unknown => "Unknown",
            DependenceKind::Invalid => "Invalid",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependenceRecord {
    pub kind: DependenceKind,
    pub inst: Option<InstRef>,
}

impl DependenceRecord {
    pub fn new(kind: DependenceKind, inst: Option<InstRef>) -> Self {
        Self { kind, inst }
    }

    fn from_local(result: LocalDepResult) -> Self {
        match result {
            LocalDepResult::Def(dep) => Self::new(DependenceKind::Def, Some(dep)),
            LocalDepResult::Clobber(dep) => Self::new(DependenceKind::Clobber, Some(dep)),
            LocalDepResult::NonFuncLocal => Self::new(DependenceKind::NonFuncLocal, None),
            LocalDepResult::Unknown => Self::new(DependenceKind::Unknown, None),
            LocalDepResult::NonLocal => Self::new(DependenceKind::NonLocal, None),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.kind != DependenceKind::Invalid
    }
}

impl Default for DependenceRecord {
    fn default() -> Self {
        Self::new(DependenceKind::Invalid, None)
    }
}

/// One record per analyzed instruction whose dependency resolved within its
/// own block (or to a function-entry/unknown marker).
pub type LocalDependenceMap = HashMap<InstRef, DependenceRecord>;

/// Candidates per analyzed instruction whose dependency may span blocks,
/// in predecessor-traversal order.
pub type NonLocalDependenceMap = HashMap<InstRef, Vec<NonLocalDep>>;

/// Recoverable coverage gaps reported during analysis. These accompany the
/// result maps so callers can tell a skipped instruction from a resolved
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// Atomic or volatile access reached non-local resolution; the
    /// instruction was excluded from both maps.
    UnsupportedOrderedAccess { inst: InstRef },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnsupportedOrderedAccess { inst } => {
                write!(f, "unsupported atomic/volatile access at {}", inst)
            }
        }
    }
}

/// Resolves and classifies the dependency of every memory-accessing
/// instruction in a function, populating the local and non-local maps.
#[derive(Debug, Default)]
pub struct DataDependenceBuilder {
    local: LocalDependenceMap,
    non_local: NonLocalDependenceMap,
    diagnostics: Vec<Diagnostic>,
}

impl DataDependenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(
        &mut self,
        function: &Function,
        oracle: &dyn MemoryDependenceOracle,
    ) -> Result<(), AnalysisError> {
        for (inst_ref, inst) in function.instructions() {
            if !inst.may_read_memory() && !inst.may_write_memory() {
                continue;
            }
            self.process(inst_ref, inst, oracle)?;
        }
        Ok(())
    }

    fn process(
        &mut self,
        inst_ref: InstRef,
        inst: &Instruction,
        oracle: &dyn MemoryDependenceOracle,
    ) -> Result<(), AnalysisError> {
        let record = DependenceRecord::from_local(oracle.query_local(inst_ref));

        match record.kind {
            DependenceKind::NonLocal => self.resolve_non_local(inst_ref, inst, oracle),
            DependenceKind::Invalid => Err(AnalysisError::InvalidRecord(inst_ref)),
            _ => {
                // One local record per instruction; a second insert means
                // the one-pass contract was broken and the maps are suspect.
                if self.local.insert(inst_ref, record).is_some() {
                    return Err(AnalysisError::DuplicateLocalRecord(inst_ref));
                }
                Ok(())
            }
        }
    }

    fn resolve_non_local(
        &mut self,
        inst_ref: InstRef,
        inst: &Instruction,
        oracle: &dyn MemoryDependenceOracle,
    ) -> Result<(), AnalysisError> {
        match inst {
            Instruction::Load { .. } | Instruction::Store { .. } => {
                if !inst.is_unordered() {
                    warn!(inst = %inst_ref, "atomic/volatile memory accesses are not analyzed");
                    self.diagnostics
                        .push(Diagnostic::UnsupportedOrderedAccess { inst: inst_ref });
                    return Ok(());
                }
            }
            Instruction::VaArg { .. } => {}
            // The memory-accessing kinds that may go non-local are closed
            // over loads, stores, and va_args; anything else here means the
            // oracle and the IR disagree about what this instruction is.
            _ => return Err(AnalysisError::UnrecognizedMemoryInstruction(inst_ref)),
        }

        let footprint =
            MemoryFootprint::of(inst).ok_or(AnalysisError::MissingFootprint(inst_ref))?;
        let deps = oracle.query_non_local(inst_ref, &footprint);
        self.non_local.entry(inst_ref).or_default().extend(deps);
        Ok(())
    }

    pub fn local_dependencies(&self) -> &LocalDependenceMap {
        &self.local
    }

    pub fn non_local_dependencies(&self) -> &NonLocalDependenceMap {
        &self.non_local
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (LocalDependenceMap, NonLocalDependenceMap, Vec<Diagnostic>) {
        (self.local, self.non_local, self.diagnostics)
    }
}
