use crate::analysis::alias::AllocAliasAnalysis;
use crate::analysis::cfg::ControlFlowGraph;
use crate::analysis::control_dependence::{ControlDependenceBuilder, ControlDependenceMap};
use crate::analysis::data_dependence::{
    DataDependenceBuilder, Diagnostic, LocalDependenceMap, NonLocalDependenceMap,
};
use crate::analysis::memory_dependence::{MemoryDependenceOracle, WalkingMemoryOracle};
use crate::analysis::post_dominator::{PostDominatorTree, PostDominators};
use crate::analysis::AnalysisError;
use crate::function::Function;
use crate::module::Module;
use indexmap::IndexMap;

/// The dependence maps of one analyzed function. Populated in a single
/// pass and read-only afterwards; instruction and block handles refer into
/// the function that was analyzed.
#[derive(Debug)]
pub struct FunctionDependences {
    local: LocalDependenceMap,
    non_local: NonLocalDependenceMap,
    control: ControlDependenceMap,
    diagnostics: Vec<Diagnostic>,
}

impl FunctionDependences {
    /// Runs both dependence builders over one function. The oracle and the
    /// post-dominator tree must have been constructed for this same
    /// function; sharing them across functions is a caller error.
    pub fn analyze(
        function: &Function,
        oracle: &dyn MemoryDependenceOracle,
        postdoms: &dyn PostDominators,
        cfg: &ControlFlowGraph,
    ) -> Result<Self, AnalysisError> {
        let mut data = DataDependenceBuilder::new();
        data.run(function, oracle)?;

        let mut control = ControlDependenceBuilder::new();
        control.run(function, cfg, postdoms);

        let (local, non_local, diagnostics) = data.into_parts();
        Ok(Self {
            local,
            non_local,
            control: control.into_map(),
            diagnostics,
        })
    }

    pub fn local(&self) -> &LocalDependenceMap {
        &self.local
    }

    pub fn non_local(&self) -> &NonLocalDependenceMap {
        &self.non_local
    }

    pub fn control(&self) -> &ControlDependenceMap {
        &self.control
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Per-function dependence results for a whole module, keyed by function
/// name in definition order.
#[derive(Debug, Default)]
pub struct ProgramDependenceGraph {
    functions: IndexMap<String, FunctionDependences>,
}

impl ProgramDependenceGraph {
    /// Analyzes every defined function with collaborators scoped to that
    /// function. A fatal consistency violation in any function aborts the
    /// whole run.
    pub fn analyze_module(module: &Module) -> Result<Self, AnalysisError> {
        let mut functions = IndexMap::new();

        for function in module.defined_functions() {
            let cfg = ControlFlowGraph::build(function);
            let aliases = AllocAliasAnalysis::build(function);
            let oracle = WalkingMemoryOracle::new(function, &cfg, &aliases);
            let postdoms = PostDominatorTree::build(function, &cfg);

            let deps = FunctionDependences::analyze(function, &oracle, &postdoms, &cfg)?;
            functions.insert(function.name().to_string(), deps);
        }

        Ok(Self { functions })
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDependences> {
        self.functions.get(name)
    }

    pub fn functions(&self) -> impl Iterator<Item = (&str, &FunctionDependences)> {
        self.functions.iter().map(|(name, deps)| (name.as_str(), deps))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
