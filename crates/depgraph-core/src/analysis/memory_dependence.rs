use crate::analysis::alias::{AliasOracle, AliasResult};
use crate::analysis::cfg::ControlFlowGraph;
use crate::block::BlockId;
use crate::function::Function;
use crate::instructions::{InstRef, Instruction};
use crate::values::Value;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Answer to a block-local dependence query: either the nearest qualifying
/// instruction with its relationship, a marker that the state originates
/// outside the function body, an unknown, or the signal that the search must
/// continue across block boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalDepResult {
    Def(InstRef),
    Clobber(InstRef),
    NonFuncLocal,
    Unknown,
    NonLocal,
}

/// One candidate produced by a non-local search: the nearest qualifying
/// access on some predecessor path, or `None` when the path left the
/// function body without resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonLocalDep {
    pub dep: Option<InstRef>,
    pub block: BlockId,
}

/// Abstract memory footprint of an access: the address it dereferences and
/// the width transferred, re-derived from the instruction when a non-local
/// search begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFootprint {
    pub address: Value,
    pub size: Option<u64>,
}

impl MemoryFootprint {
    pub fn of(inst: &Instruction) -> Option<Self> {
        let address = inst.address()?.clone();
        let size = inst.accessed_type().and_then(|ty| ty.size_bytes());
        Some(Self { address, size })
    }
}

/// What an instruction must wait on. Constructed fresh per analyzed
/// function; handles returned are only meaningful against that function.
pub trait MemoryDependenceOracle {
    fn query_local(&self, inst: InstRef) -> LocalDepResult;

    /// Ordered candidates across block boundaries, one per explored
    /// predecessor path. Only called after `query_local` returned
    /// `NonLocal`.
    fn query_non_local(&self, inst: InstRef, footprint: &MemoryFootprint) -> Vec<NonLocalDep>;
}

/// Backward-scanning oracle over a single function: walks the query's block
/// from the instruction towards the block start, then (for non-local
/// queries) breadth-first through predecessor blocks, consulting the alias
/// oracle at every candidate access.
pub struct WalkingMemoryOracle<'a> {
    function: &'a Function,
    cfg: &'a ControlFlowGraph,
    aliases: &'a dyn AliasOracle,
}

enum Candidate {
    Def(InstRef),
    Clobber(InstRef),
}

impl<'a> WalkingMemoryOracle<'a> {
    pub fn new(
        function: &'a Function,
        cfg: &'a ControlFlowGraph,
        aliases: &'a dyn AliasOracle,
    ) -> Self {
        Self {
            function,
            cfg,
            aliases,
        }
    }

    fn is_entry(&self, block: BlockId) -> bool {
        block == self.function.entry_block()
    }

    /// Scans `block` backward starting below `before` (or from the block end
    /// when `None`) for the nearest access conflicting with the query.
    fn scan_block(
        &self,
        block: BlockId,
        before: Option<usize>,
        query: &Instruction,
        footprint: Option<&MemoryFootprint>,
    ) -> Option<Candidate> {
        let block_data = self.function.body.get_block(block)?;
        let upper = before.unwrap_or(block_data.instructions.len());

        for idx in (0..upper).rev() {
            let candidate = &block_data.instructions[idx];
            let candidate_ref = InstRef::new(block, idx as u32);

            // A candidate conflicts if it may write, or if it may read and
            // the query writes (anti-dependence).
            let relevant = candidate.may_write_memory()
                || (query.may_write_memory() && candidate.may_read_memory());
            if !relevant {
                continue;
            }

            if matches!(candidate, Instruction::Call { .. }) {
                return Some(Candidate::Clobber(candidate_ref));
            }

            let footprint = match footprint {
                Some(fp) => fp,
                // Query with no analyzable address: any conflicting access
                // is a conservative clobber.
                None => return Some(Candidate::Clobber(candidate_ref)),
            };
            let Some(candidate_addr) = candidate.address() else {
                continue;
            };

            match self.aliases.alias(&footprint.address, candidate_addr) {
                AliasResult::NoAlias => continue,
                AliasResult::MayAlias => return Some(Candidate::Clobber(candidate_ref)),
                AliasResult::MustAlias => {
                    // Only a store of at least the queried width produces the
                    // exact state the query observes.
                    let candidate_size = candidate.accessed_type().and_then(|ty| ty.size_bytes());
                    let covers = match (candidate_size, footprint.size) {
                        (Some(c), Some(q)) => c >= q,
                        _ => false,
                    };
                    if matches!(candidate, Instruction::Store { .. }) && covers {
                        return Some(Candidate::Def(candidate_ref));
                    }
                    return Some(Candidate::Clobber(candidate_ref));
                }
            }
        }

        None
    }
}

impl MemoryDependenceOracle for WalkingMemoryOracle<'_> {
    fn query_local(&self, inst: InstRef) -> LocalDepResult {
        let Some(query) = self.function.instruction(inst) else {
            return LocalDepResult::Unknown;
        };
        if !query.accesses_memory() {
            return LocalDepResult::Unknown;
        }

        let footprint = MemoryFootprint::of(query);
        if let Some(fp) = &footprint {
            if !fp.address.is_pointer_like() {
                return LocalDepResult::Unknown;
            }
        }

        match self.scan_block(inst.block, Some(inst.index as usize), query, footprint.as_ref()) {
            Some(Candidate::Def(dep)) => LocalDepResult::Def(dep),
            Some(Candidate::Clobber(dep)) => LocalDepResult::Clobber(dep),
            None if self.is_entry(inst.block) => LocalDepResult::NonFuncLocal,
            // Calls resolve locally or not at all; only loads, stores, and
            // va_args continue into the non-local search.
            None if matches!(query, Instruction::Call { .. }) => LocalDepResult::Unknown,
            None => LocalDepResult::NonLocal,
        }
    }

    fn query_non_local(&self, inst: InstRef, footprint: &MemoryFootprint) -> Vec<NonLocalDep> {
        let Some(query) = self.function.instruction(inst) else {
            return Vec::new();
        };

        let mut results = Vec::new();
        let mut visited = HashSet::new();
        let mut worklist = VecDeque::new();

        // Loop-carried paths re-entering the query's own block are not
        // re-scanned; the local walk already covered it.
        visited.insert(inst.block);
        for &pred in self.cfg.predecessors(inst.block) {
            if visited.insert(pred) {
                worklist.push_back(pred);
            }
        }

        while let Some(block) = worklist.pop_front() {
            match self.scan_block(block, None, query, Some(footprint)) {
                Some(Candidate::Def(dep)) | Some(Candidate::Clobber(dep)) => {
                    results.push(NonLocalDep {
                        dep: Some(dep),
                        block,
                    });
                }
                None if self.is_entry(block) => {
                    results.push(NonLocalDep { dep: None, block });
                }
                None => {
                    for &pred in self.cfg.predecessors(block) {
                        if visited.insert(pred) {
                            worklist.push_back(pred);
                        }
                    }
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::alias::AllocAliasAnalysis;
    use crate::builder::FunctionBuilder;
    use crate::types::Type;

    fn oracle_parts(function: &Function) -> (ControlFlowGraph, AllocAliasAnalysis) {
        (
            ControlFlowGraph::build(function),
            AllocAliasAnalysis::build(function),
        )
    }

    #[test]
    fn load_after_store_is_local_def() {
        let mut func = FunctionBuilder::new("store_load");
        let slot = func.alloca(Type::Uint(64), 8).unwrap();
        let value = func.constant_uint(7, 64);
        func.store(slot.clone(), value, Type::Uint(64)).unwrap();
        let _ = func.load(slot, Type::Uint(64)).unwrap();
        func.return_void().unwrap();

        let function = func.build().unwrap();
        let entry = function.entry_block();
        let (cfg, aliases) = oracle_parts(&function);
        let oracle = WalkingMemoryOracle::new(&function, &cfg, &aliases);

        let load = InstRef::new(entry, 2);
        let store = InstRef::new(entry, 1);
        assert_eq!(oracle.query_local(load), LocalDepResult::Def(store));
    }

    #[test]
    fn unrelated_store_is_skipped() {
        let mut func = FunctionBuilder::new("unrelated");
        let a = func.alloca(Type::Uint(64), 8).unwrap();
        let b = func.alloca(Type::Uint(64), 8).unwrap();
        let value = func.constant_uint(1, 64);
        func.store(b, value, Type::Uint(64)).unwrap();
        let _ = func.load(a, Type::Uint(64)).unwrap();
        func.return_void().unwrap();

        let function = func.build().unwrap();
        let entry = function.entry_block();
        let (cfg, aliases) = oracle_parts(&function);
        let oracle = WalkingMemoryOracle::new(&function, &cfg, &aliases);

        // Nothing before the load conflicts; entry block, so the state
        // comes from outside the body.
        let load = InstRef::new(entry, 3);
        assert_eq!(oracle.query_local(load), LocalDepResult::NonFuncLocal);
    }

    #[test]
    fn call_clobbers_following_load() {
        let mut func = FunctionBuilder::new("call_clobber");
        let p = func.param("p", Type::Ptr);
        func.call("opaque", vec![], false).unwrap();
        let _ = func.load(p, Type::Uint(64)).unwrap();
        func.return_void().unwrap();

        let function = func.build().unwrap();
        let entry = function.entry_block();
        let (cfg, aliases) = oracle_parts(&function);
        let oracle = WalkingMemoryOracle::new(&function, &cfg, &aliases);

        let load = InstRef::new(entry, 1);
        let call = InstRef::new(entry, 0);
        assert_eq!(oracle.query_local(load), LocalDepResult::Clobber(call));
    }

    #[test]
    fn cross_block_load_resolves_non_locally() {
        let mut func = FunctionBuilder::new("cross_block");
        let p = func.param("p", Type::Ptr);
        let next = func.create_block();

        let value = func.constant_uint(3, 64);
        func.store(p.clone(), value, Type::Uint(64)).unwrap();
        func.jump(next).unwrap();

        func.switch_to_block(next).unwrap();
        let _ = func.load(p, Type::Uint(64)).unwrap();
        func.return_void().unwrap();

        let function = func.build().unwrap();
        let entry = function.entry_block();
        let (cfg, aliases) = oracle_parts(&function);
        let oracle = WalkingMemoryOracle::new(&function, &cfg, &aliases);

        let load = InstRef::new(next, 0);
        assert_eq!(oracle.query_local(load), LocalDepResult::NonLocal);

        let query = function.instruction(load).unwrap();
        let footprint = MemoryFootprint::of(query).unwrap();
        let deps = oracle.query_non_local(load, &footprint);
        assert_eq!(
            deps,
            vec![NonLocalDep {
                dep: Some(InstRef::new(entry, 0)),
                block: entry,
            }]
        );
    }
}
