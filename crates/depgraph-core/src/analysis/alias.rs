use crate::{
    function::Function,
    instructions::{InstRef, Instruction},
    values::{Value, ValueId},
};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasResult {
    MustAlias,
    MayAlias,
    NoAlias,
}

/// May/must/no-alias decisions over pointer values. Consumed by the
/// memory-dependence oracle; the dependence builders never call this
/// directly.
pub trait AliasOracle {
    fn alias(&self, a: &Value, b: &Value) -> AliasResult;
}

/// Allocation-site based aliasing: distinct `alloca` results address
/// distinct memory, and an alloca that never escapes the function cannot
/// alias an unknown pointer. Everything else is a conservative may-alias.
#[derive(Debug, Clone)]
pub struct AllocAliasAnalysis {
    alloc_sites: HashMap<ValueId, InstRef>,
    escaped: HashSet<ValueId>,
}

impl AllocAliasAnalysis {
    pub fn build(function: &Function) -> Self {
        let mut alloc_sites = HashMap::new();
        let mut escaped = HashSet::new();

        for (inst_ref, inst) in function.instructions() {
            match inst {
                Instruction::Alloca { result, .. } => {
                    if let Some(id) = result.as_register() {
                        alloc_sites.insert(id, inst_ref);
                    }
                }
                Instruction::Call { args, .. } => {
                    for arg in args {
                        if let Some(id) = arg.as_register() {
                            escaped.insert(id);
                        }
                    }
                }
                Instruction::Store { value, .. } => {
                    if let Some(id) = value.as_register() {
                        escaped.insert(id);
                    }
                }
                _ => {}
            }
        }

        for block in function.body.blocks.values() {
            if let crate::block::Terminator::Return(Some(value)) = &block.terminator {
                if let Some(id) = value.as_register() {
                    escaped.insert(id);
                }
            }
        }

        Self {
            alloc_sites,
            escaped,
        }
    }

    fn is_private_alloc(&self, id: ValueId) -> bool {
        self.alloc_sites.contains_key(&id) && !self.escaped.contains(&id)
    }
}

impl AliasOracle for AllocAliasAnalysis {
    fn alias(&self, a: &Value, b: &Value) -> AliasResult {
        if !a.is_pointer_like() || !b.is_pointer_like() {
            return AliasResult::NoAlias;
        }

        if a == b {
            return AliasResult::MustAlias;
        }

        match (a.as_register(), b.as_register()) {
            // Two distinct allocation sites never overlap.
            (Some(ra), Some(rb))
                if self.alloc_sites.contains_key(&ra) && self.alloc_sites.contains_key(&rb) =>
            {
                AliasResult::NoAlias
            }
            (Some(ra), _) if self.is_private_alloc(ra) => AliasResult::NoAlias,
            (_, Some(rb)) if self.is_private_alloc(rb) => AliasResult::NoAlias,
            _ => AliasResult::MayAlias,
        }
    }
}
