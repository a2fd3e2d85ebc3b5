use crate::block::BlockId;
use crate::types::Type;
use crate::values::Value;
use serde::{Deserialize, Serialize};

/// Stable handle to one instruction: owning block plus position within it.
/// Analyses key their result maps by `InstRef` so nothing borrows into the
/// module while results are alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstRef {
    pub block: BlockId,
    pub index: u32,
}

impl InstRef {
    pub fn new(block: BlockId, index: u32) -> Self {
        Self { block, index }
    }
}

impl std::fmt::Display for InstRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.block, self.index)
    }
}

/// Ordering constraint on a load or store. Anything stricter than
/// `Unordered` is outside the dependence analysis' coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryOrdering {
    Unordered,
    Volatile,
    Atomic,
}

impl MemoryOrdering {
    pub fn is_unordered(&self) -> bool {
        matches!(self, MemoryOrdering::Unordered)
    }
}

impl std::fmt::Display for MemoryOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryOrdering::Unordered => write!(f, "unordered"),
            MemoryOrdering::Volatile => write!(f, "volatile"),
            MemoryOrdering::Atomic => write!(f, "atomic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpPred {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Instruction {
    Assign {
        result: Value,
        value: Value,
    },
    Add {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Sub {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Mul {
        result: Value,
        left: Value,
        right: Value,
        ty: Type,
    },
    Cmp {
        result: Value,
        pred: CmpPred,
        left: Value,
        right: Value,
    },

    Alloca {
        result: Value,
        ty: Type,
        size: u64,
    },
    Load {
        result: Value,
        address: Value,
        ty: Type,
        ordering: MemoryOrdering,
    },
    Store {
        address: Value,
        value: Value,
        ty: Type,
        ordering: MemoryOrdering,
    },
    VaArg {
        result: Value,
        list: Value,
        ty: Type,
    },

    Call {
        result: Option<Value>,
        callee: String,
        args: Vec<Value>,
    },

    Phi {
        result: Value,
        incoming: Vec<(BlockId, Value)>,
    },
}

impl Instruction {
    pub fn result(&self) -> Option<&Value> {
        match self {
            Instruction::Assign { result, .. }
            | Instruction::Add { result, .. }
            | Instruction::Sub { result, .. }
            | Instruction::Mul { result, .. }
            | Instruction::Cmp { result, .. }
            | Instruction::Alloca { result, .. }
            | Instruction::Load { result, .. }
            | Instruction::VaArg { result, .. }
            | Instruction::Phi { result, .. } => Some(result),
            Instruction::Call { result, .. } => result.as_ref(),
            Instruction::Store { .. } => None,
        }
    }

    /// Calls conservatively read whatever their callee can reach.
    pub fn may_read_memory(&self) -> bool {
        matches!(
            self,
            Instruction::Load { .. } | Instruction::VaArg { .. } | Instruction::Call { .. }
        )
    }

    pub fn may_write_memory(&self) -> bool {
        matches!(
            self,
            Instruction::Store { .. } | Instruction::VaArg { .. } | Instruction::Call { .. }
        )
    }

    pub fn accesses_memory(&self) -> bool {
        self.may_read_memory() || self.may_write_memory()
    }

    /// False only for loads and stores carrying a volatile or atomic
    /// ordering; every other instruction is trivially unordered.
    pub fn is_unordered(&self) -> bool {
        match self {
            Instruction::Load { ordering, .. } | Instruction::Store { ordering, .. } => {
                ordering.is_unordered()
            }
            _ => true,
        }
    }

    /// The pointer operand of a load, store, or va_arg.
    pub fn address(&self) -> Option<&Value> {
        match self {
            Instruction::Load { address, .. } | Instruction::Store { address, .. } => Some(address),
            Instruction::VaArg { list, .. } => Some(list),
            _ => None,
        }
    }

    /// The type transferred by a memory access, used to derive its width.
    pub fn accessed_type(&self) -> Option<&Type> {
        match self {
            Instruction::Load { ty, .. }
            | Instruction::Store { ty, .. }
            | Instruction::VaArg { ty, .. } => Some(ty),
            _ => None,
        }
    }
}
