use crate::block::{BasicBlock, BlockId};
use crate::instructions::{InstRef, Instruction};
use crate::types::Type;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub signature: FunctionSignature,
    pub linkage: Linkage,
    pub body: FunctionBody,
}

impl Function {
    pub fn new(signature: FunctionSignature) -> Self {
        Self {
            signature,
            linkage: Linkage::Local,
            body: FunctionBody::new(),
        }
    }

    /// A declaration has no analyzable body; the driver skips these.
    pub fn declaration(signature: FunctionSignature) -> Self {
        Self {
            signature,
            linkage: Linkage::External,
            body: FunctionBody::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self.linkage, Linkage::External)
    }

    pub fn entry_block(&self) -> BlockId {
        self.body.entry_block()
    }

    pub fn instruction(&self, inst: InstRef) -> Option<&Instruction> {
        self.body
            .get_block(inst.block)
            .and_then(|block| block.instructions.get(inst.index as usize))
    }

    /// All instructions in block order, paired with their handles.
    pub fn instructions(&self) -> impl Iterator<Item = (InstRef, &Instruction)> {
        self.body.blocks.iter().flat_map(|(&block_id, block)| {
            block
                .instructions
                .iter()
                .enumerate()
                .map(move |(idx, inst)| (InstRef::new(block_id, idx as u32), inst))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<Parameter>,
    pub returns: Option<Type>,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: Type,
}

impl Parameter {
    pub fn new(name: impl Into<String>, param_type: Type) -> Self {
        Self {
            name: name.into(),
            param_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Linkage {
    Local,
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionBody {
    pub entry_block: BlockId,
    pub blocks: IndexMap<BlockId, BasicBlock>,
    next_block_id: u32,
}

impl FunctionBody {
    pub fn new() -> Self {
        let entry_block = BlockId(0);
        let mut blocks = IndexMap::new();
        blocks.insert(entry_block, BasicBlock::new(entry_block));

        Self {
            entry_block,
            blocks,
            next_block_id: 1,
        }
    }

    pub fn create_block(&mut self) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        self.blocks.insert(id, BasicBlock::new(id));
        id
    }

    pub fn get_block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(&id)
    }

    pub fn get_block_mut(&mut self, id: BlockId) -> Option<&mut BasicBlock> {
        self.blocks.get_mut(&id)
    }

    pub fn entry_block(&self) -> BlockId {
        self.entry_block
    }
}

impl Default for FunctionBody {
    fn default() -> Self {
        Self::new()
    }
}
