use crate::{block::BlockId, function::Function};
use std::collections::{HashMap, HashSet, VecDeque};

/// Edge structure of a function body: predecessor and successor lists plus
/// the set of blocks reachable from the entry.
#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    entry: BlockId,
    exits: Vec<BlockId>,
    predecessors: HashMap<BlockId, Vec<BlockId>>,
    successors: HashMap<BlockId, Vec<BlockId>>,
    reachable: HashSet<BlockId>,
}

impl ControlFlowGraph {
    pub fn build(function: &Function) -> Self {
        let entry = function.entry_block();
        let mut predecessors: HashMap<BlockId, Vec<BlockId>> = HashMap::new();
        let mut successors = HashMap::new();
        let mut exits = Vec::new();

        for (&block_id, block) in &function.body.blocks {
            let succs = block.successors();
            successors.insert(block_id, succs.clone());

            if succs.is_empty() {
                exits.push(block_id);
            }

            for succ in succs {
                predecessors.entry(succ).or_default().push(block_id);
            }
        }

        let reachable = Self::reachable_from(entry, &successors);

        Self {
            entry,
            exits,
            predecessors,
            successors,
            reachable,
        }
    }

    fn reachable_from(
        entry: BlockId,
        successors: &HashMap<BlockId, Vec<BlockId>>,
    ) -> HashSet<BlockId> {
        let mut reachable = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(entry);

        while let Some(block) = queue.pop_front() {
            if !reachable.insert(block) {
                continue;
            }
            if let Some(succs) = successors.get(&block) {
                queue.extend(succs.iter().copied());
            }
        }

        reachable
    }

    pub fn entry(&self) -> BlockId {
        self.entry
    }

    pub fn exits(&self) -> &[BlockId] {
        &self.exits
    }

    pub fn predecessors(&self, block: BlockId) -> &[BlockId] {
        self.predecessors
            .get(&block)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn successors(&self, block: BlockId) -> &[BlockId] {
        self.successors
            .get(&block)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_reachable(&self, block: BlockId) -> bool {
        self.reachable.contains(&block)
    }

    /// Reachable blocks in definition order of the underlying function.
    pub fn reachable_blocks<'a>(
        &'a self,
        function: &'a Function,
    ) -> impl Iterator<Item = BlockId> + 'a {
        function
            .body
            .blocks
            .keys()
            .copied()
            .filter(|block| self.reachable.contains(block))
    }
}
