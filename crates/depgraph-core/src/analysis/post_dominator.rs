use crate::analysis::cfg::ControlFlowGraph;
use crate::{block::BlockId, function::Function};
use std::collections::{HashMap, HashSet};

/// Post-dominance queries the control-dependence builder relies on.
///
/// Blocks with no path to an exit (and unreachable blocks) are absent from
/// the tree: `contains` is false and `immediate_post_dominator` is `None`.
/// Exit blocks are in the tree; their immediate post-dominator is `None`,
/// standing in for the virtual exit joining all returns.
pub trait PostDominators {
    fn immediate_post_dominator(&self, block: BlockId) -> Option<BlockId>;
    fn post_dominates(&self, a: BlockId, b: BlockId) -> bool;
    fn contains(&self, block: BlockId) -> bool;
}

#[derive(Debug, Clone)]
pub struct PostDominatorTree {
    ipdom: HashMap<BlockId, BlockId>,
    in_tree: HashSet<BlockId>,
}

impl PostDominatorTree {
    /// Iterative set-intersection over the reverse CFG. A block's
    /// post-dominator set is itself plus the intersection of its successors'
    /// sets; blocks whose set is still undefined act as the universal set,
    /// so nodes that never reach an exit simply stay undefined.
    pub fn build(function: &Function, cfg: &ControlFlowGraph) -> Self {
        let blocks: Vec<BlockId> = cfg.reachable_blocks(function).collect();
        let exits: HashSet<BlockId> = cfg
            .exits()
            .iter()
            .copied()
            .filter(|&block| cfg.is_reachable(block))
            .collect();

        let mut pdoms: HashMap<BlockId, HashSet<BlockId>> = HashMap::new();
        for &exit in &exits {
            pdoms.insert(exit, HashSet::from([exit]));
        }

        let mut changed = true;
        while changed {
            changed = false;

            for &block in &blocks {
                if exits.contains(&block) {
                    continue;
                }

                let mut new_set: Option<HashSet<BlockId>> = None;
                for &succ in cfg.successors(block) {
                    if let Some(succ_set) = pdoms.get(&succ) {
                        new_set = Some(match new_set {
                            Some(acc) => acc.intersection(succ_set).copied().collect(),
                            None => succ_set.clone(),
                        });
                    }
                }

                if let Some(mut set) = new_set {
                    set.insert(block);
                    if pdoms.get(&block) != Some(&set) {
                        pdoms.insert(block, set);
                        changed = true;
                    }
                }
            }
        }

        let mut ipdom = HashMap::new();
        let in_tree: HashSet<BlockId> = pdoms.keys().copied().collect();

        for (&block, pdom_set) in &pdoms {
            // The immediate post-dominator is the strict post-dominator
            // post-dominated by every other strict one.
            for &candidate in pdom_set {
                if candidate == block {
                    continue;
                }

                let is_immediate = pdom_set.iter().all(|&other| {
                    other == block
                        || other == candidate
                        || pdoms
                            .get(&candidate)
                            .map_or(false, |c_pdoms| c_pdoms.contains(&other))
                });

                if is_immediate {
                    ipdom.insert(block, candidate);
                    break;
                }
            }
        }

        Self { ipdom, in_tree }
    }
}

impl PostDominators for PostDominatorTree {
    fn immediate_post_dominator(&self, block: BlockId) -> Option<BlockId> {
        self.ipdom.get(&block).copied()
    }

    fn post_dominates(&self, a: BlockId, b: BlockId) -> bool {
        if a == b {
            return self.in_tree.contains(&a);
        }

        let mut current = b;
        while let Some(next) = self.immediate_post_dominator(current) {
            if next == a {
                return true;
            }
            current = next;
        }

        false
    }

    fn contains(&self, block: BlockId) -> bool {
        self.in_tree.contains(&block)
    }
}
