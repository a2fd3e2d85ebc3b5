use crate::analysis::cfg::ControlFlowGraph;
use crate::analysis::post_dominator::PostDominators;
use crate::block::BlockId;
use crate::function::Function;
use std::collections::{HashMap, HashSet};

/// For each block, the branch points whose outcome decides whether it
/// executes. Every reachable block has an entry; the entry block's set is
/// always empty.
pub type ControlDependenceMap = HashMap<BlockId, HashSet<BlockId>>;

/// Computes control dependence from the post-dominator tree: block A is
/// control dependent on branch point B when A post-dominates one successor
/// of B but not B itself. Equivalently, starting at each successor of B and
/// walking up the post-dominator tree, every block strictly below B's
/// immediate post-dominator depends on B.
#[derive(Debug, Default)]
pub struct ControlDependenceBuilder {
    deps: ControlDependenceMap,
}

impl ControlDependenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(
        &mut self,
        function: &Function,
        cfg: &ControlFlowGraph,
        postdoms: &dyn PostDominators,
    ) {
        for block in cfg.reachable_blocks(function) {
            self.deps.entry(block).or_default();
        }

        for (&block_id, block) in &function.body.blocks {
            if !cfg.is_reachable(block_id) || !block.terminator.is_branch_point() {
                continue;
            }
            for successor in block.successors() {
                self.propagate(successor, block_id, postdoms);
            }
        }
    }

    /// Walks from `from` up the post-dominator tree until reaching the
    /// immediate post-dominator of `branch` (exclusive), marking every
    /// visited block as dependent on `branch`.
    fn propagate(&mut self, from: BlockId, branch: BlockId, postdoms: &dyn PostDominators) {
        let stop = postdoms.immediate_post_dominator(branch);
        let mut current = from;

        loop {
            if Some(current) == stop {
                break;
            }
            // Blocks outside the tree (no path to an exit) receive no
            // entries and end the walk.
            if !postdoms.contains(current) {
                break;
            }

            self.deps.entry(current).or_default().insert(branch);

            match postdoms.immediate_post_dominator(current) {
                Some(next) => current = next,
                None => break,
            }
        }
    }

    pub fn control_dependencies(&self) -> &ControlDependenceMap {
        &self.deps
    }

    pub fn into_map(self) -> ControlDependenceMap {
        self.deps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::post_dominator::PostDominatorTree;
    use crate::builder::FunctionBuilder;

    fn control_deps(function: &Function) -> ControlDependenceMap {
        let cfg = ControlFlowGraph::build(function);
        let postdoms = PostDominatorTree::build(function, &cfg);
        let mut builder = ControlDependenceBuilder::new();
        builder.run(function, &cfg, &postdoms);
        builder.into_map()
    }

    #[test]
    fn diamond_dependence() {
        let mut func = FunctionBuilder::new("diamond");
        let then_block = func.create_block();
        let else_block = func.create_block();
        let merge = func.create_block();

        let cond = func.constant_bool(true);
        func.branch(cond, then_block, else_block).unwrap();
        func.switch_to_block(then_block).unwrap();
        func.jump(merge).unwrap();
        func.switch_to_block(else_block).unwrap();
        func.jump(merge).unwrap();
        func.switch_to_block(merge).unwrap();
        func.return_void().unwrap();

        let function = func.build().unwrap();
        let entry = function.entry_block();
        let deps = control_deps(&function);

        assert_eq!(deps[&then_block], HashSet::from([entry]));
        assert_eq!(deps[&else_block], HashSet::from([entry]));
        assert!(deps[&merge].is_empty());
        assert!(deps[&entry].is_empty());
    }

    #[test]
    fn straight_line_has_no_dependence() {
        let mut func = FunctionBuilder::new("straight");
        let next = func.create_block();
        func.jump(next).unwrap();
        func.switch_to_block(next).unwrap();
        func.return_void().unwrap();

        let function = func.build().unwrap();
        let deps = control_deps(&function);

        assert_eq!(deps.len(), 2);
        assert!(deps.values().all(HashSet::is_empty));
    }

    #[test]
    fn loop_body_depends_on_header() {
        let mut func = FunctionBuilder::new("loop");
        let header = func.create_block();
        let body = func.create_block();
        let exit = func.create_block();

        func.jump(header).unwrap();
        func.switch_to_block(header).unwrap();
        let cond = func.constant_bool(true);
        func.branch(cond, body, exit).unwrap();
        func.switch_to_block(body).unwrap();
        func.jump(header).unwrap();
        func.switch_to_block(exit).unwrap();
        func.return_void().unwrap();

        let function = func.build().unwrap();
        let deps = control_deps(&function);

        // The body runs only when the header branches into it; the header
        // itself re-executes under its own control.
        assert_eq!(deps[&body], HashSet::from([header]));
        assert_eq!(deps[&header], HashSet::from([header]));
        assert!(deps[&exit].is_empty());
    }

    #[test]
    fn one_sided_branch() {
        let mut func = FunctionBuilder::new("one_sided");
        let then_block = func.create_block();
        let merge = func.create_block();

        let cond = func.constant_bool(true);
        func.branch(cond, then_block, merge).unwrap();
        func.switch_to_block(then_block).unwrap();
        func.jump(merge).unwrap();
        func.switch_to_block(merge).unwrap();
        func.return_void().unwrap();

        let function = func.build().unwrap();
        let entry = function.entry_block();
        let deps = control_deps(&function);

        assert_eq!(deps[&then_block], HashSet::from([entry]));
        assert!(deps[&merge].is_empty());
    }
}
