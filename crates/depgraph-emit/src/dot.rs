//! Graphviz export of the control-dependence graph.
//!
//! One `digraph` per module, with a cluster per function. An edge
//! `B -> X` means block X is control dependent on the branch point B.

use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
use depgraph_core::analysis::pdg::{FunctionDependences, ProgramDependenceGraph};
use depgraph_core::block::BlockId;
use std::io::Write;

pub struct DotEmitter;

impl DotEmitter {
    pub fn new() -> Self {
        Self
    }

    fn emit_function<W: Write>(
        &self,
        index: usize,
        name: &str,
        deps: &FunctionDependences,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        EmitHelper::write_line(writer, context, &format!("subgraph cluster_{} {{", index))?;
        context.indent();
        EmitHelper::write_line(writer, context, &format!("label = \"{}\";", name))?;

        let mut blocks: Vec<BlockId> = deps.control().keys().copied().collect();
        blocks.sort();
        for block in &blocks {
            EmitHelper::write_line(writer, context, &format!("{};", node(name, *block)))?;
        }

        for block in &blocks {
            let mut controllers: Vec<BlockId> = deps.control()[block].iter().copied().collect();
            controllers.sort();
            for controller in controllers {
                EmitHelper::write_line(
                    writer,
                    context,
                    &format!("{} -> {};", node(name, controller), node(name, *block)),
                )?;
            }
        }

        context.dedent();
        EmitHelper::write_line(writer, context, "}")?;
        Ok(())
    }
}

impl Default for DotEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for DotEmitter {
    type Item = ProgramDependenceGraph;

    fn emit<W: Write>(
        &self,
        pdg: &ProgramDependenceGraph,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        EmitHelper::write_line(writer, context, "digraph control_dependence {")?;
        context.indent();
        for (index, (name, deps)) in pdg.functions().enumerate() {
            self.emit_function(index, name, deps, writer, context)?;
        }
        context.dedent();
        EmitHelper::write_line(writer, context, "}")?;
        Ok(())
    }
}

fn node(function: &str, block: BlockId) -> String {
    format!("\"{}.{}\"", function, block)
}
