//! Human-readable report over the dependence maps of a module.
//!
//! Every analyzed instruction and block shows up in the report, including
//! blocks with empty dependence sets. Output order is fully sorted so two
//! runs over the same module produce identical text.

use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
use depgraph_core::analysis::data_dependence::DependenceRecord;
use depgraph_core::analysis::memory_dependence::NonLocalDep;
use depgraph_core::analysis::pdg::{FunctionDependences, ProgramDependenceGraph};
use depgraph_core::block::BlockId;
use depgraph_core::instructions::InstRef;
use std::io::Write;

pub struct ReportEmitter;

impl ReportEmitter {
    pub fn new() -> Self {
        Self
    }

    fn emit_function<W: Write>(
        &self,
        name: &str,
        deps: &FunctionDependences,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        EmitHelper::write_section(writer, context, &format!("function {}", name))?;

        EmitHelper::write_colored_line(writer, context, "local dependences:", "yellow")?;
        context.indent();
        let mut local: Vec<(&InstRef, &DependenceRecord)> = deps.local().iter().collect();
        local.sort_by_key(|(inst, _)| **inst);
        for (inst, record) in local {
            EmitHelper::write_line(writer, context, &format_record(inst, record))?;
        }
        context.dedent();

        EmitHelper::write_colored_line(writer, context, "non-local dependences:", "yellow")?;
        context.indent();
        let mut non_local: Vec<(&InstRef, &Vec<NonLocalDep>)> = deps.non_local().iter().collect();
        non_local.sort_by_key(|(inst, _)| **inst);
        for (inst, candidates) in non_local {
            EmitHelper::write_line(writer, context, &format!("{}:", inst))?;
            context.indent();
            for candidate in candidates {
                EmitHelper::write_line(writer, context, &format_candidate(candidate))?;
            }
            context.dedent();
        }
        context.dedent();

        EmitHelper::write_colored_line(writer, context, "control dependences:", "yellow")?;
        context.indent();
        let mut control: Vec<(&BlockId, Vec<BlockId>)> = deps
            .control()
            .iter()
            .map(|(block, controllers)| {
                let mut sorted: Vec<BlockId> = controllers.iter().copied().collect();
                sorted.sort();
                (block, sorted)
            })
            .collect();
        control.sort_by_key(|(block, _)| **block);
        for (block, controllers) in control {
            let list = controllers
                .iter()
                .map(|b| b.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            EmitHelper::write_line(writer, context, &format!("{}: {{{}}}", block, list))?;
        }
        context.dedent();

        if !deps.diagnostics().is_empty() {
            EmitHelper::write_colored_line(writer, context, "diagnostics:", "yellow")?;
            context.indent();
            for diagnostic in deps.diagnostics() {
                EmitHelper::write_line(writer, context, &format!("- {}", diagnostic))?;
            }
            context.dedent();
        }

        Ok(())
    }
}

impl Default for ReportEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for ReportEmitter {
    type Item = ProgramDependenceGraph;

    fn emit<W: Write>(
        &self,
        pdg: &ProgramDependenceGraph,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        for (name, deps) in pdg.functions() {
            self.emit_function(name, deps, writer, context)?;
        }
        Ok(())
    }
}

fn format_record(inst: &InstRef, record: &DependenceRecord) -> String {
    match record.inst {
        Some(dep) => format!("{}: {} @ {}", inst, record.kind, dep),
        None => format!("{}: {}", inst, record.kind),
    }
}

fn format_candidate(candidate: &NonLocalDep) -> String {
    match candidate.dep {
        Some(dep) => format!("- {} (in {})", dep, candidate.block),
        None => format!("- entry of {} (no prior access)", candidate.block),
    }
}
