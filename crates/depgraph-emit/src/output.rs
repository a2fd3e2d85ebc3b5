use crate::config::EmitterConfig;
use crate::dot::DotEmitter;
use crate::emitter::Emitter;
use crate::report::ReportEmitter;
use anyhow::Result;
use depgraph_core::analysis::pdg::{FunctionDependences, ProgramDependenceGraph};
use serde_json::{json, Value};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Dot,
    Json,
}

/// Writes a full module report in the requested format.
pub fn write_report<W: Write>(
    pdg: &ProgramDependenceGraph,
    format: OutputFormat,
    config: &EmitterConfig,
    writer: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let mut context = config.context();
            ReportEmitter::new().emit(pdg, writer, &mut context)
        }
        OutputFormat::Dot => {
            let mut context = config.context();
            context.use_colors = false;
            DotEmitter::new().emit(pdg, writer, &mut context)
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, &to_json(pdg))?;
            writeln!(writer)?;
            Ok(())
        }
    }
}

/// The three maps plus diagnostics as JSON record lists, sorted for
/// deterministic output. Map keys become explicit fields because
/// instruction handles are not valid JSON object keys.
pub fn to_json(pdg: &ProgramDependenceGraph) -> Value {
    let mut functions = serde_json::Map::new();
    for (name, deps) in pdg.functions() {
        functions.insert(name.to_string(), function_to_json(deps));
    }
    json!({ "functions": Value::Object(functions) })
}

fn function_to_json(deps: &FunctionDependences) -> Value {
    let mut local: Vec<_> = deps.local().iter().collect();
    local.sort_by_key(|(inst, _)| **inst);
    let local: Vec<Value> = local
        .into_iter()
        .map(|(inst, record)| json!({ "inst": inst, "record": record }))
        .collect();

    let mut non_local: Vec<_> = deps.non_local().iter().collect();
    non_local.sort_by_key(|(inst, _)| **inst);
    let non_local: Vec<Value> = non_local
        .into_iter()
        .map(|(inst, candidates)| json!({ "inst": inst, "candidates": candidates }))
        .collect();

    let mut control: Vec<_> = deps
        .control()
        .iter()
        .map(|(block, controllers)| {
            let mut sorted: Vec<_> = controllers.iter().copied().collect();
            sorted.sort();
            (*block, sorted)
        })
        .collect();
    control.sort_by_key(|(block, _)| *block);
    let control: Vec<Value> = control
        .into_iter()
        .map(|(block, controllers)| json!({ "block": block, "controllers": controllers }))
        .collect();

    json!({
        "local": local,
        "non_local": non_local,
        "control": control,
        "diagnostics": deps.diagnostics(),
    })
}
