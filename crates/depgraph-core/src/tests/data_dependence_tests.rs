use crate::analysis::alias::AllocAliasAnalysis;
use crate::analysis::cfg::ControlFlowGraph;
use crate::analysis::data_dependence::{DataDependenceBuilder, DependenceKind};
use crate::analysis::memory_dependence::{
    LocalDepResult, MemoryDependenceOracle, MemoryFootprint, NonLocalDep, WalkingMemoryOracle,
};
use crate::analysis::AnalysisError;
use crate::builder::FunctionBuilder;
use crate::function::Function;
use crate::instructions::{InstRef, MemoryOrdering};
use crate::types::Type;
use pretty_assertions::assert_eq;
use std::collections::HashMap;

/// Oracle returning canned answers, for driving the builder down paths the
/// walking oracle never takes.
#[derive(Default)]
struct ScriptedOracle {
    local: HashMap<InstRef, LocalDepResult>,
    non_local: HashMap<InstRef, Vec<NonLocalDep>>,
}

impl MemoryDependenceOracle for ScriptedOracle {
    fn query_local(&self, inst: InstRef) -> LocalDepResult {
        self.local
            .get(&inst)
            .copied()
            .unwrap_or(LocalDepResult::Unknown)
    }

    fn query_non_local(&self, inst: InstRef, _footprint: &MemoryFootprint) -> Vec<NonLocalDep> {
        self.non_local.get(&inst).cloned().unwrap_or_default()
    }
}

fn run_walking(function: &Function) -> DataDependenceBuilder {
    let cfg = ControlFlowGraph::build(function);
    let aliases = AllocAliasAnalysis::build(function);
    let oracle = WalkingMemoryOracle::new(function, &cfg, &aliases);
    let mut builder = DataDependenceBuilder::new();
    builder.run(function, &oracle).unwrap();
    builder
}

#[test]
fn trivial_function_yields_entry_markers() {
    let mut func = FunctionBuilder::new("trivial");
    let a = func.alloca(Type::Uint(64), 8).unwrap();
    let b = func.alloca(Type::Uint(64), 8).unwrap();
    let _ = func.load(a, Type::Uint(64)).unwrap();
    let value = func.constant_uint(1, 64);
    func.store(b, value, Type::Uint(64)).unwrap();
    func.return_void().unwrap();

    let function = func.build().unwrap();
    let entry = function.entry_block();
    let builder = run_walking(&function);

    // Both accesses are first touches in the entry block: a marker record
    // with no dependent instruction, nothing non-local.
    let load_rec = builder.local_dependencies()[&InstRef::new(entry, 2)];
    let store_rec = builder.local_dependencies()[&InstRef::new(entry, 3)];
    assert_eq!(load_rec.kind, DependenceKind::NonFuncLocal);
    assert_eq!(load_rec.inst, None);
    assert_eq!(store_rec.kind, DependenceKind::NonFuncLocal);
    assert_eq!(store_rec.inst, None);
    assert!(builder.non_local_dependencies().is_empty());
    assert!(builder.diagnostics().is_empty());
}

#[test]
fn every_memory_access_lands_in_exactly_one_map() {
    let mut func = FunctionBuilder::new("totality");
    let p = func.param("p", Type::Ptr);
    let next = func.create_block();

    let value = func.constant_uint(9, 64);
    func.store(p.clone(), value, Type::Uint(64)).unwrap();
    let _ = func.load(p.clone(), Type::Uint(64)).unwrap();
    func.jump(next).unwrap();

    func.switch_to_block(next).unwrap();
    let _ = func.load(p.clone(), Type::Uint(64)).unwrap();
    let _ = func
        .load_ordered(p, Type::Uint(64), MemoryOrdering::Atomic)
        .unwrap();
    func.return_void().unwrap();

    let function = func.build().unwrap();
    let entry = function.entry_block();
    let builder = run_walking(&function);

    let store = InstRef::new(entry, 0);
    let local_load = InstRef::new(entry, 1);
    let cross_load = InstRef::new(next, 0);
    let atomic_load = InstRef::new(next, 1);

    let local = builder.local_dependencies();
    let non_local = builder.non_local_dependencies();

    assert!(local.contains_key(&store));
    assert!(local.contains_key(&local_load));
    assert_eq!(local[&local_load].kind, DependenceKind::Def);
    assert_eq!(local[&local_load].inst, Some(store));

    assert!(!local.contains_key(&cross_load));
    assert_eq!(
        non_local[&cross_load],
        vec![NonLocalDep {
            dep: Some(store),
            block: entry,
        }]
    );

    // The atomic load is in neither map, with exactly one diagnostic.
    assert!(!local.contains_key(&atomic_load));
    assert!(!non_local.contains_key(&atomic_load));
    assert_eq!(builder.diagnostics().len(), 1);
}

#[test]
fn ordered_store_is_skipped_with_diagnostic() {
    let mut func = FunctionBuilder::new("volatile_store");
    let p = func.param("p", Type::Ptr);
    let next = func.create_block();

    func.jump(next).unwrap();
    func.switch_to_block(next).unwrap();
    let value = func.constant_uint(2, 64);
    func.store_ordered(p, value, Type::Uint(64), MemoryOrdering::Volatile)
        .unwrap();
    func.return_void().unwrap();

    let function = func.build().unwrap();
    let builder = run_walking(&function);

    assert!(builder.local_dependencies().is_empty());
    assert!(builder.non_local_dependencies().is_empty());
    assert_eq!(builder.diagnostics().len(), 1);
}

#[test]
fn local_map_has_one_record_per_instruction() {
    let mut func = FunctionBuilder::new("single_record");
    let slot = func.alloca(Type::Uint(64), 8).unwrap();
    let value = func.constant_uint(5, 64);
    func.store(slot.clone(), value, Type::Uint(64)).unwrap();
    let _ = func.load(slot.clone(), Type::Uint(64)).unwrap();
    let _ = func.load(slot, Type::Uint(64)).unwrap();
    func.return_void().unwrap();

    let function = func.build().unwrap();
    let builder = run_walking(&function);

    // store + two loads, each with exactly one record.
    assert_eq!(builder.local_dependencies().len(), 3);
}

#[test]
fn second_pass_over_same_function_is_rejected() {
    let mut func = FunctionBuilder::new("twice");
    let slot = func.alloca(Type::Uint(64), 8).unwrap();
    let _ = func.load(slot, Type::Uint(64)).unwrap();
    func.return_void().unwrap();

    let function = func.build().unwrap();
    let cfg = ControlFlowGraph::build(&function);
    let aliases = AllocAliasAnalysis::build(&function);
    let oracle = WalkingMemoryOracle::new(&function, &cfg, &aliases);

    let mut builder = DataDependenceBuilder::new();
    builder.run(&function, &oracle).unwrap();
    let err = builder.run(&function, &oracle).unwrap_err();
    assert!(matches!(err, AnalysisError::DuplicateLocalRecord(_)));
}

#[test]
fn call_reaching_non_local_branch_is_fatal() {
    let mut func = FunctionBuilder::new("bad_oracle");
    let _ = func.call("external", vec![], true).unwrap();
    func.return_void().unwrap();

    let function = func.build().unwrap();
    let entry = function.entry_block();

    // A call may never go non-local; an oracle claiming otherwise has
    // broken the classification contract.
    let mut oracle = ScriptedOracle::default();
    oracle
        .local
        .insert(InstRef::new(entry, 0), LocalDepResult::NonLocal);

    let mut builder = DataDependenceBuilder::new();
    let err = builder.run(&function, &oracle).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::UnrecognizedMemoryInstruction(InstRef::new(entry, 0))
    );
}

#[test]
fn scripted_non_local_results_are_appended_in_order() {
    let mut func = FunctionBuilder::new("ordered_candidates");
    let p = func.param("p", Type::Ptr);
    let _ = func.load(p, Type::Uint(64)).unwrap();
    func.return_void().unwrap();

    let function = func.build().unwrap();
    let entry = function.entry_block();
    let load = InstRef::new(entry, 0);

    let candidates = vec![
        NonLocalDep {
            dep: Some(InstRef::new(entry, 7)),
            block: entry,
        },
        NonLocalDep {
            dep: None,
            block: entry,
        },
    ];

    let mut oracle = ScriptedOracle::default();
    oracle.local.insert(load, LocalDepResult::NonLocal);
    oracle.non_local.insert(load, candidates.clone());

    let mut builder = DataDependenceBuilder::new();
    builder.run(&function, &oracle).unwrap();
    assert_eq!(builder.non_local_dependencies()[&load], candidates);
}
