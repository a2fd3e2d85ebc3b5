//! Fluent construction of modules and function bodies.
//!
//! Hand-wiring blocks and terminators is tedious and error-prone. The
//! builders handle value numbering and terminator bookkeeping so tests and
//! frontends can focus on program shape.

use crate::block::{BlockId, Terminator};
use crate::function::{Function, FunctionSignature, Parameter};
use crate::instructions::{CmpPred, Instruction, MemoryOrdering};
use crate::module::Module;
use crate::types::Type;
use crate::values::{Constant, ParamId, Value, ValueId};
use crate::{IrError, Result};

pub struct ModuleBuilder {
    module: Module,
}

impl ModuleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            module: Module::new(name),
        }
    }

    pub fn add_function(&mut self, function: Function) {
        self.module.add_function(function);
    }

    /// Registers an external declaration; the analysis driver skips these.
    pub fn declare_function(&mut self, name: impl Into<String>) {
        self.module
            .add_function(Function::declaration(FunctionSignature::new(name)));
    }

    pub fn build(self) -> Module {
        self.module
    }
}

pub struct FunctionBuilder {
    function: Function,
    current: BlockId,
    next_value: u32,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let function = Function::new(FunctionSignature::new(name));
        let current = function.entry_block();
        Self {
            function,
            current,
            next_value: 0,
        }
    }

    pub fn param(&mut self, name: impl Into<String>, param_type: Type) -> Value {
        let index = self.function.signature.params.len() as u32;
        self.function
            .signature
            .params
            .push(Parameter::new(name, param_type));
        Value::Param(ParamId(index))
    }

    pub fn entry_block(&self) -> BlockId {
        self.function.entry_block()
    }

    pub fn create_block(&mut self) -> BlockId {
        self.function.body.create_block()
    }

    pub fn switch_to_block(&mut self, block: BlockId) -> Result<()> {
        if self.function.body.get_block(block).is_none() {
            return Err(IrError::BuilderError(format!("unknown block {}", block)));
        }
        self.current = block;
        Ok(())
    }

    fn fresh_value(&mut self) -> Value {
        let id = ValueId(self.next_value);
        self.next_value += 1;
        Value::Register(id)
    }

    fn push(&mut self, inst: Instruction) -> Result<()> {
        let current = self.current;
        let block = self
            .function
            .body
            .get_block_mut(current)
            .ok_or_else(|| IrError::BuilderError(format!("unknown block {}", current)))?;
        if block.is_terminated() {
            return Err(IrError::BuilderError(format!(
                "cannot append to terminated block {}",
                current
            )));
        }
        block.add_instruction(inst);
        Ok(())
    }

    fn terminate(&mut self, term: Terminator) -> Result<()> {
        let current = self.current;
        let block = self
            .function
            .body
            .get_block_mut(current)
            .ok_or_else(|| IrError::BuilderError(format!("unknown block {}", current)))?;
        if block.is_terminated() {
            return Err(IrError::BuilderError(format!(
                "block {} already terminated",
                current
            )));
        }
        block.set_terminator(term);
        Ok(())
    }

    pub fn constant_bool(&self, value: bool) -> Value {
        Value::Constant(Constant::Bool(value))
    }

    pub fn constant_uint(&self, value: u64, bits: u16) -> Value {
        Value::Constant(Constant::Uint(value, bits))
    }

    pub fn alloca(&mut self, ty: Type, size: u64) -> Result<Value> {
        let result = self.fresh_value();
        self.push(Instruction::Alloca {
            result: result.clone(),
            ty,
            size,
        })?;
        Ok(result)
    }

    pub fn load(&mut self, address: Value, ty: Type) -> Result<Value> {
        self.load_ordered(address, ty, MemoryOrdering::Unordered)
    }

    pub fn load_ordered(
        &mut self,
        address: Value,
        ty: Type,
        ordering: MemoryOrdering,
    ) -> Result<Value> {
        let result = self.fresh_value();
        self.push(Instruction::Load {
            result: result.clone(),
            address,
            ty,
            ordering,
        })?;
        Ok(result)
    }

    pub fn store(&mut self, address: Value, value: Value, ty: Type) -> Result<()> {
        self.store_ordered(address, value, ty, MemoryOrdering::Unordered)
    }

    pub fn store_ordered(
        &mut self,
        address: Value,
        value: Value,
        ty: Type,
        ordering: MemoryOrdering,
    ) -> Result<()> {
        self.push(Instruction::Store {
            address,
            value,
            ty,
            ordering,
        })
    }

    pub fn va_arg(&mut self, list: Value, ty: Type) -> Result<Value> {
        let result = self.fresh_value();
        self.push(Instruction::VaArg {
            result: result.clone(),
            list,
            ty,
        })?;
        Ok(result)
    }

    pub fn call(
        &mut self,
        callee: impl Into<String>,
        args: Vec<Value>,
        returns: bool,
    ) -> Result<Option<Value>> {
        let result = if returns {
            Some(self.fresh_value())
        } else {
            None
        };
        self.push(Instruction::Call {
            result: result.clone(),
            callee: callee.into(),
            args,
        })?;
        Ok(result)
    }

    pub fn add(&mut self, left: Value, right: Value, ty: Type) -> Result<Value> {
        let result = self.fresh_value();
        self.push(Instruction::Add {
            result: result.clone(),
            left,
            right,
            ty,
        })?;
        Ok(result)
    }

    pub fn cmp(&mut self, pred: CmpPred, left: Value, right: Value) -> Result<Value> {
        let result = self.fresh_value();
        self.push(Instruction::Cmp {
            result: result.clone(),
            pred,
            left,
            right,
        })?;
        Ok(result)
    }

    pub fn jump(&mut self, target: BlockId) -> Result<()> {
        self.terminate(Terminator::Jump(target))
    }

    pub fn branch(
        &mut self,
        condition: Value,
        then_block: BlockId,
        else_block: BlockId,
    ) -> Result<()> {
        self.terminate(Terminator::Branch {
            condition,
            then_block,
            else_block,
        })
    }

    pub fn switch(
        &mut self,
        value: Value,
        default: BlockId,
        cases: Vec<(Value, BlockId)>,
    ) -> Result<()> {
        self.terminate(Terminator::Switch {
            value,
            default,
            cases,
        })
    }

    pub fn return_value(&mut self, value: Value) -> Result<()> {
        self.terminate(Terminator::Return(Some(value)))
    }

    pub fn return_void(&mut self) -> Result<()> {
        self.terminate(Terminator::Return(None))
    }

    pub fn unreachable(&mut self) -> Result<()> {
        self.terminate(Terminator::Unreachable)
    }

    pub fn build(self) -> Result<Function> {
        for (id, block) in &self.function.body.blocks {
            if !block.is_terminated() {
                return Err(IrError::BuilderError(format!(
                    "block {} has no terminator",
                    id
                )));
            }
        }
        Ok(self.function)
    }
}
