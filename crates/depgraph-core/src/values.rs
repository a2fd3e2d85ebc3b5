use crate::types::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValueId(pub u32);

impl std::fmt::Display for ValueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParamId(pub u32);

impl std::fmt::Display for ParamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlobalId(pub u32);

impl std::fmt::Display for GlobalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// An SSA operand. Registers name instruction results; parameters and
/// globals enter the function from outside its body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Register(ValueId),
    Param(ParamId),
    Global(GlobalId),
    Constant(Constant),
    Undefined,
}

impl Value {
    pub fn as_register(&self) -> Option<ValueId> {
        match self {
            Value::Register(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Value::Constant(_))
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Value::Constant(c) => Some(c),
            _ => None,
        }
    }

    /// True for values that can address memory at all. Constants and
    /// `Undefined` never do in this IR.
    pub fn is_pointer_like(&self) -> bool {
        matches!(self, Value::Register(_) | Value::Param(_) | Value::Global(_))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Register(id) => write!(f, "{}", id),
            Value::Param(id) => write!(f, "{}", id),
            Value::Global(id) => write!(f, "{}", id),
            Value::Constant(c) => write!(f, "{}", c),
            Value::Undefined => write!(f, "undef"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    Bool(bool),
    Int(i64, u16),
    Uint(u64, u16),
    Null,
}

impl Constant {
    pub fn zero(ty: &Type) -> Option<Self> {
        match ty {
            Type::Bool => Some(Constant::Bool(false)),
            Type::Int(bits) => Some(Constant::Int(0, *bits)),
            Type::Uint(bits) => Some(Constant::Uint(0, *bits)),
            Type::Ptr => Some(Constant::Null),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Constant::Int(val, _) => Some(*val),
            Constant::Uint(val, _) if *val <= i64::MAX as u64 => Some(*val as i64),
            Constant::Bool(b) => Some(if *b { 1 } else { 0 }),
            _ => None,
        }
    }
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Int(val, bits) => write!(f, "{}i{}", val, bits),
            Constant::Uint(val, bits) => write!(f, "{}u{}", val, bits),
            Constant::Null => write!(f, "null"),
        }
    }
}
