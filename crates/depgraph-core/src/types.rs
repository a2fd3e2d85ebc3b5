use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Bool,
    Int(u16),
    Uint(u16),
    Ptr,
    Void,
}

impl Type {
    pub fn size_bytes(&self) -> Option<u64> {
        match self {
            Type::Bool => Some(1),
            Type::Int(bits) | Type::Uint(bits) => Some((*bits as u64 + 7) / 8),
            Type::Ptr => Some(8),
            Type::Void => None,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Ptr)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Int(bits) => write!(f, "i{}", bits),
            Type::Uint(bits) => write!(f, "u{}", bits),
            Type::Ptr => write!(f, "ptr"),
            Type::Void => write!(f, "void"),
        }
    }
}
