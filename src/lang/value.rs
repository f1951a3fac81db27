use serde::{Deserialize, Serialize};

/// A value as stored in a segment's constant pool.
///
/// Constants are the only place the compiler materializes data: every
/// instruction operand is a pool index, so literals, names, types, jump
/// distances and entry offsets all end up here. A pooled value is immutable
/// except for jump patching, which overwrites a placeholder integer in place
/// without moving its index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 64-bit signed integer.
    Integer(i64),

    /// 64-bit floating-point number.
    Float(f64),

    /// UTF-8 string value. Also used for variable, parameter and callee
    /// names in operand position.
    String(String),

    /// Boolean value.
    Bool(bool),

    /// The absent value: `none`.
    None,

    /// A declared type, pooled as the type operand of `DECLARE` and
    /// `FUNCTION`.
    Type(TypeDescriptor),
}

/// A type annotation as written in the source, e.g. `int` or `[float]`.
///
/// The compiler pools the name verbatim; checking it is the type layer's
/// job, consuming it is the virtual machine's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor(String);

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        TypeDescriptor(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for Value {
    /// Format a value using surface syntax.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::None => write!(f, "none"),
            Value::Type(t) => write!(f, "{}", t),
        }
    }
}
