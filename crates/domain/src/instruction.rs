//! Instruction value objects - the serializable script representation
//!
//! An [`Instruction`] is a pure-data `(op, args)` tuple. Behavior lives in
//! the engine's op registry, never in the instruction itself, so every
//! tree round-trips through JSON unchanged. Arguments nest further
//! instructions, literals, lists, and keyed option maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One interpretable operation: a registered name plus its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub op: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
}

impl Instruction {
    pub fn new(op: impl Into<String>) -> Self {
        Self {
            op: op.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(op: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            op: op.into(),
            args,
        }
    }

    /// Builder-style argument append.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Required argument at `index`, whatever its shape.
    pub fn require_arg(&self, index: usize, expected: &'static str) -> Result<&Value, DomainError> {
        self.args
            .get(index)
            .ok_or_else(|| DomainError::missing_arg(&self.op, index, expected))
    }

    /// Required text argument at `index`.
    pub fn text_arg(&self, index: usize) -> Result<&str, DomainError> {
        match self.require_arg(index, "text")? {
            Value::Text(s) => Ok(s),
            _ => Err(DomainError::bad_arg(&self.op, index, "text")),
        }
    }

    /// Required integer argument at `index`.
    pub fn int_arg(&self, index: usize) -> Result<i64, DomainError> {
        match self.require_arg(index, "integer")? {
            Value::Int(n) => Ok(*n),
            _ => Err(DomainError::bad_arg(&self.op, index, "integer")),
        }
    }

    /// Optional integer argument at `index`.
    pub fn opt_int_arg(&self, index: usize) -> Result<Option<i64>, DomainError> {
        match self.args.get(index) {
            None => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(_) => Err(DomainError::bad_arg(&self.op, index, "integer")),
        }
    }

    /// Required nested instruction at `index`.
    pub fn instr_arg(&self, index: usize) -> Result<&Instruction, DomainError> {
        match self.require_arg(index, "instruction")? {
            Value::Instr(i) => Ok(i),
            _ => Err(DomainError::bad_arg(&self.op, index, "instruction")),
        }
    }

    /// Required list argument at `index`.
    pub fn list_arg(&self, index: usize) -> Result<&[Value], DomainError> {
        match self.require_arg(index, "list")? {
            Value::List(items) => Ok(items),
            _ => Err(DomainError::bad_arg(&self.op, index, "list")),
        }
    }

    /// Keyed options map, conventionally the trailing argument
    /// (e.g. `{ "hidden": true }`). Absent map reads as empty.
    pub fn options(&self) -> Option<&BTreeMap<String, Value>> {
        self.args.iter().rev().find_map(|v| match v {
            Value::Map(m) => Some(m),
            _ => None,
        })
    }

    /// Boolean flag from the trailing options map, defaulting to false.
    pub fn flag(&self, key: &str) -> bool {
        self.options()
            .and_then(|m| m.get(key))
            .is_some_and(Value::is_truthy)
    }
}

/// A literal or nested value inside an instruction's argument list.
///
/// Untagged so the serialized form is plain structured data: strings,
/// numbers, booleans, arrays, and objects only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Instr(Box<Instruction>),
    Map(BTreeMap<String, Value>),
    List(Vec<Value>),
}

impl Value {
    /// Script-level truthiness: null, false, zero, empty text, and empty
    /// lists are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Text(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Instr(_) | Value::Map(_) => true,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_instr(&self) -> Option<&Instruction> {
        match self {
            Value::Instr(i) => Some(i),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Instruction> for Value {
    fn from(value: Instruction) -> Self {
        Value::Instr(Box::new(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Vec<Instruction>> for Value {
    fn from(value: Vec<Instruction>) -> Self {
        Value::List(value.into_iter().map(Value::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_tree() -> Instruction {
        Instruction::new("cond")
            .arg(Instruction::new("hasItem").arg("coin"))
            .arg(Instruction::new("seq").arg(vec![
                Value::from(Instruction::new("text").arg("You pay.")),
                Value::from(Instruction::new("addItem").arg("coin").arg(-1)),
            ]))
            .arg(Instruction::new("text").arg("You are broke."))
    }

    #[test]
    fn instruction_tree_round_trips_through_json() {
        let tree = nested_tree();
        let json = serde_json::to_string(&tree).expect("serialize");
        let back: Instruction = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, tree);
    }

    #[test]
    fn deeply_nested_control_flow_round_trips() {
        let tree = Instruction::new("when")
            .arg(Instruction::new("random").arg(vec![
                Value::from(nested_tree()),
                Value::from(Instruction::new("unless").arg(nested_tree()).arg(vec![
                    Value::from(Instruction::new("seq").arg(Vec::<Value>::new())),
                ])),
            ]))
            .arg(vec![Value::from(nested_tree())]);
        let json = serde_json::to_value(&tree).expect("serialize");
        let back: Instruction = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, tree);
    }

    #[test]
    fn options_map_is_found_and_plain_map_stays_map() {
        let mut opts = BTreeMap::new();
        opts.insert("hidden".to_string(), Value::Bool(true));
        let instr = Instruction::new("addStat")
            .arg("Fitness")
            .arg(5)
            .arg(Value::Map(opts));
        assert!(instr.flag("hidden"));
        assert!(!instr.flag("silent"));

        // A map without an "op" key must deserialize back as a map, not
        // an instruction.
        let json = serde_json::to_string(&instr).expect("serialize");
        let back: Instruction = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, instr);
    }

    #[test]
    fn missing_and_mistyped_args_are_fatal() {
        let instr = Instruction::new("setTimer");
        assert!(matches!(
            instr.text_arg(0),
            Err(DomainError::MissingArg { .. })
        ));
        let instr = Instruction::new("addStat").arg(5);
        assert!(matches!(instr.text_arg(0), Err(DomainError::BadArg { .. })));
    }

    #[test]
    fn truthiness_follows_script_semantics() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Text(String::new()).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(Value::Int(-3).is_truthy());
        assert!(Value::Text("x".into()).is_truthy());
    }
}
