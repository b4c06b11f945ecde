//! Activation records and the call stack they live on.

use indexmap::IndexMap;

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationRecordKind {
    Program,
    Procedure,
}

impl std::fmt::Display for ActivationRecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActivationRecordKind::Program => "PROGRAM",
            ActivationRecordKind::Procedure => "PROCEDURE",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug)]
pub struct ActivationRecord {
    pub name: String,
    pub kind: ActivationRecordKind,
    pub nesting_level: u32,
    members: IndexMap<String, Value>,
}

impl ActivationRecord {
    pub fn new(name: String, kind: ActivationRecordKind, nesting_level: u32) -> Self {
        Self {
            name,
            kind,
            nesting_level,
            members: IndexMap::new(),
        }
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.members.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.members.get(name).copied()
    }
}

impl std::fmt::Display for ActivationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}: {} {}", self.nesting_level, self.kind, self.name)?;
        for (name, value) in &self.members {
            writeln!(f, "   {name:<20}: {value}")?;
        }
        Ok(())
    }
}

/// Strict LIFO call stack. Frames are torn down by [`crate::Interpreter`]
/// via an RAII guard, so a frame is popped on every exit path, including a
/// runtime error unwinding through `?`.
#[derive(Debug, Default)]
pub struct CallStack {
    records: Vec<ActivationRecord>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ActivationRecord) {
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Option<ActivationRecord> {
        self.records.pop()
    }

    pub fn peek(&self) -> &ActivationRecord {
        self.records.last().expect("call stack is never empty while a program is executing")
    }

    pub fn peek_mut(&mut self) -> &mut ActivationRecord {
        self.records
            .last_mut()
            .expect("call stack is never empty while a program is executing")
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl std::fmt::Display for CallStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CALL STACK")?;
        for record in self.records.iter().rev() {
            write!(f, "{record}")?;
        }
        Ok(())
    }
}
