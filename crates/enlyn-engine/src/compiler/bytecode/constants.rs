//! Constant pool for executable images

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A literal materialized by the VM before execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Number(f64),
    String(String),
}

/// Program-wide pool of literal values, deduplicated on insertion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstantPool {
    values: Vec<Constant>,
    #[serde(skip)]
    numbers: FxHashMap<u64, u32>,
    #[serde(skip)]
    strings: FxHashMap<String, u32>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a number constant and return its index. Numbers are keyed by
    /// bit pattern, so `0.0` and `-0.0` stay distinct.
    pub fn add_number(&mut self, value: f64) -> u32 {
        let key = value.to_bits();
        if let Some(&index) = self.numbers.get(&key) {
            return index;
        }
        let index = self.push(Constant::Number(value));
        self.numbers.insert(key, index);
        index
    }

    /// Add a string constant and return its index
    pub fn add_string(&mut self, value: &str) -> u32 {
        if let Some(&index) = self.strings.get(value) {
            return index;
        }
        let index = self.push(Constant::String(value.to_string()));
        self.strings.insert(value.to_string(), index);
        index
    }

    fn push(&mut self, constant: Constant) -> u32 {
        let index = self.values.len() as u32;
        self.values.push(constant);
        index
    }

    pub fn get(&self, index: u32) -> Option<&Constant> {
        self.values.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constant> {
        self.values.iter()
    }
}
