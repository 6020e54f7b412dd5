//! Flat key/value record used to save and restore a ribbon.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f32),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
}

/// Saved ribbon state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    values: BTreeMap<String, Value>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    pub fn put_int(&mut self, key: &str, value: i64) {
        self.put(key, Value::Int(value));
    }

    pub fn put_u32(&mut self, key: &str, value: u32) {
        self.put(key, Value::Int(value.into()));
    }

    pub fn put_float(&mut self, key: &str, value: f32) {
        self.put(key, Value::Float(value));
    }

    pub fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, Value::Bool(value));
    }

    pub fn put_text(&mut self, key: &str, value: &str) {
        self.put(key, Value::Text(value.to_string()));
    }

    pub fn put_bytes(&mut self, key: &str, value: Vec<u8>) {
        self.put(key, Value::Bytes(value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    fn require(&self, key: &str) -> Result<&Value> {
        self.values.get(key).ok_or_else(|| Error::state(key, "missing"))
    }

    pub fn int(&self, key: &str) -> Result<i64> {
        match self.require(key)? {
            Value::Int(v) => Ok(*v),
            _ => Err(Error::state(key, "expected an integer")),
        }
    }

    pub fn u32(&self, key: &str) -> Result<u32> {
        u32::try_from(self.int(key)?).map_err(|_| Error::state(key, "out of range"))
    }

    pub fn float(&self, key: &str) -> Result<f32> {
        match self.require(key)? {
            Value::Float(v) => Ok(*v),
            _ => Err(Error::state(key, "expected a float")),
        }
    }

    pub fn bool(&self, key: &str) -> Result<bool> {
        match self.require(key)? {
            Value::Bool(v) => Ok(*v),
            _ => Err(Error::state(key, "expected a boolean")),
        }
    }

    pub fn text(&self, key: &str) -> Result<&str> {
        match self.require(key)? {
            Value::Text(v) => Ok(v),
            _ => Err(Error::state(key, "expected text")),
        }
    }

    pub fn bytes(&self, key: &str) -> Result<&[u8]> {
        match self.require(key)? {
            Value::Bytes(v) => Ok(v),
            _ => Err(Error::state(key, "expected bytes")),
        }
    }
}
