//! Domain-separated random oracle, grounded on
//! `original_source/ro/ro.go`.
//!
//! The Go source accumulates named inputs in a bare `map[string][]byte`
//! and hashes them in whatever order that map happens to iterate in —
//! which Go does not guarantee is stable. Two logically identical
//! dealings could then hash to two different byte strings. Here, named
//! inputs are kept in a `BTreeMap` so hashing always proceeds in
//! lexicographic name order regardless of the order they were added in,
//! which is what every prover/verifier pair actually needs to agree on.

use crate::curve::{expand_message_xmd, hash_to_curve_ro, hash_to_scalar, Point, Scalar};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

const TYPE_BYTES: u8 = 0;
const TYPE_POINT: u8 = 1;
const TYPE_SCALAR: u8 = 2;
const TYPE_U32: u8 = 3;
const TYPE_U64: u8 = 4;

/// Accumulates named, typed inputs under one domain separator and
/// produces a scalar, a byte string, or a point from them.
pub struct RandomOracle {
    domain_separator: String,
    inputs: BTreeMap<&'static str, Vec<u8>>,
}

impl RandomOracle {
    pub fn new(domain_separator: impl Into<String>) -> Self {
        RandomOracle {
            domain_separator: domain_separator.into(),
            inputs: BTreeMap::new(),
        }
    }

    fn add_input(&mut self, name: &'static str, type_byte: u8, bytes: &[u8]) -> Result<()> {
        if name.is_empty() || name.len() > 255 {
            return Err(Error::InvalidArguments(format!(
                "random oracle input name '{name}' has invalid length"
            )));
        }
        if self.inputs.contains_key(name) {
            return Err(Error::InvalidArguments(format!(
                "random oracle input '{name}' added twice"
            )));
        }
        let mut encoded = Vec::with_capacity(5 + bytes.len());
        encoded.push(type_byte);
        encoded.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
        encoded.extend_from_slice(bytes);
        self.inputs.insert(name, encoded);
        Ok(())
    }

    pub fn add_bytes_string(&mut self, name: &'static str, bytes: &[u8]) -> Result<()> {
        self.add_input(name, TYPE_BYTES, bytes)
    }

    pub fn add_point(&mut self, name: &'static str, point: &Point) -> Result<()> {
        self.add_input(name, TYPE_POINT, &point.to_tagged_bytes())
    }

    pub fn add_points(&mut self, name: &'static str, points: &[Point]) -> Result<()> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(points.len() as u32).to_be_bytes());
        for p in points {
            let tagged = p.to_tagged_bytes();
            buf.extend_from_slice(&(tagged.len() as u32).to_be_bytes());
            buf.extend_from_slice(&tagged);
        }
        self.add_input(name, TYPE_POINT, &buf)
    }

    pub fn add_scalar(&mut self, name: &'static str, scalar: &Scalar) -> Result<()> {
        self.add_input(name, TYPE_SCALAR, &scalar.to_tagged_bytes())
    }

    pub fn add_u32(&mut self, name: &'static str, value: u32) -> Result<()> {
        self.add_input(name, TYPE_U32, &value.to_be_bytes())
    }

    pub fn add_u64(&mut self, name: &'static str, value: u64) -> Result<()> {
        self.add_input(name, TYPE_U64, &value.to_be_bytes())
    }

    /// Canonical byte string formed from every added input, in sorted
    /// name order, matching `formRoInput` minus its ordering bug.
    fn form_input(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for (name, encoded) in &self.inputs {
            buf.extend_from_slice(&(name.len() as u32).to_be_bytes());
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(encoded);
        }
        buf
    }

    pub fn output_scalar(self) -> Result<Scalar> {
        hash_to_scalar(self.domain_separator.as_bytes(), &self.form_input())
    }

    pub fn output_byte_string(self, len: usize) -> Result<Vec<u8>> {
        expand_message_xmd(&self.form_input(), self.domain_separator.as_bytes(), len)
    }

    pub fn output_point(self) -> Result<Point> {
        hash_to_curve_ro(self.domain_separator.as_bytes(), &self.form_input())
    }
}
