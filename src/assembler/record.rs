//! The decode record: a YAML companion to the binary artifact listing the
//! raw fields of every instruction.
//!
//! ```yaml
//! instruction_0:
//!   a: 1
//!   b: 0
//!   c: 1
//!   d: null
//! ```

use std::iter::FromIterator;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::AsmInstruction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordEntry {
    pub a: i64,
    pub b: i64,
    pub c: i64,
    pub d: Option<i64>,
}

impl From<&AsmInstruction> for RecordEntry {
    fn from(instruction: &AsmInstruction) -> Self {
        Self {
            a: i64::from(u8::from(instruction.opcode)),
            b: instruction.b,
            c: instruction.c,
            d: instruction.d,
        }
    }
}

/// Entries in input order, keyed `instruction_<index>` when serialized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeRecord {
    pub entries: Vec<RecordEntry>,
}

impl DecodeRecord {
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

impl FromIterator<RecordEntry> for DecodeRecord {
    fn from_iter<I: IntoIterator<Item = RecordEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for DecodeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (i, entry) in self.entries.iter().enumerate() {
            map.serialize_entry(&format!("instruction_{}", i), entry)?;
        }
        map.end()
    }
}
