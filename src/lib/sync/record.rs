use crate::catalog::FieldValue;
use crate::RECORD_FIELDS_BUFFER_SIZE;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

/// Exported product fields in configured order
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    entity_id: usize,
    fields: SmallVec<[(String, FieldValue); RECORD_FIELDS_BUFFER_SIZE]>,
}

impl Record {
    pub fn new(entity_id: usize) -> Self {
        Self {
            entity_id,
            fields: SmallVec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn entity_id(&self) -> usize {
        self.entity_id
    }

    /// First value stored under `name`
    pub fn get(&self, name: impl AsRef<str>) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name.as_ref())
            .map(|(_, value)| value)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Records of a single collection page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    page: usize,
    records: Vec<Record>,
}

impl Batch {
    pub fn new(page: usize, records: Vec<Record>) -> Self {
        Self { page, records }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
