//! Field configuration and the registry the parser resolves names against

mod types;

pub use types::*;

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Kind of value a field may refuse to accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Range,
    Comparison,
    PatternMatch,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Range => write!(f, "ranges"),
            ValueKind::Comparison => write!(f, "comparisons"),
            ValueKind::PatternMatch => write!(f, "pattern matchers"),
        }
    }
}

/// Everything the parser and the normalizers need to know about a field
#[derive(Debug, Clone)]
pub struct FieldConfig {
    name: String,
    field_type: Arc<dyn FieldType>,
    required: bool,
    accept_ranges: bool,
    accept_compares: bool,
    accept_pattern_matchers: bool,
    discrete: bool,
}

impl FieldConfig {
    /// Create a field accepting single values only
    pub fn new(name: impl Into<String>, field_type: impl FieldType + 'static) -> Self {
        Self::with_type(name, Arc::new(field_type))
    }

    pub fn with_type(name: impl Into<String>, field_type: Arc<dyn FieldType>) -> Self {
        let discrete = field_type.as_discrete().is_some();
        Self {
            name: name.into(),
            field_type,
            required: false,
            accept_ranges: false,
            accept_compares: false,
            accept_pattern_matchers: false,
            discrete,
        }
    }

    pub fn required(mut self, value: bool) -> Self {
        self.required = value;
        self
    }

    pub fn accept_ranges(mut self, value: bool) -> Self {
        self.accept_ranges = value;
        self
    }

    pub fn accept_compares(mut self, value: bool) -> Self {
        self.accept_compares = value;
        self
    }

    pub fn accept_pattern_matchers(mut self, value: bool) -> Self {
        self.accept_pattern_matchers = value;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &dyn FieldType {
        self.field_type.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn accepts(&self, kind: ValueKind) -> bool {
        match kind {
            ValueKind::Range => self.accept_ranges,
            ValueKind::Comparison => self.accept_compares,
            ValueKind::PatternMatch => self.accept_pattern_matchers,
        }
    }

    /// Whether the type exposes successor semantics (checked once at construction)
    pub fn is_discrete(&self) -> bool {
        self.discrete
    }
}

/// Resolves canonical field names to their configuration
pub trait FieldRegistry {
    fn has(&self, name: &str) -> bool;
    fn get(&self, name: &str) -> Option<&FieldConfig>;
    /// Fields that must appear in every group
    fn required_fields(&self) -> Vec<&FieldConfig>;
}

/// Ordered set of fields, looked up case-insensitively
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    fields: IndexMap<String, FieldConfig>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: FieldConfig) -> &mut Self {
        self.fields.insert(field.name().to_lowercase(), field);
        self
    }

    pub fn with(mut self, field: FieldConfig) -> Self {
        self.add(field);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldConfig> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldRegistry for FieldSet {
    fn has(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_lowercase())
    }

    fn get(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.get(&name.to_lowercase())
    }

    fn required_fields(&self) -> Vec<&FieldConfig> {
        self.fields.values().filter(|f| f.is_required()).collect()
    }
}
