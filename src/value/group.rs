use super::bag::ValuesBag;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// How the fields and subgroups of a group combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logical {
    #[default]
    And,
    Or,
}

impl fmt::Display for Logical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logical::And => write!(f, "AND"),
            Logical::Or => write!(f, "OR"),
        }
    }
}

/// A node of the condition tree
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValuesGroup {
    logical: Logical,
    fields: IndexMap<String, ValuesBag>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    groups: Vec<ValuesGroup>,
}

impl ValuesGroup {
    pub fn new(logical: Logical) -> Self {
        Self {
            logical,
            fields: IndexMap::new(),
            groups: Vec::new(),
        }
    }

    pub fn logical(&self) -> Logical {
        self.logical
    }

    pub fn set_logical(&mut self, logical: Logical) {
        self.logical = logical;
    }

    /// Set the bag of a field, replacing any previous one
    pub fn add_field(&mut self, name: impl Into<String>, bag: ValuesBag) -> &mut Self {
        self.fields.insert(name.into(), bag);
        self
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field(&self, name: &str) -> Option<&ValuesBag> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut ValuesBag> {
        self.fields.get_mut(name)
    }

    /// Bag of a field, created empty on first access
    pub fn field_entry(&mut self, name: &str) -> &mut ValuesBag {
        self.fields.entry(name.to_string()).or_default()
    }

    pub fn fields(&self) -> &IndexMap<String, ValuesBag> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut IndexMap<String, ValuesBag> {
        &mut self.fields
    }

    pub fn add_group(&mut self, group: ValuesGroup) -> &mut Self {
        self.groups.push(group);
        self
    }

    pub fn groups(&self) -> &[ValuesGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut Vec<ValuesGroup> {
        &mut self.groups
    }

    pub fn has_groups(&self) -> bool {
        !self.groups.is_empty()
    }

    /// True when neither this group nor any subgroup holds a value
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(ValuesBag::is_empty) && self.groups.iter().all(Self::is_empty)
    }

    /// Number of values in this group and all of its subgroups
    pub fn count_values(&self) -> usize {
        self.fields.values().map(ValuesBag::count).sum::<usize>()
            + self.groups.iter().map(Self::count_values).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_entry_creates_once() {
        let mut group = ValuesGroup::new(Logical::And);
        group.field_entry("id").add_single_value("1");
        group.field_entry("id").add_single_value("2");

        assert_eq!(group.fields().len(), 1);
        assert_eq!(group.field("id").map(ValuesBag::count), Some(2));
    }

    #[test]
    fn test_is_empty_looks_into_subgroups() {
        let mut root = ValuesGroup::default();
        let mut child = ValuesGroup::new(Logical::Or);
        assert!(root.is_empty());

        child.field_entry("name").add_single_value("foo");
        root.add_group(child);
        assert!(!root.is_empty());
        assert_eq!(root.count_values(), 1);
    }
}
