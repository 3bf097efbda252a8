use super::entities::{Compare, PatternMatch, Range, SingleValue};
use serde::Serialize;

/// All values given for one field within a group
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValuesBag {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    single_values: Vec<SingleValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    excluded_values: Vec<SingleValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ranges: Vec<Range>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    excluded_ranges: Vec<Range>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    comparisons: Vec<Compare>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pattern_matchers: Vec<PatternMatch>,
}

impl ValuesBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_single_value(&mut self, value: impl Into<SingleValue>) -> &mut Self {
        self.single_values.push(value.into());
        self
    }

    pub fn add_excluded_value(&mut self, value: impl Into<SingleValue>) -> &mut Self {
        self.excluded_values.push(value.into());
        self
    }

    pub fn add_range(&mut self, range: Range) -> &mut Self {
        self.ranges.push(range);
        self
    }

    pub fn add_excluded_range(&mut self, range: Range) -> &mut Self {
        self.excluded_ranges.push(range);
        self
    }

    pub fn add_comparison(&mut self, comparison: Compare) -> &mut Self {
        self.comparisons.push(comparison);
        self
    }

    pub fn add_pattern_match(&mut self, pattern: PatternMatch) -> &mut Self {
        self.pattern_matchers.push(pattern);
        self
    }

    pub fn single_values(&self) -> &[SingleValue] {
        &self.single_values
    }

    pub fn excluded_values(&self) -> &[SingleValue] {
        &self.excluded_values
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn excluded_ranges(&self) -> &[Range] {
        &self.excluded_ranges
    }

    pub fn comparisons(&self) -> &[Compare] {
        &self.comparisons
    }

    pub fn pattern_matchers(&self) -> &[PatternMatch] {
        &self.pattern_matchers
    }

    pub fn single_values_mut(&mut self) -> &mut Vec<SingleValue> {
        &mut self.single_values
    }

    pub fn excluded_values_mut(&mut self) -> &mut Vec<SingleValue> {
        &mut self.excluded_values
    }

    pub fn ranges_mut(&mut self) -> &mut Vec<Range> {
        &mut self.ranges
    }

    pub fn excluded_ranges_mut(&mut self) -> &mut Vec<Range> {
        &mut self.excluded_ranges
    }

    pub fn comparisons_mut(&mut self) -> &mut Vec<Compare> {
        &mut self.comparisons
    }

    pub fn pattern_matchers_mut(&mut self) -> &mut Vec<PatternMatch> {
        &mut self.pattern_matchers
    }

    pub fn has_ranges(&self) -> bool {
        !self.ranges.is_empty() || !self.excluded_ranges.is_empty()
    }

    /// Total number of values of every kind
    pub fn count(&self) -> usize {
        self.single_values.len()
            + self.excluded_values.len()
            + self.ranges.len()
            + self.excluded_ranges.len()
            + self.comparisons.len()
            + self.pattern_matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn clear(&mut self) {
        self.single_values.clear();
        self.excluded_values.clear();
        self.ranges.clear();
        self.excluded_ranges.clear();
        self.comparisons.clear();
        self.pattern_matchers.clear();
    }
}
