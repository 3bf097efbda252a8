//! Normalization passes over a parsed condition
//!
//! Every pass rewrites the [`ValuesBag`] of one field in place and reports
//! what it did as messages. The [`Pipeline`] walks the tree depth-first and
//! runs all passes on each field, in a fixed order:
//!
//! 1. [`Validator`] - type validation and range bound ordering
//! 2. [`DuplicateRemove`] - duplicate values and include/exclude conflicts
//! 3. [`RangeNormalizer`] - connected ranges, overlaps, values inside ranges
//! 4. [`ValuesToRange`] - runs of consecutive values become ranges
//! 5. [`CompareNormalizer`] - comparisons covered by other comparisons
//! 6. [`ValueOptimizer`] - type specific removal of no-op constraints
//!
//! Once a pass reports an error for a field the remaining passes skip that
//! field.

mod compare_normalizer;
mod duplicate_remove;
mod range_normalizer;
mod validator;
mod value_optimizer;
mod values_to_range;

pub use compare_normalizer::CompareNormalizer;
pub use duplicate_remove::DuplicateRemove;
pub use range_normalizer::RangeNormalizer;
pub use validator::Validator;
pub use value_optimizer::ValueOptimizer;
pub use values_to_range::ValuesToRange;

use crate::field::{FieldConfig, FieldRegistry, FieldType, ValueComparator};
use crate::message::{MessageBag, Severity};
use crate::value::{Range, ValuesBag, ValuesGroup};

/// A single normalization pass
pub trait Normalizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn normalize(&self, bag: &mut ValuesBag, ctx: &mut NormalizeContext<'_>);
}

/// Field and group a pass is working on, plus the message sink
pub struct NormalizeContext<'a> {
    pub field: &'a FieldConfig,
    pub group_index: usize,
    pub nesting_level: usize,
    messages: &'a mut MessageBag,
    errors: usize,
}

impl<'a> NormalizeContext<'a> {
    pub fn new(
        field: &'a FieldConfig,
        group_index: usize,
        nesting_level: usize,
        messages: &'a mut MessageBag,
    ) -> Self {
        Self {
            field,
            group_index,
            nesting_level,
            messages,
            errors: 0,
        }
    }

    pub fn field_type(&self) -> &'a dyn FieldType {
        self.field.field_type()
    }

    /// `in field 'name' in group 1`, shared by all message texts
    pub fn location(&self) -> String {
        format!(
            "in field '{}' in group {}",
            self.field.name(),
            self.group_index + 1
        )
    }

    pub fn info(&mut self, text: String) {
        self.push(Severity::Info, text);
    }

    pub fn error(&mut self, text: String) {
        self.errors += 1;
        self.push(Severity::Error, text);
    }

    /// Errors reported through this context
    pub fn error_count(&self) -> usize {
        self.errors
    }

    fn push(&mut self, severity: Severity, text: String) {
        log::debug!("{severity}: {text}");
        let message = match severity {
            Severity::Info => self.messages.info(text),
            Severity::Error => self.messages.error(text),
        };
        message.field = Some(self.field.name().to_string());
        message.group_index = self.group_index;
        message.nesting_level = self.nesting_level;
    }
}

/// Ordered list of passes applied to every field of a condition
pub struct Pipeline {
    passes: Vec<Box<dyn Normalizer>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(vec![
            Box::new(Validator),
            Box::new(DuplicateRemove),
            Box::new(RangeNormalizer),
            Box::new(ValuesToRange),
            Box::new(CompareNormalizer),
            Box::new(ValueOptimizer),
        ])
    }
}

impl Pipeline {
    pub fn new(passes: Vec<Box<dyn Normalizer>>) -> Self {
        Self { passes }
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Normalize the whole tree in place
    pub fn apply<R: FieldRegistry + ?Sized>(
        &self,
        group: &mut ValuesGroup,
        registry: &R,
    ) -> MessageBag {
        let mut messages = MessageBag::new();
        self.apply_group(group, registry, 0, 0, &mut messages);
        messages
    }

    fn apply_group<R: FieldRegistry + ?Sized>(
        &self,
        group: &mut ValuesGroup,
        registry: &R,
        group_index: usize,
        nesting_level: usize,
        messages: &mut MessageBag,
    ) {
        for (name, bag) in group.fields_mut() {
            let Some(field) = registry.get(name) else {
                log::warn!("no configuration for field '{name}', skipping normalization");
                continue;
            };

            let mut ctx = NormalizeContext::new(field, group_index, nesting_level, messages);
            for pass in &self.passes {
                pass.normalize(bag, &mut ctx);
                if ctx.error_count() > 0 {
                    log::debug!(
                        "pass {} failed for field '{}', skipping remaining passes",
                        pass.name(),
                        name
                    );
                    break;
                }
            }
        }

        for (idx, subgroup) in group.groups_mut().iter_mut().enumerate() {
            self.apply_group(subgroup, registry, idx, nesting_level + 1, messages);
        }
    }
}

/// Remove every item equal to an earlier one, returning the removed items
pub(crate) fn remove_duplicates<T>(items: &mut Vec<T>, same: impl Fn(&T, &T) -> bool) -> Vec<T> {
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    let mut removed = Vec::new();

    for item in items.drain(..) {
        if kept.iter().any(|existing| same(existing, &item)) {
            removed.push(item);
        } else {
            kept.push(item);
        }
    }

    *items = kept;
    removed
}

/// Same bounds and same inclusiveness
pub(crate) fn same_range<C>(cmp: &C, a: &Range, b: &Range) -> bool
where
    C: ValueComparator + ?Sized,
{
    a.lower_inclusive == b.lower_inclusive
        && a.upper_inclusive == b.upper_inclusive
        && cmp.is_equal(a.lower.as_str(), b.lower.as_str())
        && cmp.is_equal(a.upper.as_str(), b.upper.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_order() {
        assert_eq!(
            Pipeline::default().pass_names(),
            vec![
                "validator",
                "duplicate_remove",
                "range_normalizer",
                "values_to_range",
                "compare_normalizer",
                "value_optimizer",
            ]
        );
    }

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let mut items = vec![1, 2, 1, 3, 2];
        let removed = remove_duplicates(&mut items, |a, b| a == b);
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(removed, vec![1, 2]);
    }
}
