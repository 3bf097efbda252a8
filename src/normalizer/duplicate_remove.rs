use super::{NormalizeContext, Normalizer, remove_duplicates, same_range};
use crate::value::{PatternMatch, SingleValue, ValuesBag};

/// Removes repeated values and rejects values both included and excluded
pub struct DuplicateRemove;

impl Normalizer for DuplicateRemove {
    fn name(&self) -> &'static str {
        "duplicate_remove"
    }

    fn normalize(&self, bag: &mut ValuesBag, ctx: &mut NormalizeContext<'_>) {
        let ty = ctx.field_type();
        let mut duplicates: Vec<String> = Vec::new();

        let same_value = |a: &SingleValue, b: &SingleValue| ty.is_equal(a.as_str(), b.as_str());

        duplicates.extend(
            remove_duplicates(bag.single_values_mut(), same_value)
                .iter()
                .map(ToString::to_string),
        );
        duplicates.extend(
            remove_duplicates(bag.excluded_values_mut(), same_value)
                .iter()
                .map(ToString::to_string),
        );
        duplicates.extend(
            remove_duplicates(bag.ranges_mut(), |a, b| same_range(ty, a, b))
                .iter()
                .map(ToString::to_string),
        );
        duplicates.extend(
            remove_duplicates(bag.excluded_ranges_mut(), |a, b| same_range(ty, a, b))
                .iter()
                .map(ToString::to_string),
        );
        duplicates.extend(
            remove_duplicates(bag.comparisons_mut(), |a, b| {
                a.operator == b.operator && ty.is_equal(a.value.as_str(), b.value.as_str())
            })
            .iter()
            .map(ToString::to_string),
        );
        duplicates.extend(
            remove_duplicates(bag.pattern_matchers_mut(), same_pattern)
                .iter()
                .map(ToString::to_string),
        );

        for duplicate in duplicates {
            ctx.info(format!(
                "Duplicate value {} {} (removed).",
                duplicate,
                ctx.location()
            ));
        }

        for excluded in bag.excluded_values() {
            if bag
                .single_values()
                .iter()
                .any(|value| ty.is_equal(value.as_str(), excluded.as_str()))
            {
                ctx.error(format!(
                    "Value {} {} is already marked as included and can't be excluded.",
                    excluded,
                    ctx.location()
                ));
            }
        }

        for excluded in bag.excluded_ranges() {
            if bag.ranges().iter().any(|range| same_range(ty, range, excluded)) {
                ctx.error(format!(
                    "Range {} {} is already marked as included and can't be excluded.",
                    excluded,
                    ctx.location()
                ));
            }
        }
    }
}

fn same_pattern(a: &PatternMatch, b: &PatternMatch) -> bool {
    if a.match_type != b.match_type || a.case_insensitive != b.case_insensitive {
        return false;
    }
    if a.case_insensitive {
        a.value.to_lowercase() == b.value.to_lowercase()
    } else {
        a.value == b.value
    }
}
