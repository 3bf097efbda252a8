use super::range_normalizer::contains_value;
use super::{NormalizeContext, Normalizer, same_range};
use crate::field::DiscreteValues;
use crate::value::{Range, SingleValue, ValuesBag};
use std::cmp::Ordering;

/// Shortest run of consecutive values turned into a range
const MIN_RUN: usize = 3;

/// Replaces runs of consecutive values with a range, for discrete field types
///
/// `1, 2, 3, 4` becomes `1-4`. Values outside a run keep their order.
pub struct ValuesToRange;

impl Normalizer for ValuesToRange {
    fn name(&self) -> &'static str {
        "values_to_range"
    }

    fn normalize(&self, bag: &mut ValuesBag, ctx: &mut NormalizeContext<'_>) {
        if !ctx.field.is_discrete() {
            return;
        }
        let Some(discrete) = ctx.field_type().as_discrete() else {
            return;
        };

        let included = bag.ranges().to_vec();
        let excluded = bag.excluded_ranges().to_vec();

        let ranges = collapse_runs(discrete, bag.single_values_mut(), &included, &excluded);
        log_compacted(ctx, &ranges, "values");
        bag.ranges_mut().extend(ranges);

        let ranges = collapse_runs(discrete, bag.excluded_values_mut(), &excluded, &included);
        log_compacted(ctx, &ranges, "excluded values");
        bag.excluded_ranges_mut().extend(ranges);
    }
}

fn log_compacted(ctx: &NormalizeContext<'_>, ranges: &[Range], what: &str) {
    for range in ranges {
        log::debug!("{what} {range} {} compacted into a range", ctx.location());
    }
}

fn compare(ty: &dyn DiscreteValues, a: &SingleValue, b: &SingleValue) -> Ordering {
    if ty.is_lower(a.as_str(), b.as_str()) {
        Ordering::Less
    } else if ty.is_higher(a.as_str(), b.as_str()) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

fn is_successor(ty: &dyn DiscreteValues, value: &SingleValue, next: &SingleValue) -> bool {
    ty.next_value(value.as_str())
        .is_some_and(|expected| ty.is_equal(&expected, next.as_str()))
}

/// Inside `range` or equal to one of its bounds
fn touches(ty: &dyn DiscreteValues, range: &Range, value: &SingleValue) -> bool {
    contains_value(ty, range, value.as_str())
        || ty.is_equal(value.as_str(), range.lower.as_str())
        || ty.is_equal(value.as_str(), range.upper.as_str())
}

/// Take every run of at least [`MIN_RUN`] consecutive values out of `values`
/// and return them as ranges, lowest first
///
/// Values touching one of `existing` stay single, so a new range never
/// connects to or duplicates a range that is already there. A run that would
/// become a range equal to one of `opposite` is left as values, since the
/// same range can't be both included and excluded.
fn collapse_runs(
    ty: &dyn DiscreteValues,
    values: &mut Vec<SingleValue>,
    existing: &[Range],
    opposite: &[Range],
) -> Vec<Range> {
    let mut order: Vec<usize> = (0..values.len())
        .filter(|&idx| !existing.iter().any(|range| touches(ty, range, &values[idx])))
        .collect();
    if order.len() < MIN_RUN {
        return Vec::new();
    }
    order.sort_by(|&a, &b| compare(ty, &values[a], &values[b]));

    let mut taken = vec![false; values.len()];
    let mut ranges = Vec::new();
    let mut start = 0;

    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && is_successor(ty, &values[order[end]], &values[order[end + 1]])
        {
            end += 1;
        }

        if end - start + 1 >= MIN_RUN {
            let range = Range::new(values[order[start]].clone(), values[order[end]].clone());
            if opposite.iter().any(|other| same_range(ty, other, &range)) {
                log::debug!("run {range} kept as values, the opposite side has the same range");
            } else {
                ranges.push(range);
                for &idx in &order[start..=end] {
                    taken[idx] = true;
                }
            }
        }
        start = end + 1;
    }

    if !ranges.is_empty() {
        let mut idx = 0;
        values.retain(|_| {
            let keep = !taken[idx];
            idx += 1;
            keep
        });
    }

    ranges
}
