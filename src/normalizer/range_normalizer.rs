use super::{NormalizeContext, Normalizer, remove_duplicates, same_range};
use crate::field::{FieldType, ValueComparator};
use crate::value::{Range, SingleValue, ValuesBag};
use std::cmp::Ordering;

/// Merges connected ranges and reports overlapping ranges and values that
/// already fall inside a range
///
/// Included and excluded collections are handled independently. An excluded
/// range equal to an included one is an error.
pub struct RangeNormalizer;

impl Normalizer for RangeNormalizer {
    fn name(&self) -> &'static str {
        "range_normalizer"
    }

    fn normalize(&self, bag: &mut ValuesBag, ctx: &mut NormalizeContext<'_>) {
        if !bag.has_ranges() {
            return;
        }
        let ty = ctx.field_type();

        merge_connected(ty, bag.ranges_mut(), ctx);
        report_values_in_ranges(ty, bag.single_values(), bag.ranges(), ctx);
        report_overlapping(ty, bag.ranges(), ctx);

        merge_connected(ty, bag.excluded_ranges_mut(), ctx);
        report_values_in_ranges(ty, bag.excluded_values(), bag.excluded_ranges(), ctx);
        report_overlapping(ty, bag.excluded_ranges(), ctx);

        for excluded in bag.excluded_ranges() {
            if bag.ranges().iter().any(|range| same_range(ty, range, excluded)) {
                ctx.error(format!(
                    "Excluded range {} {} also exists as normal range.",
                    excluded,
                    ctx.location()
                ));
            }
        }
    }
}

/// `b` starts where `a` ends and the shared bound is part of at least one
fn connects(ty: &dyn FieldType, a: &Range, b: &Range) -> bool {
    (a.upper_inclusive || b.lower_inclusive) && ty.is_equal(a.upper.as_str(), b.lower.as_str())
}

/// Order of two upper bounds, an inclusive bound reaching further than an
/// exclusive one on the same value
fn compare_upper(ty: &dyn FieldType, a: &Range, b: &Range) -> Ordering {
    if ty.is_higher(a.upper.as_str(), b.upper.as_str()) {
        Ordering::Greater
    } else if ty.is_lower(a.upper.as_str(), b.upper.as_str()) {
        Ordering::Less
    } else {
        a.upper_inclusive.cmp(&b.upper_inclusive)
    }
}

/// Merge connected ranges until none are left
///
/// When several ranges connect to the same one, the one reaching furthest is
/// taken, so the outcome does not depend on declaration order. The merged
/// range replaces the earlier of the two.
fn merge_connected(ty: &dyn FieldType, ranges: &mut Vec<Range>, ctx: &mut NormalizeContext<'_>) {
    loop {
        let candidate = (0..ranges.len()).find_map(|i| {
            (0..ranges.len())
                .filter(|&j| j != i && connects(ty, &ranges[i], &ranges[j]))
                .max_by(|&a, &b| compare_upper(ty, &ranges[a], &ranges[b]))
                .map(|j| (i, j))
        });

        let Some((i, j)) = candidate else {
            break;
        };

        let merged = Range::with_bounds(
            ranges[i].lower.clone(),
            ranges[j].upper.clone(),
            ranges[i].lower_inclusive,
            ranges[j].upper_inclusive,
        );

        ctx.info(format!(
            "Ranges {} and {} {} are connected, ranges merged to {}.",
            ranges[i],
            ranges[j],
            ctx.location(),
            merged
        ));

        let (keep, drop) = if i < j { (i, j) } else { (j, i) };
        ranges[keep] = merged;
        ranges.remove(drop);
    }

    // A merge can produce a range that was already given
    for duplicate in remove_duplicates(ranges, |a, b| same_range(ty, a, b)) {
        ctx.info(format!(
            "Duplicate value {} {} (removed).",
            duplicate,
            ctx.location()
        ));
    }
}

pub(crate) fn contains_value<C>(ty: &C, range: &Range, value: &str) -> bool
where
    C: ValueComparator + ?Sized,
{
    let lower = range.lower.as_str();
    let upper = range.upper.as_str();

    let above_lower =
        ty.is_higher(value, lower) || (range.lower_inclusive && ty.is_equal(value, lower));
    let below_upper =
        ty.is_lower(value, upper) || (range.upper_inclusive && ty.is_equal(value, upper));

    above_lower && below_upper
}

fn contains_range(ty: &dyn FieldType, outer: &Range, inner: &Range) -> bool {
    let lower_ok = ty.is_lower(outer.lower.as_str(), inner.lower.as_str())
        || (ty.is_equal(outer.lower.as_str(), inner.lower.as_str())
            && (outer.lower_inclusive || !inner.lower_inclusive));
    let upper_ok = ty.is_higher(outer.upper.as_str(), inner.upper.as_str())
        || (ty.is_equal(outer.upper.as_str(), inner.upper.as_str())
            && (outer.upper_inclusive || !inner.upper_inclusive));

    lower_ok && upper_ok
}

fn overlaps(ty: &dyn FieldType, a: &Range, b: &Range) -> bool {
    ty.is_lower(a.lower.as_str(), b.upper.as_str()) && ty.is_lower(b.lower.as_str(), a.upper.as_str())
}

fn report_values_in_ranges(
    ty: &dyn FieldType,
    values: &[SingleValue],
    ranges: &[Range],
    ctx: &mut NormalizeContext<'_>,
) {
    for value in values {
        if let Some(range) = ranges
            .iter()
            .find(|range| contains_value(ty, range, value.as_str()))
        {
            ctx.info(format!(
                "Value {} {} is also in range {}.",
                value,
                ctx.location(),
                range
            ));
        }
    }
}

fn report_overlapping(ty: &dyn FieldType, ranges: &[Range], ctx: &mut NormalizeContext<'_>) {
    for (i, first) in ranges.iter().enumerate() {
        for second in &ranges[i + 1..] {
            let (subject, other, wording) = if contains_range(ty, first, second) {
                (second, first, "is also in range")
            } else if contains_range(ty, second, first) {
                (first, second, "is also in range")
            } else if overlaps(ty, first, second) {
                (second, first, "is overlapping in range")
            } else {
                continue;
            };

            ctx.info(format!(
                "Range {} {} {} {}.",
                subject,
                ctx.location(),
                wording,
                other
            ));
        }
    }
}
