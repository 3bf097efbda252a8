use super::{NormalizeContext, Normalizer};
use crate::field::FieldType;
use crate::value::{Compare, ValuesBag};

/// Removes comparisons made redundant by a wider one of the same direction
///
/// Comparisons of one field are alternatives, so `>5, >10` is the same as
/// `>5`, and `>=5` covers `>5`. `<>` comparisons are left alone.
pub struct CompareNormalizer;

impl Normalizer for CompareNormalizer {
    fn name(&self) -> &'static str {
        "compare_normalizer"
    }

    fn normalize(&self, bag: &mut ValuesBag, ctx: &mut NormalizeContext<'_>) {
        if bag.comparisons().len() < 2 {
            return;
        }
        let ty = ctx.field_type();
        let comparisons = bag.comparisons();

        let is_covered = |idx: usize| {
            (0..comparisons.len())
                .any(|other| other != idx && covers(ty, &comparisons[other], &comparisons[idx]))
        };

        // Name the widest comparison, not one that is itself removed
        let removals: Vec<(usize, usize)> = (0..comparisons.len())
            .filter_map(|idx| {
                (0..comparisons.len())
                    .find(|&other| {
                        other != idx
                            && covers(ty, &comparisons[other], &comparisons[idx])
                            && !is_covered(other)
                    })
                    .map(|widest| (idx, widest))
            })
            .collect();

        if removals.is_empty() {
            return;
        }

        for &(idx, widest) in &removals {
            ctx.info(format!(
                "Comparison {} {} is already covered by {} (removed).",
                comparisons[idx],
                ctx.location(),
                comparisons[widest]
            ));
        }

        let mut idx = 0;
        bag.comparisons_mut().retain(|_| {
            let keep = !removals.iter().any(|&(removed, _)| removed == idx);
            idx += 1;
            keep
        });
    }
}

/// `wide` selects every value `narrow` selects
fn covers(ty: &dyn FieldType, wide: &Compare, narrow: &Compare) -> bool {
    let (a, b) = (wide.value.as_str(), narrow.value.as_str());

    let same_bound_wider =
        wide.operator.includes_value() && !narrow.operator.includes_value() && ty.is_equal(a, b);

    if wide.operator.is_higher_family() && narrow.operator.is_higher_family() {
        ty.is_lower(a, b) || same_bound_wider
    } else if wide.operator.is_lower_family() && narrow.operator.is_lower_family() {
        ty.is_higher(a, b) || same_bound_wider
    } else {
        false
    }
}
