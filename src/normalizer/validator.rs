use super::{NormalizeContext, Normalizer};
use crate::field::FieldType;
use crate::value::{Range, SingleValue, ValuesBag};
use regex::RegexBuilder;

/// Validates every value against the field type and stores its typed form
///
/// Invalid values are reported and stay in the bag.
pub struct Validator;

impl Normalizer for Validator {
    fn name(&self) -> &'static str {
        "validator"
    }

    fn normalize(&self, bag: &mut ValuesBag, ctx: &mut NormalizeContext<'_>) {
        let ty = ctx.field_type();

        for value in bag.single_values_mut() {
            validate_value(ty, value, ctx);
        }
        for value in bag.excluded_values_mut() {
            validate_value(ty, value, ctx);
        }
        for range in bag.ranges_mut() {
            validate_range(ty, range, ctx);
        }
        for range in bag.excluded_ranges_mut() {
            validate_range(ty, range, ctx);
        }
        for comparison in bag.comparisons_mut() {
            validate_value(ty, &mut comparison.value, ctx);
        }

        for pattern in bag.pattern_matchers() {
            if !pattern.match_type.is_regex() {
                if let Err(reason) = ty.validate(&pattern.value) {
                    ctx.error(format!(
                        "Invalid value {} {}: {}.",
                        pattern,
                        ctx.location(),
                        reason
                    ));
                }
                continue;
            }
            if let Err(err) = RegexBuilder::new(&pattern.value)
                .case_insensitive(pattern.case_insensitive)
                .build()
            {
                let reason = err.to_string().lines().last().unwrap_or_default().trim().to_string();
                ctx.error(format!(
                    "Invalid regex \"{}\" {}: {}.",
                    pattern.value,
                    ctx.location(),
                    reason
                ));
            }
        }
    }
}

fn validate_value(ty: &dyn FieldType, value: &mut SingleValue, ctx: &mut NormalizeContext<'_>) -> bool {
    match ty.validate(value.as_str()) {
        Ok(typed) => {
            value.typed = Some(typed);
            true
        }
        Err(reason) => {
            ctx.error(format!(
                "Invalid value {} {}: {}.",
                value,
                ctx.location(),
                reason
            ));
            false
        }
    }
}

fn validate_range(ty: &dyn FieldType, range: &mut Range, ctx: &mut NormalizeContext<'_>) {
    let lower_valid = validate_value(ty, &mut range.lower, ctx);
    let upper_valid = validate_value(ty, &mut range.upper, ctx);

    if lower_valid && upper_valid && !ty.is_lower(range.lower.as_str(), range.upper.as_str()) {
        ctx.error(format!(
            "Lower range-value {} {} should be lower than upper range-value {}.",
            range.lower,
            ctx.location(),
            range.upper
        ));
    }
}
