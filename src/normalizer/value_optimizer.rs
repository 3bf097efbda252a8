use super::{NormalizeContext, Normalizer};
use crate::value::ValuesBag;

/// Drops a field condition that selects every value its type allows
///
/// Which bags qualify is up to the field type, see
/// [`FieldType::covers_all`](crate::field::FieldType::covers_all).
pub struct ValueOptimizer;

impl Normalizer for ValueOptimizer {
    fn name(&self) -> &'static str {
        "value_optimizer"
    }

    fn normalize(&self, bag: &mut ValuesBag, ctx: &mut NormalizeContext<'_>) {
        if bag.is_empty() || !ctx.field_type().covers_all(bag) {
            return;
        }

        ctx.info(format!(
            "All possible values of field '{}' in group {} are selected, condition removed.",
            ctx.field.name(),
            ctx.group_index + 1
        ));
        bag.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ChoiceType, FieldConfig, IntegerType};
    use crate::message::MessageBag;
    use crate::value::Range;

    fn run(field: &FieldConfig, bag: &mut ValuesBag) -> MessageBag {
        let mut messages = MessageBag::new();
        let mut ctx = NormalizeContext::new(field, 1, 1, &mut messages);
        ValueOptimizer.normalize(bag, &mut ctx);
        messages
    }

    fn status() -> FieldConfig {
        FieldConfig::new("status", ChoiceType::new(["active", "inactive", "pending"]))
    }

    #[test]
    fn test_all_choices_selected_clears_bag() {
        let mut bag = ValuesBag::new();
        bag.add_single_value("Pending")
            .add_single_value("active")
            .add_single_value("inactive");

        let messages = run(&status(), &mut bag);

        assert!(bag.is_empty());
        assert_eq!(
            messages.texts(),
            vec!["All possible values of field 'status' in group 2 are selected, condition removed."]
        );
    }

    #[test]
    fn test_partial_selection_is_kept() {
        let mut bag = ValuesBag::new();
        bag.add_single_value("active").add_single_value("pending");

        assert!(run(&status(), &mut bag).is_empty());
        assert_eq!(bag.count(), 2);
    }

    #[test]
    fn test_other_types_never_optimized() {
        let field = FieldConfig::new("id", IntegerType);
        let mut bag = ValuesBag::new();
        bag.add_range(Range::new("1", "10"));

        assert!(run(&field, &mut bag).is_empty());
        assert_eq!(bag.count(), 1);
    }
}
