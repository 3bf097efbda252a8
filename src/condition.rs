//! Parse and normalize in one step

use crate::field::FieldRegistry;
use crate::message::MessageBag;
use crate::normalizer::Pipeline;
use crate::query::{ParseOptions, QueryError, QueryParser};
use crate::value::ValuesGroup;
use serde::Serialize;

/// A normalized condition together with the diagnostics collected on the way
#[derive(Debug, Clone, Serialize)]
pub struct SearchCondition {
    #[serde(rename = "condition")]
    pub group: ValuesGroup,
    pub messages: MessageBag,
}

impl SearchCondition {
    /// No error was reported; informational messages are fine
    pub fn is_valid(&self) -> bool {
        !self.messages.has_errors()
    }
}

/// Parse `input` and run the default normalization pipeline on the result
///
/// Structural problems (syntax, unknown fields, limits) fail the whole call.
/// Problems with individual values end up in [`SearchCondition::messages`].
/// Empty input yields `Ok(None)`.
pub fn process_query<R: FieldRegistry + ?Sized>(
    input: &str,
    registry: &R,
    options: &ParseOptions,
) -> Result<Option<SearchCondition>, QueryError> {
    process_query_with(input, registry, options, &Pipeline::default())
}

/// Like [`process_query`] with a custom pipeline
pub fn process_query_with<R: FieldRegistry + ?Sized>(
    input: &str,
    registry: &R,
    options: &ParseOptions,
    pipeline: &Pipeline,
) -> Result<Option<SearchCondition>, QueryError> {
    let parser = QueryParser::new(registry).with_options(*options);
    let Some(mut group) = parser.parse(input)? else {
        return Ok(None);
    };

    let messages = pipeline.apply(&mut group, registry);
    log::info!(
        "processed condition: {} values, {} messages ({} errors)",
        group.count_values(),
        messages.len(),
        messages.errors().len()
    );

    Ok(Some(SearchCondition { group, messages }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldConfig, FieldSet, IntegerType};
    use crate::normalizer::Validator;

    fn fields() -> FieldSet {
        FieldSet::new().with(FieldConfig::new("id", IntegerType).accept_ranges(true))
    }

    #[test]
    fn test_empty_input_is_no_condition() {
        let result = process_query("   ", &fields(), &ParseOptions::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_value_errors_do_not_fail_processing() {
        let condition = process_query("id: 1, x", &fields(), &ParseOptions::default())
            .unwrap()
            .unwrap();

        assert!(!condition.is_valid());
        assert_eq!(condition.messages.errors().len(), 1);
    }

    #[test]
    fn test_custom_pipeline() {
        let pipeline = Pipeline::new(vec![Box::new(Validator)]);
        let condition =
            process_query_with("id: 1, 2, 3, 3", &fields(), &ParseOptions::default(), &pipeline)
                .unwrap()
                .unwrap();

        assert!(condition.is_valid());
        assert!(condition.messages.is_empty());
        assert_eq!(condition.group.field("id").unwrap().single_values().len(), 4);
    }
}
