use proptest::prelude::*;
use search_filter::field::{ChoiceType, DateType, FieldConfig, FieldSet, IntegerType};
use search_filter::query::ParseOptions;
use search_filter::value::{CompareOperator, ValuesBag};
use search_filter::{SearchCondition, Severity, process_query, to_query_string};

fn fields() -> FieldSet {
    FieldSet::new()
        .with(
            FieldConfig::new("X", IntegerType)
                .accept_ranges(true)
                .accept_compares(true),
        )
        .with(
            FieldConfig::new("id", IntegerType)
                .accept_ranges(true)
                .accept_compares(true),
        )
        .with(
            FieldConfig::new("date", DateType)
                .accept_ranges(true)
                .accept_compares(true),
        )
        .with(FieldConfig::new("code", IntegerType).accept_pattern_matchers(true))
        .with(FieldConfig::new(
            "status",
            ChoiceType::new(["active", "inactive", "pending"]),
        ))
}

fn process(input: &str) -> SearchCondition {
    process_query(input, &fields(), &ParseOptions::default())
        .expect("query should parse")
        .expect("query should not be empty")
}

fn singles(bag: &ValuesBag) -> Vec<&str> {
    bag.single_values().iter().map(|v| v.as_str()).collect()
}

/// Raw bounds of the included ranges, ignoring the typed form the validator adds
fn ranges(bag: &ValuesBag) -> Vec<(&str, &str)> {
    bag.ranges()
        .iter()
        .map(|r| {
            assert!(r.lower_inclusive && r.upper_inclusive, "unexpected brackets on {r}");
            (r.lower.as_str(), r.upper.as_str())
        })
        .collect()
}

fn comparisons(bag: &ValuesBag) -> Vec<(CompareOperator, &str)> {
    bag.comparisons()
        .iter()
        .map(|c| (c.operator, c.value.as_str()))
        .collect()
}

#[test]
fn test_duplicate_range_removed_with_one_notice() {
    let condition = process("X: 2,3,10-20,10-20");
    let bag = condition.group.field("X").unwrap();

    assert_eq!(ranges(bag), vec![("10", "20")]);
    assert_eq!(singles(bag), vec!["2", "3"]);
    assert_eq!(
        condition.messages.texts(),
        vec!["Duplicate value \"10\"-\"20\" in field 'X' in group 1 (removed)."]
    );
    assert!(condition.is_valid());
}

#[test]
fn test_connected_date_ranges_are_merged() {
    let condition = process("date: 29.10.2010-10.12.2010, 10.12.2010-10.01.2011");
    let bag = condition.group.field("date").unwrap();

    assert_eq!(ranges(bag), vec![("29.10.2010", "10.01.2011")]);
    let merged: Vec<_> = condition
        .messages
        .texts()
        .into_iter()
        .filter(|text| text.contains("ranges merged to"))
        .collect();
    assert_eq!(
        merged,
        vec![
            "Ranges \"29.10.2010\"-\"10.12.2010\" and \"10.12.2010\"-\"10.01.2011\" in field 'date' \
             in group 1 are connected, ranges merged to \"29.10.2010\"-\"10.01.2011\"."
        ]
    );
}

#[test]
fn test_consecutive_values_become_a_range() {
    let condition = process("id: 1,2,3,4,5,6,7");
    let bag = condition.group.field("id").unwrap();

    assert_eq!(ranges(bag), vec![("1", "7")]);
    assert!(bag.single_values().is_empty());
    // compaction is only logged
    assert!(condition.messages.is_empty());
}

#[test]
fn test_several_runs_and_a_leftover() {
    let condition = process("id: 1,2,3,4,5,6,7,10,11,12,13,14,15,18");
    let bag = condition.group.field("id").unwrap();

    assert_eq!(ranges(bag), vec![("1", "7"), ("10", "15")]);
    assert_eq!(singles(bag), vec!["18"]);
}

#[test]
fn test_covered_comparison_removed() {
    let condition = process("date: >25.05.2010, >=25.05.2010");
    let bag = condition.group.field("date").unwrap();

    assert_eq!(
        comparisons(bag),
        vec![(CompareOperator::HigherOrEqual, "25.05.2010")]
    );
    assert_eq!(
        condition.messages.texts(),
        vec![
            "Comparison >\"25.05.2010\" in field 'date' in group 1 is already covered by \
             >=\"25.05.2010\" (removed)."
        ]
    );
}

#[test]
fn test_include_exclude_conflict_reported_once_in_either_order() {
    for query in ["date: !31.10.2010, 31.10.2010", "date: 31.10.2010, !31.10.2010"] {
        let condition = process(query);
        let errors = condition.messages.errors();

        assert_eq!(errors.len(), 1, "query: {query}");
        assert_eq!(
            errors[0].text,
            "Value \"31.10.2010\" in field 'date' in group 1 is already marked as included \
             and can't be excluded."
        );
        assert!(!condition.is_valid());
    }
}

#[test]
fn test_invalid_values_stop_later_passes() {
    let condition = process("id: x, x; date: 01.01.2010, 01.01.2010");

    let id_messages = condition.messages.for_field("id");
    assert_eq!(id_messages.len(), 2);
    assert!(id_messages.iter().all(|m| m.severity == Severity::Error));
    assert_eq!(condition.group.field("id").unwrap().single_values().len(), 2);

    // other fields are still normalized
    assert_eq!(
        condition.group.field("date").unwrap().single_values().len(),
        1
    );
}

#[test]
fn test_messages_carry_group_numbering() {
    let condition = process("id: 1; (id: 5) (id: 2, 2)");
    let message = condition.messages.iter().next().expect("one message");

    assert_eq!(message.group_index, 1);
    assert_eq!(message.nesting_level, 1);
    assert_eq!(message.field.as_deref(), Some("id"));
    assert_eq!(
        message.text,
        "Duplicate value \"2\" in field 'id' in group 2 (removed)."
    );
}

#[test]
fn test_all_choices_selected_removes_condition() {
    let condition = process("status: Active, inactive, PENDING");

    assert!(condition.group.field("status").unwrap().is_empty());
    assert_eq!(
        condition.messages.texts(),
        vec!["All possible values of field 'status' in group 1 are selected, condition removed."]
    );

    let partial = process("status: active, pending");
    assert_eq!(partial.group.field("status").unwrap().count(), 2);
    assert!(partial.messages.is_empty());
}

#[test]
fn test_pattern_operand_must_fit_the_field_type() {
    let condition = process("code: ~*abc, ~!>12");

    assert_eq!(
        condition.messages.texts(),
        vec!["Invalid value ~*\"abc\" in field 'code' in group 1: not a valid integer."]
    );
    assert!(!condition.is_valid());
}

#[test]
fn test_compaction_never_mirrors_an_opposite_range() {
    for query in ["id: !1, !2, !3, 1-3", "id: 1, 2, 3, !1-3"] {
        let first = process(query);
        assert!(first.is_valid(), "query {query}: {:?}", first.messages);

        let exported = to_query_string(&first.group);
        assert_eq!(exported, query);

        let second = process(&exported);
        assert!(second.is_valid(), "query {query}: {:?}", second.messages);
        assert_eq!(second.group, first.group);
    }
}

#[derive(Debug, Clone)]
enum Item {
    Value(i64),
    Range(i64, i64, bool, bool),
    Compare(&'static str, i64),
    Excluded(Box<Item>),
}

impl Item {
    fn render(&self) -> String {
        match self {
            Item::Excluded(item) => format!("!{}", item.render()),
            Item::Value(v) => v.to_string(),
            Item::Range(lower, upper, lower_incl, upper_incl) => format!(
                "{}{}-{}{}",
                if *lower_incl { "[" } else { "]" },
                lower,
                upper,
                if *upper_incl { "]" } else { "[" }
            ),
            Item::Compare(op, v) => format!("{op}{v}"),
        }
    }
}

fn arb_range_item() -> impl Strategy<Value = Item> {
    (0i64..40, 1i64..10, any::<bool>(), any::<bool>())
        .prop_map(|(lower, width, li, ui)| Item::Range(lower, lower + width, li, ui))
}

fn arb_item() -> impl Strategy<Value = Item> {
    prop_oneof![
        3 => (0i64..40).prop_map(Item::Value),
        2 => arb_range_item(),
        1 => (prop_oneof![Just(">"), Just(">="), Just("<"), Just("<=")], 0i64..40)
            .prop_map(|(op, v)| Item::Compare(op, v)),
        1 => (0i64..40).prop_map(|v| Item::Excluded(Box::new(Item::Value(v)))),
        1 => arb_range_item().prop_map(|range| Item::Excluded(Box::new(range))),
    ]
}

fn changed_something(condition: &SearchCondition) -> Vec<&str> {
    condition
        .messages
        .texts()
        .into_iter()
        .filter(|text| {
            text.contains("(removed)")
                || text.contains("merged to")
                || text.contains("condition removed")
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Normalizing the exported result of a normalization changes nothing
    #[test]
    fn prop_pipeline_is_idempotent(items in prop::collection::vec(arb_item(), 1..20)) {
        let query = format!(
            "id: {}",
            items.iter().map(Item::render).collect::<Vec<_>>().join(", ")
        );
        let first = process(&query);
        let exported = to_query_string(&first.group);
        let second = process(&exported);

        // include/exclude conflicts stay conflicts
        if !first.is_valid() {
            prop_assert!(
                !second.is_valid(),
                "query {} failed but its export {} passed",
                query,
                exported
            );
            return Ok(());
        }
        prop_assert!(second.is_valid(), "query {} exported as {} failed: {:?}", query, exported, second.messages);

        prop_assert_eq!(&first.group, &second.group, "query {} exported as {}", query, exported);
        prop_assert!(
            changed_something(&second).is_empty(),
            "second run of {} still changed: {:?}",
            exported,
            changed_something(&second)
        );
        prop_assert_eq!(to_query_string(&second.group), exported);
    }
}
