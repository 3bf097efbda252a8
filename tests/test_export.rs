use proptest::prelude::*;
use search_filter::field::{FieldConfig, FieldSet, IntegerType, TextType};
use search_filter::value::{
    Compare, CompareOperator, Logical, PatternMatch, PatternMatchType, Range, ValuesBag,
    ValuesGroup,
};
use search_filter::{ParseOptions, parse_query, process_query, to_query_string};

fn text_field(name: &str) -> FieldConfig {
    FieldConfig::new(name, TextType)
        .accept_ranges(true)
        .accept_compares(true)
        .accept_pattern_matchers(true)
}

fn fields() -> FieldSet {
    FieldSet::new()
        .with(text_field("name"))
        .with(text_field("tag"))
        .with(
            FieldConfig::new("id", IntegerType)
                .accept_ranges(true)
                .accept_compares(true),
        )
}

fn reparse(group: &ValuesGroup) -> ValuesGroup {
    let exported = to_query_string(group);
    parse_query(&exported, &fields())
        .unwrap_or_else(|err| panic!("exported query {exported:?} failed: {err}"))
        .expect("exported query is not empty")
}

#[test]
fn test_export_normalized_query() {
    let condition = process_query("id: 3, 1, 2, 2, >10, >=10", &fields(), &ParseOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(to_query_string(&condition.group), "id: 1-3, >=10");
}

#[test]
fn test_export_quotes_what_the_lexer_would_split() {
    let mut bag = ValuesBag::new();
    bag.add_single_value("foo bar")
        .add_single_value("a;b")
        .add_excluded_value("")
        .add_range(Range::with_bounds("-1", "x\"y", false, true))
        .add_comparison(Compare::new(CompareOperator::NotEqual, "(x)"))
        .add_pattern_match(
            PatternMatch::new("^a.*$", PatternMatchType::Regex).case_insensitive(true),
        );
    let mut group = ValuesGroup::new(Logical::And);
    group.add_field("name", bag);

    assert_eq!(
        to_query_string(&group),
        r#"name: "foo bar", "a;b", !"", ]"-1"-"x""y"], <>"(x)", ~i?"^a.*$""#
    );
    assert_eq!(reparse(&group), group);
}

#[test]
fn test_export_nested_groups() {
    let group = parse_query("name: a; *(tag: b; (name: ~!>c)); (tag: d)", &fields())
        .unwrap()
        .unwrap();

    let exported = to_query_string(&group);
    assert_eq!(exported, "name: a; *(tag: b; (name: ~!>c)); (tag: d)");
    assert_eq!(reparse(&group), group);
}

#[test]
fn test_export_skips_emptied_fields() {
    let mut group = ValuesGroup::new(Logical::And);
    group.add_field("name", ValuesBag::new());
    group.field_entry("tag").add_single_value("x");

    assert_eq!(to_query_string(&group), "tag: x");
}

#[test]
fn test_export_keeps_empty_groups_in_place() {
    let condition = process_query("id: 1; (); *(); (id: 2, 2)", &fields(), &ParseOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(
        condition.messages.texts(),
        vec!["Duplicate value \"2\" in field 'id' in group 4 (removed)."]
    );

    let exported = to_query_string(&condition.group);
    assert_eq!(exported, "id: 1; (); *(); (id: 2)");

    let again = process_query(&exported, &fields(), &ParseOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(again.group, condition.group);
    assert_eq!(again.group.groups()[3].field("id").unwrap().count(), 1);
}

fn arb_text() -> impl Strategy<Value = String> {
    "[ -~]{0,8}"
}

fn arb_pattern_type() -> impl Strategy<Value = PatternMatchType> {
    prop_oneof![
        Just(PatternMatchType::Contains),
        Just(PatternMatchType::StartsWith),
        Just(PatternMatchType::EndsWith),
        Just(PatternMatchType::Regex),
        Just(PatternMatchType::NotContains),
        Just(PatternMatchType::NotStartsWith),
        Just(PatternMatchType::NotEndsWith),
        Just(PatternMatchType::NotRegex),
    ]
}

fn arb_operator() -> impl Strategy<Value = CompareOperator> {
    prop_oneof![
        Just(CompareOperator::Lower),
        Just(CompareOperator::LowerOrEqual),
        Just(CompareOperator::NotEqual),
        Just(CompareOperator::Higher),
        Just(CompareOperator::HigherOrEqual),
    ]
}

#[derive(Debug, Clone)]
enum Entry {
    Single(String),
    Excluded(String),
    Range(Range),
    ExcludedRange(Range),
    Compare(Compare),
    Pattern(PatternMatch),
}

fn arb_range() -> impl Strategy<Value = Range> {
    (arb_text(), arb_text(), any::<bool>(), any::<bool>())
        .prop_map(|(lower, upper, li, ui)| Range::with_bounds(lower.as_str(), upper.as_str(), li, ui))
}

fn arb_entry() -> impl Strategy<Value = Entry> {
    prop_oneof![
        arb_text().prop_map(Entry::Single),
        arb_text().prop_map(Entry::Excluded),
        arb_range().prop_map(Entry::Range),
        arb_range().prop_map(Entry::ExcludedRange),
        (arb_operator(), arb_text())
            .prop_map(|(op, v)| Entry::Compare(Compare::new(op, v.as_str()))),
        (arb_text(), arb_pattern_type(), any::<bool>()).prop_map(|(v, ty, ci)| {
            Entry::Pattern(PatternMatch::new(v, ty).case_insensitive(ci))
        }),
    ]
}

fn arb_bag() -> impl Strategy<Value = ValuesBag> {
    prop::collection::vec(arb_entry(), 1..6).prop_map(|entries| {
        let mut bag = ValuesBag::new();
        for entry in entries {
            match entry {
                Entry::Single(v) => bag.add_single_value(v.as_str()),
                Entry::Excluded(v) => bag.add_excluded_value(v.as_str()),
                Entry::Range(r) => bag.add_range(r),
                Entry::ExcludedRange(r) => bag.add_excluded_range(r),
                Entry::Compare(c) => bag.add_comparison(c),
                Entry::Pattern(p) => bag.add_pattern_match(p),
            };
        }
        bag
    })
}

/// One or both text fields, each with a non-empty bag
fn arb_fields() -> impl Strategy<Value = Vec<(&'static str, ValuesBag)>> {
    prop_oneof![
        arb_bag().prop_map(|bag| vec![("name", bag)]),
        arb_bag().prop_map(|bag| vec![("tag", bag)]),
        (arb_bag(), arb_bag()).prop_map(|(a, b)| vec![("tag", a), ("name", b)]),
    ]
}

fn build_group(logical: Logical, fields: Vec<(&'static str, ValuesBag)>) -> ValuesGroup {
    let mut group = ValuesGroup::new(logical);
    for (name, bag) in fields {
        group.add_field(name, bag);
    }
    group
}

fn arb_group() -> impl Strategy<Value = ValuesGroup> {
    let fields_or_nothing = prop_oneof![
        4 => arb_fields(),
        1 => Just(Vec::new()),
    ];
    let subgroup = (any::<bool>(), fields_or_nothing).prop_map(|(or, fields)| {
        build_group(if or { Logical::Or } else { Logical::And }, fields)
    });

    (arb_fields(), prop::collection::vec(subgroup, 0..3)).prop_map(|(fields, subgroups)| {
        let mut group = build_group(Logical::And, fields);
        for subgroup in subgroups {
            group.add_group(subgroup);
        }
        group
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Parsing an exported tree gives back the same tree
    #[test]
    fn prop_export_round_trip(group in arb_group()) {
        let exported = to_query_string(&group);
        let parsed = parse_query(&exported, &fields());

        match parsed {
            Ok(Some(parsed)) => {
                prop_assert_eq!(parsed, group, "exported: {}", exported);
            }
            Ok(None) => {
                prop_assert!(false, "exported query is empty: {:?}", group);
            }
            Err(err) => {
                prop_assert!(false, "failed to parse {}: {}", exported, err);
            }
        }
    }
}
