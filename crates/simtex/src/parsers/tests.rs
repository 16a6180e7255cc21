//! Unit tests for the input parsers.

use rstest::rstest;

use super::*;

fn values(parser: &dyn InputParser, input: &str) -> Vec<Value> {
    parser.parse(input).expect("parse").into_values()
}

// ---------------------------------------------------------------------------
// raw / single_value
// ---------------------------------------------------------------------------

#[rstest]
#[case("")]
#[case("hello world")]
#[case("  padded  ")]
fn raw_passes_input_through(#[case] input: &str) {
    assert_eq!(values(&raw(), input), vec![Value::Text(input.to_owned())]);
}

#[rstest]
#[case(ValueType::Int, " 42 ", Value::Int(42))]
#[case(ValueType::Float, "2.5", Value::Float(2.5))]
#[case(ValueType::Bool, "Yes", Value::Bool(true))]
#[case(ValueType::Bool, "off", Value::Bool(false))]
#[case(ValueType::Text, " kept ", Value::Text(String::from(" kept ")))]
fn single_value_converts_whole_input(
    #[case] target: ValueType,
    #[case] input: &str,
    #[case] expected: Value,
) {
    assert_eq!(values(&single_value(target), input), vec![expected]);
}

#[test]
fn single_value_reports_offending_token() {
    let error = single_value(ValueType::Int)
        .parse("abc")
        .expect_err("not an integer");
    assert!(matches!(
        &error,
        ParseError::Conversion { token, target: ValueType::Int, .. } if token == "abc"
    ));
    assert!(error.to_string().contains("'abc'"));
}

// ---------------------------------------------------------------------------
// mult_values
// ---------------------------------------------------------------------------

#[test]
fn typed_list_converts_each_position() {
    let parser = mult_values([ValueType::Int, ValueType::Int]);
    assert_eq!(values(&parser, "3 4"), vec![Value::Int(3), Value::Int(4)]);
}

#[test]
fn typed_list_rejects_short_input() {
    let parser = mult_values([ValueType::Int, ValueType::Int]);
    let error = parser.parse("3").expect_err("one token for two types");
    assert_eq!(error, ParseError::arity(Arity::Exactly(2), 1));
}

#[test]
fn typed_list_rejects_long_input() {
    let parser = mult_values(vec![ValueType::Int]);
    let error = parser.parse("1 2").expect_err("two tokens for one type");
    assert_eq!(error, ParseError::arity(Arity::Exactly(1), 2));
}

#[test]
fn mixed_types_follow_their_positions() {
    let parser = mult_values([ValueType::Text, ValueType::Float, ValueType::Bool]);
    assert_eq!(
        values(&parser, "label 1.5 true"),
        vec![
            Value::Text(String::from("label")),
            Value::Float(1.5),
            Value::Bool(true),
        ]
    );
}

#[test]
fn single_type_accepts_any_count_with_custom_separator() {
    let parser = mult_values(ValueType::Float).separator(",");
    assert_eq!(
        values(&parser, "1,2,3"),
        vec![Value::Float(1.0), Value::Float(2.0), Value::Float(3.0)]
    );
}

#[test]
fn empty_input_yields_no_tokens() {
    let parser = mult_values(ValueType::Float).separator(",");
    assert!(parser.parse("").expect("empty").is_empty());

    let error = mult_values([ValueType::Int])
        .parse("")
        .expect_err("no tokens for one type");
    assert_eq!(error, ParseError::arity(Arity::Exactly(1), 0));
}

#[test]
fn conversion_failure_names_token_and_type() {
    let parser = mult_values(ValueType::Int).separator(",");
    let error = parser.parse("1,x,3").expect_err("x is not an integer");
    assert!(matches!(
        error,
        ParseError::Conversion { ref token, target: ValueType::Int, .. } if token == "x"
    ));
}

#[test]
fn adjacent_literal_separators_yield_empty_tokens() {
    let parser = mult_values(ValueType::Text);
    assert_eq!(
        values(&parser, "a  b"),
        vec![
            Value::Text(String::from("a")),
            Value::Text(String::new()),
            Value::Text(String::from("b")),
        ]
    );
}

#[rstest]
#[case(Separator::Whitespace)]
#[case(Separator::from(""))]
fn whitespace_separator_collapses_runs(#[case] separator: Separator) {
    let parser = mult_values(ValueType::Int).separator(separator);
    assert_eq!(
        values(&parser, " 1 \t 2\n3 "),
        vec![Value::Int(1), Value::Int(2), Value::Int(3)]
    );
}

// ---------------------------------------------------------------------------
// Custom parsers and argument access
// ---------------------------------------------------------------------------

#[test]
fn closures_are_parsers() {
    let reversed = |input: &str| -> Result<Arguments, ParseError> {
        Ok(input.split('|').rev().map(Value::from).collect())
    };
    assert_eq!(
        values(&reversed, "a|b"),
        vec![Value::from("b"), Value::from("a")]
    );
}

#[test]
fn typed_accessors_report_mismatches() {
    let arguments = mult_values([ValueType::Int, ValueType::Text])
        .parse("7 seven")
        .expect("parse");
    assert_eq!(arguments.int(0), Ok(7));
    assert_eq!(arguments.float(0), Ok(7.0));
    assert_eq!(
        arguments.int(1),
        Err(ArgumentError::WrongType {
            index: 1,
            expected: ValueType::Int,
            actual: ValueType::Text,
        })
    );
    assert_eq!(
        arguments.text(2),
        Err(ArgumentError::Missing { index: 2, len: 2 })
    );
    assert_eq!(
        arguments.expect_len(3),
        Err(ArgumentError::Count {
            expected: 3,
            actual: 2
        })
    );
}

#[rstest]
#[case("TRUE", true)]
#[case("1", true)]
#[case("no", false)]
#[case(" 0 ", false)]
fn bool_literals(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(ValueType::Bool.convert(input), Ok(Value::Bool(expected)));
}

#[test]
fn bool_rejects_other_words() {
    assert!(ValueType::Bool.convert("maybe").is_err());
}
