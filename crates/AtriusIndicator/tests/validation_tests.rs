use atrius_indicator_expr::{IndicatorEngine, MetadataSnapshot};
use atrius_indicator_support::Violation;

fn snapshot() -> MetadataSnapshot {
    MetadataSnapshot::new()
        .with_data_element("deA", "ANC first visit", ["cocA", "cocB"])
        .with_data_element("deB", "ANC fourth visit", ["cocB"])
        .with_category_option_combo("cocA", "Fixed")
        .with_category_option_combo("cocB", "Outreach")
        .with_constant("c1", "Reporting factor", 1.5)
        .with_org_unit_group("g1", "Rural facilities", 7)
}

fn engine() -> IndicatorEngine {
    IndicatorEngine::from_snapshot(snapshot())
}

#[test]
fn accepts_a_formula_using_every_reference_kind() {
    let engine = engine();
    let formula = "#{deA.cocA}+#{deB}*C{c1}-OUG{g1}/[days]";
    assert_eq!(engine.validate(formula), Ok(()));
}

#[test]
fn reports_unknown_data_element() {
    let engine = engine();
    assert_eq!(
        engine.validate("#{deX.cocA}+2"),
        Err(Violation::DataElementNotFound("deX".to_string()))
    );
    // Total-form references check the data element too.
    assert_eq!(
        engine.validate("#{deX}"),
        Err(Violation::DataElementNotFound("deX".to_string()))
    );
}

#[test]
fn reports_unknown_category_option_combo() {
    let engine = engine();
    assert_eq!(
        engine.validate("#{deA.cocX}"),
        Err(Violation::CategoryOptionComboNotFound("cocX".to_string()))
    );
}

#[test]
fn reports_unknown_constant_and_group() {
    let engine = engine();
    assert_eq!(
        engine.validate("C{cX}*2"),
        Err(Violation::ConstantNotFound("cX".to_string()))
    );
    assert_eq!(
        engine.validate("OUG{gX}*2"),
        Err(Violation::OrgUnitGroupNotFound("gX".to_string()))
    );
}

#[test]
fn reports_empty_formulas() {
    let engine = engine();
    assert_eq!(engine.validate(""), Err(Violation::EmptyExpression));
    assert_eq!(engine.validate("   "), Err(Violation::EmptyExpression));
}

#[test]
fn reports_malformed_arithmetic_after_references_resolve() {
    let engine = engine();
    assert!(matches!(
        engine.validate("#{deA.cocA}+"),
        Err(Violation::MalformedArithmetic(_))
    ));
    assert!(matches!(
        engine.validate("(#{deA.cocA}"),
        Err(Violation::MalformedArithmetic(_))
    ));
}

#[test]
fn unmatched_reference_syntax_stays_literal_and_fails_arithmetic() {
    let engine = engine();
    // A trailing dot never matches the operand grammar; the scanner
    // passes it through and the residue fails the arithmetic check.
    assert!(matches!(
        engine.validate("#{deA.}+1"),
        Err(Violation::MalformedArithmetic(_))
    ));
}

#[test]
fn first_unresolved_reference_short_circuits() {
    let engine = engine();
    // Both references are unknown; the operand pass runs first.
    assert_eq!(
        engine.validate("#{deX.cocA}+C{cX}"),
        Err(Violation::DataElementNotFound("deX".to_string()))
    );
}

#[test]
fn validation_is_deterministic() {
    let engine = engine();
    let formula = "#{deA.cocA}+C{c1}";
    assert_eq!(engine.validate(formula), engine.validate(formula));
}

#[test]
fn removing_a_referenced_identifier_flips_the_outcome() {
    let formula = "#{deB.cocB}*C{c1}";

    let mut snapshot = snapshot();
    assert_eq!(
        IndicatorEngine::from_snapshot(snapshot.clone()).validate(formula),
        Ok(())
    );

    snapshot.remove_data_element("deB");
    assert_eq!(
        IndicatorEngine::from_snapshot(snapshot).validate(formula),
        Err(Violation::DataElementNotFound("deB".to_string()))
    );
}

#[test]
fn validation_never_mutates_the_formula() {
    let engine = engine();
    let formula = "#{deA.cocA}+1".to_string();
    let before = formula.clone();
    let _ = engine.validate(&formula);
    assert_eq!(formula, before);
}
