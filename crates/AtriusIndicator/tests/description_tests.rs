use atrius_indicator_expr::{IndicatorEngine, MetadataSnapshot};
use atrius_indicator_support::{DescriptionError, ReferenceKind};

fn engine() -> IndicatorEngine {
    let snapshot = MetadataSnapshot::new()
        .with_data_element("deA", "ANC first visit", ["cocA"])
        .with_data_element("deB", "ANC fourth visit", ["cocB"])
        .with_category_option_combo("cocA", "Fixed")
        .with_category_option_combo("cocB", "Outreach")
        .with_constant("c1", "Reporting factor", 1.5)
        .with_org_unit_group("g1", "Rural facilities", 7);
    IndicatorEngine::from_snapshot(snapshot)
}

#[test]
fn renders_value_operands_with_combo_names() {
    let engine = engine();
    assert_eq!(
        engine.describe("#{deA.cocA}+#{deB.cocB}").unwrap(),
        "ANC first visit:Fixed+ANC fourth visit:Outreach"
    );
}

#[test]
fn renders_total_references_with_the_element_name_alone() {
    let engine = engine();
    assert_eq!(engine.describe("#{deA}").unwrap(), "ANC first visit");
}

#[test]
fn renders_constants_groups_and_days() {
    let engine = engine();
    assert_eq!(
        engine.describe("OUG{g1}*C{c1}/[days]").unwrap(),
        "Rural facilities*Reporting factor/Number of days"
    );
}

#[test]
fn literal_arithmetic_passes_through_unchanged() {
    let engine = engine();
    assert_eq!(
        engine.describe("(#{deA.cocA}-2.5)*3").unwrap(),
        "(ANC first visit:Fixed-2.5)*3"
    );
}

#[test]
fn fails_fast_on_an_unknown_data_element() {
    let engine = engine();
    assert_eq!(
        engine.describe("#{deX.cocA}"),
        Err(DescriptionError::UnresolvedReference {
            kind: ReferenceKind::Operand,
            id: "deX".to_string(),
        })
    );
}

#[test]
fn fails_fast_on_an_unknown_constant() {
    let engine = engine();
    assert_eq!(
        engine.describe("2*C{cX}"),
        Err(DescriptionError::UnresolvedReference {
            kind: ReferenceKind::Constant,
            id: "cX".to_string(),
        })
    );
}

#[test]
fn fails_fast_on_an_unknown_group() {
    let engine = engine();
    assert_eq!(
        engine.describe("OUG{gX}"),
        Err(DescriptionError::UnresolvedReference {
            kind: ReferenceKind::OrgUnitGroup,
            id: "gX".to_string(),
        })
    );
}
