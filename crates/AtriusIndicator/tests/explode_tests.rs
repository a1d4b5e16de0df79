use atrius_indicator_expr::explode::ExplodedCache;
use atrius_indicator_expr::{IndicatorEngine, MetadataSnapshot};
use atrius_indicator_support::ExplodeError;

fn snapshot() -> MetadataSnapshot {
    MetadataSnapshot::new()
        .with_data_element("deA", "ANC first visit", ["cocA", "cocB", "cocC"])
        .with_data_element("deB", "ANC fourth visit", ["cocB"])
        .with_data_element("deEmpty", "Orphaned element", Vec::<String>::new())
        .with_category_option_combo("cocA", "Fixed")
        .with_category_option_combo("cocB", "Outreach")
        .with_category_option_combo("cocC", "Mobile")
}

fn engine() -> IndicatorEngine {
    IndicatorEngine::from_snapshot(snapshot())
}

#[test]
fn expands_a_total_reference_into_a_parenthesized_sum() {
    let engine = engine();
    assert_eq!(
        engine.explode("#{deA}").unwrap(),
        "(#{deA.cocA}+#{deA.cocB}+#{deA.cocC})"
    );
}

#[test]
fn leaves_value_operands_and_literal_text_untouched() {
    let engine = engine();
    assert_eq!(
        engine.explode("#{deA.cocA}+2*#{deB}").unwrap(),
        "#{deA.cocA}+2*(#{deB.cocB})"
    );
}

#[test]
fn formulas_without_totals_come_back_unchanged() {
    let engine = engine();
    let formula = "#{deA.cocA}/[days]+C{c1}";
    assert_eq!(engine.explode(formula).unwrap(), formula);
}

#[test]
fn exploding_twice_equals_exploding_once() {
    let engine = engine();
    let once = engine.explode("#{deA}+#{deB.cocB}").unwrap();
    let twice = engine.explode(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn unknown_data_element_is_a_hard_error() {
    let engine = engine();
    assert_eq!(
        engine.explode("#{deX}"),
        Err(ExplodeError::UnknownDataElement("deX".to_string()))
    );
}

#[test]
fn empty_combo_set_is_a_hard_error() {
    let engine = engine();
    assert_eq!(
        engine.explode("#{deEmpty}"),
        Err(ExplodeError::NoCategoryCombos("deEmpty".to_string()))
    );
}

#[test]
fn cache_returns_the_same_text_for_the_same_version() {
    let snapshot = snapshot();
    let cache = ExplodedCache::new();

    let first = cache
        .get_or_explode("#{deA}", snapshot.version(), &snapshot)
        .unwrap();
    let second = cache
        .get_or_explode("#{deA}", snapshot.version(), &snapshot)
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
}

#[test]
fn version_bump_misses_the_cache_and_purge_drops_stale_entries() {
    let mut snapshot = snapshot();
    let cache = ExplodedCache::new();

    cache
        .get_or_explode("#{deA}", snapshot.version(), &snapshot)
        .unwrap();

    // The element loses a combo; the old exploded text is stale.
    snapshot.remove_data_element("deA");
    let mut snapshot = snapshot.with_data_element("deA", "ANC first visit", ["cocA", "cocB"]);
    snapshot.bump_version();

    let fresh = cache
        .get_or_explode("#{deA}", snapshot.version(), &snapshot)
        .unwrap();
    assert_eq!(fresh, "(#{deA.cocA}+#{deA.cocB})");
    assert_eq!(cache.len(), 2);

    cache.purge_stale(snapshot.version());
    assert_eq!(cache.len(), 1);
}
