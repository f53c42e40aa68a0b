use super::*;

fn fqn(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

#[test]
fn test_source_layer() {
    assert_eq!(
        classify_layer("source.jaffle_shop.raw.orders", &[]),
        Layer::Source
    );
}

#[test]
fn test_staging_layer_by_prefix() {
    assert_eq!(
        classify_layer(
            "model.jaffle_shop.stg_orders",
            &fqn(&["jaffle_shop", "staging", "stg_orders"])
        ),
        Layer::Staging
    );
}

#[test]
fn test_staging_layer_by_directory_only() {
    // No stg_ prefix; the fqn's staging directory still classifies it
    assert_eq!(
        classify_layer(
            "model.proj.cleaned_orders",
            &fqn(&["staging", "cleaned_orders"])
        ),
        Layer::Staging
    );
}

#[test]
fn test_intermediate_layer() {
    assert_eq!(
        classify_layer("model.proj.int_order_items", &[]),
        Layer::Intermediate
    );
}

#[test]
fn test_mart_layer_variants() {
    assert_eq!(classify_layer("model.proj.fct_orders", &[]), Layer::Mart);
    assert_eq!(classify_layer("model.proj.dim_customers", &[]), Layer::Mart);
    assert_eq!(
        classify_layer("model.proj.revenue", &fqn(&["marts", "revenue"])),
        Layer::Mart
    );
}

#[test]
fn test_seed_layer() {
    assert_eq!(classify_layer("seed.proj.country_codes", &[]), Layer::Seed);
}

#[test]
fn test_unmatched_is_other() {
    assert_eq!(classify_layer("model.proj.orders", &[]), Layer::Other);
}

#[test]
fn test_matching_is_case_insensitive() {
    assert_eq!(classify_layer("model.proj.STG_ORDERS", &[]), Layer::Staging);
}

#[test]
fn test_staging_wins_over_mart_by_order() {
    // Matches both .stg_ and .dim_; staging is checked first
    assert_eq!(
        classify_layer("model.proj.stg_dim_customers", &[]),
        Layer::Staging
    );
}

#[test]
fn test_layer_serde_and_display() {
    assert_eq!(serde_json::to_string(&Layer::Staging).unwrap(), "\"staging\"");
    assert_eq!(Layer::Intermediate.to_string(), "intermediate");
    assert_eq!(Layer::Other.to_string(), "other");
}

#[test]
fn test_directory_from_fqn() {
    assert_eq!(
        directory_from_fqn(&fqn(&["proj", "staging", "stg_orders"])),
        "staging"
    );
    assert_eq!(
        directory_from_fqn(&fqn(&["proj", "marts", "finance", "fct_revenue"])),
        "marts/finance"
    );
    // Too short to carry a directory
    assert_eq!(directory_from_fqn(&fqn(&["proj", "orders"])), "");
    assert_eq!(directory_from_fqn(&[]), "");
}
