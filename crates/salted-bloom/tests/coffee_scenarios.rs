//! # Scenario tests for salted-bloom
//!
//! Literal oracles use SHA-256 with an empty salt, capacity 20 and 2 rounds:
//!
//! | element      | indices  |
//! |--------------|----------|
//! | Iced Coffee  | {5, 4}   |
//! | Americano    | {7, 14}  |
//! | Flat White   | {14, 3}  |
//! | Mocha        | {6, 16}  |
//! | Frappuccino  | {16, 15} |

use salted_bloom::{BloomConfigBuilder, BloomFilter, FilterError, HashAlgorithm};

const MENU: [&str; 8] = [
    "Iced Coffee",
    "Iced Coffee with Milk",
    "Espresso",
    "Espresso Macchiato",
    "Flat White",
    "Latte Macchiato",
    "Cappuccino",
    "Mocha",
];

const MORE: [&str; 5] = [
    "Iced Espresso",
    "Flat White",
    "Cappuccino",
    "Frappuccino",
    "Latte",
];

// =============================================================================
// TEST HELPERS
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn filter_of(elements: &[&str]) -> BloomFilter {
    let mut filter = BloomFilter::new(20, 2, "").expect("valid parameters");
    for element in elements {
        filter.add(element);
    }
    filter
}

// =============================================================================
// MEMBERSHIP
// =============================================================================

#[test]
fn test_single_element_lookup() {
    init_tracing();
    let filter = filter_of(&["Iced Coffee"]);

    assert!(filter.contains("Iced Coffee"));
    assert!(!filter.contains("Americano"));
    assert_eq!(filter.bits_set(), 2);
}

#[test]
fn test_full_menu() {
    init_tracing();
    let filter = filter_of(&MENU);

    for drink in MENU {
        assert!(filter.contains(drink), "False negative for {}", drink);
    }
    assert_eq!(
        filter.set_indices().collect::<Vec<_>>(),
        vec![0, 1, 3, 4, 5, 6, 7, 9, 14, 16, 17]
    );
    // Americano probes {7, 14}, both set by other drinks
    assert!(filter.contains("Americano"), "Expected false positive");
}

#[test]
fn test_bytes_and_strings_agree() {
    let mut from_str = BloomFilter::new(20, 2, "").unwrap();
    let mut from_bytes = BloomFilter::new(20, 2, "").unwrap();
    from_str.add("Mocha");
    from_bytes.add(b"Mocha");

    assert_eq!(from_str, from_bytes);
    assert_eq!(from_str.indices("Mocha"), vec![6, 16]);
}

// =============================================================================
// SET ALGEBRA
// =============================================================================

#[test]
fn test_union_of_menus() {
    init_tracing();
    let menu = filter_of(&MENU);
    let more = filter_of(&MORE);

    let union = more.union(&menu).unwrap();
    assert!(union.contains("Mocha"));
    assert!(union.contains("Frappuccino"));
    assert_eq!(union.bits_set(), 14);

    let estimate = union.estimate_cardinality().value();
    assert!((estimate - 12.039728043259359).abs() < 1e-9, "got {}", estimate);
}

#[test]
fn test_intersection_of_menus() {
    init_tracing();
    let menu = filter_of(&MENU);
    let more = filter_of(&MORE);

    let intersection = more.intersect(&menu).unwrap();
    assert!(intersection.contains("Flat White"));
    assert!(intersection.contains("Cappuccino"));
    assert_eq!(intersection.bits_set(), 6);

    let estimate = intersection.estimate_cardinality().value();
    assert!((estimate - 3.5667494393873245).abs() < 1e-9, "got {}", estimate);
}

#[test]
fn test_disjoint_sets() {
    let coffee = filter_of(&["Iced Coffee"]);
    let mocha = filter_of(&["Mocha"]);

    let union = coffee.union(&mocha).unwrap();
    assert!(union.contains("Iced Coffee"));
    assert!(union.contains("Mocha"));

    let intersection = coffee.intersect(&mocha).unwrap();
    assert!(!intersection.contains("Iced Coffee"));
    assert!(!intersection.contains("Mocha"));
    assert!(intersection.is_empty());
}

#[test]
fn test_incompatible_capacity_rejected() {
    init_tracing();
    let small = filter_of(&["Iced Coffee"]);
    let large = BloomFilter::new(40, 2, "").unwrap();

    let err = small.union(&large).unwrap_err();
    assert!(matches!(err, FilterError::IncompatibleFilters { .. }));
    assert!(err.to_string().contains("capacity 20 vs 40"));
}

#[test]
fn test_union_across_algorithms_rejected() {
    init_tracing();
    let mut murmur = BloomFilter::with_algorithm(20, 2, "", HashAlgorithm::Murmur3).unwrap();
    murmur.add("Iced Coffee");
    let sha = BloomFilter::new(20, 2, "").unwrap();

    // A merged result would hash with SHA-256 and miss the Murmur3 bits
    let err = sha.union(&murmur).unwrap_err();
    assert!(matches!(err, FilterError::IncompatibleFilters { .. }));
    assert!(err.to_string().contains("algorithm Sha256 vs Murmur3"));
}

#[test]
fn test_salt_does_not_affect_compatibility() {
    let plain = filter_of(&["Iced Coffee"]);
    let salted = BloomFilter::new(20, 2, "pepper").unwrap();

    assert!(plain.is_compatible(&salted));
    assert!(plain.union(&salted).is_ok());
}

// =============================================================================
// CONFIGURATION
// =============================================================================

#[test]
fn test_config_built_filter() {
    let config = BloomConfigBuilder::new()
        .expected_elements(200)
        .target_fpr(0.01)
        .algorithm(HashAlgorithm::Sha3_256)
        .salt("tenant-a")
        .build()
        .unwrap();
    let mut filter = BloomFilter::with_config(&config).unwrap();

    for i in 0..200 {
        filter.add(format!("user_{}", i));
    }

    let false_positives = (0..10_000)
        .filter(|i| filter.contains(format!("absent_{}", i)))
        .count();
    let observed = false_positives as f64 / 10_000.0;
    assert!(observed < 0.03, "Observed FPR {} far above target", observed);

    let estimate = filter.estimate_cardinality().value();
    assert!(
        (estimate - 200.0).abs() < 30.0,
        "Estimate {} should be near 200",
        estimate
    );
}

#[test]
fn test_saturated_estimate_is_flagged() {
    let mut filter = BloomFilter::new(8, 4, "").unwrap();
    let mut i = 0;
    while !filter.is_saturated() {
        filter.add(format!("fill_{}", i));
        i += 1;
    }

    let estimate = filter.estimate_cardinality();
    assert!(estimate.is_saturated());
    assert!(estimate.value().is_infinite());
    assert!(matches!(
        estimate.into_result(filter.capacity()),
        Err(FilterError::SaturatedEstimate { capacity: 8 })
    ));
}
