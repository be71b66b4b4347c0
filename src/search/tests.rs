//! Behavioural tests for product search.

use std::str::FromStr;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use jiff_diesel::ToDiesel;
use proptest::prelude::*;

use super::*;
use crate::error::{AppError, AppResult};
use crate::models::{CategoryRef, Product};

// ============================================================================
// Fixtures
// ============================================================================

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn minutes_after_epoch(minutes: i64) -> jiff_diesel::DateTime {
    let base = jiff::civil::date(2024, 1, 1).at(0, 0, 0, 0);
    base.checked_add(jiff::Span::new().minutes(minutes))
        .unwrap()
        .to_diesel()
}

/// A plain product; `id` also orders `created_at` so higher ids are newer.
fn product(id: i64, name: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: None,
        price: dec("10.00"),
        stock: 5,
        image_url: None,
        brand: None,
        model: None,
        weight: None,
        dimensions: None,
        active: true,
        featured: false,
        created_at: minutes_after_epoch(id),
        updated_at: minutes_after_epoch(id),
    }
}

fn category(id: i64, name: &str) -> CategoryRef {
    CategoryRef {
        id,
        name: name.to_string(),
    }
}

fn rows(product: Product, categories: &[CategoryRef]) -> Vec<CatalogRow> {
    if categories.is_empty() {
        return vec![CatalogRow {
            product,
            category: None,
        }];
    }
    categories
        .iter()
        .map(|c| CatalogRow {
            product: product.clone(),
            category: Some(c.clone()),
        })
        .collect()
}

fn run(criteria: &SearchCriteria, rows: Vec<CatalogRow>) -> SearchPage {
    SearchEvaluator::new(criteria).evaluate(rows, PageRequest::new(0, 100))
}

fn ids(page: &SearchPage) -> Vec<i64> {
    page.items.iter().map(|s| s.product.id).collect()
}

/// Runs the whole search in memory, the way a store is expected to.
struct InMemoryCatalog {
    rows: Vec<CatalogRow>,
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn fetch_page(&self, criteria: &SearchCriteria, page: PageRequest) -> AppResult<CatalogPage> {
        let result = SearchEvaluator::new(criteria).evaluate(self.rows.clone(), page);
        Ok(CatalogPage {
            total_count: result.total_count,
            rows: result
                .items
                .into_iter()
                .flat_map(|summary| rows(summary.product, &summary.categories))
                .collect(),
        })
    }
}

/// Returns the same page whatever is asked.
struct FixedPage {
    page: CatalogPage,
}

#[async_trait]
impl CatalogSource for FixedPage {
    async fn fetch_page(&self, _criteria: &SearchCriteria, _page: PageRequest) -> AppResult<CatalogPage> {
        Ok(self.page.clone())
    }
}

struct UnreachableCatalog;

#[async_trait]
impl CatalogSource for UnreachableCatalog {
    async fn fetch_page(&self, _criteria: &SearchCriteria, _page: PageRequest) -> AppResult<CatalogPage> {
        Err(AppError::Database {
            operation: "search products".to_string(),
            source: anyhow::anyhow!("connection refused"),
        })
    }
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_brand_filter_is_case_insensitive_contains() {
    let mut catalog = Vec::new();
    catalog.extend(rows(
        Product {
            brand: Some("Apple".to_string()),
            ..product(1, "iPhone 15")
        },
        &[],
    ));
    catalog.extend(rows(
        Product {
            brand: Some("Samsung".to_string()),
            ..product(2, "Galaxy S24")
        },
        &[],
    ));
    catalog.extend(rows(product(3, "Unbranded cable"), &[]));

    let criteria = SearchCriteria {
        brand: Some("apple".to_string()),
        ..Default::default()
    };
    let page = run(&criteria, catalog);

    assert_eq!(ids(&page), vec![1]);
    assert_eq!(page.total_count, 1);
}

#[test]
fn test_price_range_is_inclusive() {
    let catalog: Vec<CatalogRow> = [("99.99", 1), ("100.00", 2), ("250.00", 3), ("500.00", 4), ("500.01", 5)]
        .into_iter()
        .flat_map(|(price, id)| {
            rows(
                Product {
                    price: dec(price),
                    ..product(id, "Widget")
                },
                &[],
            )
        })
        .collect();

    let criteria = SearchCriteria {
        min_price: Some(dec("100")),
        max_price: Some(dec("500")),
        ..Default::default()
    };
    let page = run(&criteria, catalog);

    assert_eq!(ids(&page), vec![4, 3, 2]);
}

#[test]
fn test_single_bound_leaves_other_side_open() {
    let catalog: Vec<CatalogRow> = [(0, 1), (10, 2), (1000, 3)]
        .into_iter()
        .flat_map(|(stock, id)| {
            rows(
                Product {
                    stock,
                    ..product(id, "Widget")
                },
                &[],
            )
        })
        .collect();

    let criteria = SearchCriteria {
        min_stock: Some(10),
        ..Default::default()
    };
    assert_eq!(ids(&run(&criteria, catalog)), vec![3, 2]);
}

#[test]
fn test_inverted_price_range_yields_empty_result() {
    let catalog = rows(
        Product {
            price: dec("50"),
            ..product(1, "Widget")
        },
        &[],
    );
    let criteria = SearchCriteria {
        min_price: Some(dec("100")),
        max_price: Some(dec("10")),
        ..Default::default()
    };

    let page = run(&criteria, catalog);
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);
}

#[test]
fn test_weight_filter_excludes_products_without_weight() {
    let mut catalog = rows(product(1, "Weightless"), &[]);
    catalog.extend(rows(
        Product {
            weight: Some(dec("1.250")),
            ..product(2, "Laptop")
        },
        &[],
    ));

    let criteria = SearchCriteria {
        max_weight: Some(dec("2")),
        ..Default::default()
    };
    assert_eq!(ids(&run(&criteria, catalog)), vec![2]);
}

#[test]
fn test_boolean_filters_match_exactly() {
    let mut catalog = rows(
        Product {
            featured: true,
            ..product(1, "Featured")
        },
        &[],
    );
    catalog.extend(rows(
        Product {
            active: false,
            featured: true,
            ..product(2, "Retired")
        },
        &[],
    ));
    catalog.extend(rows(product(3, "Plain"), &[]));

    let criteria = SearchCriteria {
        active: Some(true),
        featured: Some(true),
        ..Default::default()
    };
    assert_eq!(ids(&run(&criteria, catalog.clone())), vec![1]);

    let inactive = SearchCriteria {
        active: Some(false),
        ..Default::default()
    };
    assert_eq!(ids(&run(&inactive, catalog)), vec![2]);
}

#[test]
fn test_substring_filter_never_matches_missing_column() {
    let mut catalog = rows(product(1, "No dimensions"), &[]);
    catalog.extend(rows(
        Product {
            dimensions: Some("10 x 20 x 5 cm".to_string()),
            ..product(2, "Boxed")
        },
        &[],
    ));

    let criteria = SearchCriteria {
        dimensions: Some("20 X 5".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&run(&criteria, catalog)), vec![2]);
}

#[test]
fn test_substring_filter_keeps_leading_space() {
    let mut catalog = rows(product(1, "ProMax"), &[]);
    catalog.extend(rows(product(2, "Phone Pro"), &[]));

    let criteria = SearchCriteria {
        name: Some(" Pro".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&run(&criteria, catalog)), vec![2]);
}

#[test]
fn test_category_name_matches_case_insensitively() {
    let electronics = category(1, "Electronics");
    let books = category(2, "Books");
    let mut catalog = rows(product(1, "Headphones"), &[electronics]);
    catalog.extend(rows(product(2, "Novel"), &[books]));
    catalog.extend(rows(product(3, "Loose item"), &[]));

    let criteria = SearchCriteria {
        category_names: vec!["electronics".to_string()],
        ..Default::default()
    };
    assert_eq!(ids(&run(&criteria, catalog)), vec![1]);
}

#[test]
fn test_category_ids_and_names_are_alternatives() {
    let mut catalog = rows(product(1, "Headphones"), &[category(1, "Electronics")]);
    catalog.extend(rows(product(2, "Novel"), &[category(2, "Books")]));
    catalog.extend(rows(product(3, "Sofa"), &[category(3, "Furniture")]));

    let criteria = SearchCriteria {
        category_ids: vec![2],
        category_names: vec!["ELECTRONICS".to_string()],
        ..Default::default()
    };
    assert_eq!(ids(&run(&criteria, catalog)), vec![2, 1]);
}

// ============================================================================
// Free text and relevance
// ============================================================================

#[test]
fn test_free_text_ranks_name_match_above_description_match() {
    let mut catalog = rows(product(1, "iPhone 15"), &[]);
    // Newer, so it would come first without relevance.
    catalog.extend(rows(
        Product {
            description: Some("Case compatible with the iPhone line".to_string()),
            ..product(2, "Slim case")
        },
        &[],
    ));
    catalog.extend(rows(product(3, "Toaster"), &[]));

    let criteria = SearchCriteria {
        free_text_query: Some("iphone".to_string()),
        ..Default::default()
    };
    let page = run(&criteria, catalog);

    assert_eq!(ids(&page), vec![1, 2]);
    assert_eq!(page.items[0].relevance_score, Some(NAME_WEIGHT));
    assert_eq!(page.items[1].relevance_score, Some(DESCRIPTION_WEIGHT));
}

#[test]
fn test_relevance_adds_weight_per_matching_category() {
    let catalog = rows(
        Product {
            brand: Some("Phoneco".to_string()),
            ..product(1, "Charger")
        },
        &[
            category(1, "Phone accessories"),
            category(2, "Smartphones"),
            category(3, "Kitchen"),
        ],
    );

    let criteria = SearchCriteria {
        free_text_query: Some("PHONE".to_string()),
        ..Default::default()
    };
    let page = run(&criteria, catalog);

    assert_eq!(page.items.len(), 1);
    assert_eq!(
        page.items[0].relevance_score,
        Some(BRAND_WEIGHT + 2.0 * CATEGORY_WEIGHT)
    );
}

#[test]
fn test_free_text_matches_category_name_only() {
    let mut catalog = rows(product(1, "Desk"), &[category(1, "Office Furniture")]);
    catalog.extend(rows(product(2, "Lamp"), &[category(2, "Lighting")]));

    let criteria = SearchCriteria {
        free_text_query: Some("furniture".to_string()),
        ..Default::default()
    };
    let page = run(&criteria, catalog);

    assert_eq!(ids(&page), vec![1]);
    assert_eq!(page.items[0].relevance_score, Some(CATEGORY_WEIGHT));
}

#[test]
fn test_relevance_absent_without_free_text() {
    let page = run(&SearchCriteria::default(), rows(product(1, "Widget"), &[]));
    assert_eq!(page.items[0].relevance_score, None);
}

#[test]
fn test_explicit_sort_wins_over_relevance() {
    let mut catalog = rows(
        Product {
            price: dec("900"),
            ..product(1, "Phone Pro")
        },
        &[],
    );
    catalog.extend(rows(
        Product {
            price: dec("100"),
            description: Some("A phone".to_string()),
            ..product(2, "Budget")
        },
        &[],
    ));

    let criteria = SearchCriteria {
        free_text_query: Some("phone".to_string()),
        sort_field: Some("price".to_string()),
        sort_direction: Some("asc".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&run(&criteria, catalog)), vec![2, 1]);
}

// ============================================================================
// Deduplication, ordering and paging
// ============================================================================

#[test]
fn test_product_in_two_categories_appears_once() {
    let catalog = rows(
        product(7, "Tablet"),
        &[category(1, "Electronics"), category(4, "Tablets")],
    );

    let page = run(&SearchCriteria::default(), catalog);

    assert_eq!(page.total_count, 1);
    assert_eq!(page.items.len(), 1);
    let summary = &page.items[0];
    assert_eq!(summary.categories.len(), 2);
    assert!(summary.category_names().contains("Electronics"));
    assert!(summary.category_names().contains("Tablets"));
    assert_eq!(summary.category_names().matches(", ").count(), 1);
    assert_eq!(summary.category_ids(), "1, 4");
}

#[test]
fn test_duplicate_join_rows_collapse() {
    let phones = category(1, "Phones");
    let mut catalog = rows(product(1, "Phone"), &[phones.clone()]);
    catalog.extend(rows(product(1, "Phone"), &[phones]));

    let page = run(&SearchCriteria::default(), catalog);
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].categories.len(), 1);
}

#[test]
fn test_empty_criteria_returns_everything_newest_first() {
    let catalog: Vec<CatalogRow> = [3, 1, 4, 2]
        .into_iter()
        .flat_map(|id| rows(product(id, "Item"), &[]))
        .collect();

    let page = run(&SearchCriteria::default(), catalog);
    assert_eq!(ids(&page), vec![4, 3, 2, 1]);
    assert_eq!(page.total_count, 4);
}

#[test]
fn test_unknown_sort_field_falls_back_to_created_at() {
    let catalog: Vec<CatalogRow> = [1, 2, 3]
        .into_iter()
        .flat_map(|id| rows(product(id, "Item"), &[]))
        .collect();
    let criteria = SearchCriteria {
        sort_field: Some("popularity".to_string()),
        sort_direction: Some("asc".to_string()),
        ..Default::default()
    };

    assert_eq!(ids(&run(&criteria, catalog)), vec![3, 2, 1]);
}

#[test]
fn test_sort_by_name_ascending_ignores_case() {
    let catalog: Vec<CatalogRow> = [(1, "banana"), (2, "Apple"), (3, "cherry")]
        .into_iter()
        .flat_map(|(id, name)| rows(product(id, name), &[]))
        .collect();
    let criteria = SearchCriteria {
        sort_field: Some("name".to_string()),
        sort_direction: Some("asc".to_string()),
        ..Default::default()
    };

    assert_eq!(ids(&run(&criteria, catalog)), vec![2, 1, 3]);
}

#[test]
fn test_sort_by_brand_puts_missing_brand_last() {
    let mut catalog = rows(product(1, "Generic"), &[]);
    catalog.extend(rows(
        Product {
            brand: Some("Zeta".to_string()),
            ..product(2, "Z")
        },
        &[],
    ));
    catalog.extend(rows(
        Product {
            brand: Some("Acme".to_string()),
            ..product(3, "A")
        },
        &[],
    ));

    let desc = SearchCriteria {
        sort_field: Some("brand".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&run(&desc, catalog.clone())), vec![2, 3, 1]);

    let asc = SearchCriteria {
        sort_field: Some("brand".to_string()),
        sort_direction: Some("asc".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&run(&asc, catalog)), vec![3, 2, 1]);
}

#[test]
fn test_sort_by_created_at_ascending_breaks_ties_by_highest_id() {
    let catalog: Vec<CatalogRow> = [(1, 10), (2, 10), (3, 5)]
        .into_iter()
        .flat_map(|(id, minutes)| {
            rows(
                Product {
                    created_at: minutes_after_epoch(minutes),
                    ..product(id, "Item")
                },
                &[],
            )
        })
        .collect();
    let criteria = SearchCriteria {
        sort_field: Some("createdAt".to_string()),
        sort_direction: Some("asc".to_string()),
        ..Default::default()
    };

    assert_eq!(ids(&run(&criteria, catalog)), vec![3, 2, 1]);
}

#[test]
fn test_pages_of_twenty_five() {
    let catalog: Vec<CatalogRow> = (1..=25)
        .flat_map(|id| rows(product(id, "Item"), &[]))
        .collect();
    let criteria = SearchCriteria::default();
    let evaluator = SearchEvaluator::new(&criteria);

    let first = evaluator.evaluate(catalog.clone(), PageRequest::new(0, 10));
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total_count, 25);
    assert_eq!(first.page_index, 0);
    assert_eq!(ids(&first), (16..=25).rev().collect::<Vec<i64>>());

    let page = evaluator.evaluate(catalog, PageRequest::new(2, 10));

    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total_count, 25);
    assert_eq!(page.page_index, 2);
    assert_eq!(page.page_size, 10);
    assert_eq!(ids(&page), vec![5, 4, 3, 2, 1]);
}

#[test]
fn test_page_past_the_end_is_empty_but_counted() {
    let catalog: Vec<CatalogRow> = (1..=3)
        .flat_map(|id| rows(product(id, "Item"), &[]))
        .collect();

    let page = SearchEvaluator::new(&SearchCriteria::default())
        .evaluate(catalog, PageRequest::new(5, 10));

    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 3);
}

// ============================================================================
// Source integration
// ============================================================================

#[tokio::test]
async fn test_search_keeps_source_order_and_scores_page() {
    let mut page_rows = rows(product(1, "Phone case"), &[]);
    page_rows.extend(rows(product(2, "Charger"), &[category(1, "Phone accessories")]));
    let source = FixedPage {
        page: CatalogPage {
            rows: page_rows,
            total_count: 12,
        },
    };

    let criteria = SearchCriteria {
        free_text_query: Some("phone".to_string()),
        ..Default::default()
    };
    let page = search(&source, &criteria, PageRequest::new(1, 2))
        .await
        .unwrap();

    assert_eq!(ids(&page), vec![1, 2]);
    assert_eq!(page.total_count, 12);
    assert_eq!(page.page_index, 1);
    assert_eq!(page.items[0].relevance_score, Some(NAME_WEIGHT));
    assert_eq!(page.items[1].relevance_score, Some(CATEGORY_WEIGHT));
}

#[tokio::test]
async fn test_search_through_source_agrees_with_evaluator() {
    let mut catalog = rows(
        Product {
            brand: Some("Apple".to_string()),
            ..product(1, "iPhone")
        },
        &[category(1, "Phones"), category(2, "Apple gear")],
    );
    catalog.extend(rows(product(2, "Apple pie dish"), &[category(3, "Kitchen")]));
    catalog.extend(rows(product(3, "Unrelated"), &[]));
    let source = InMemoryCatalog {
        rows: catalog.clone(),
    };

    let criteria = SearchCriteria {
        free_text_query: Some("apple".to_string()),
        ..Default::default()
    };
    let request = PageRequest::new(0, 20);
    let via_source = search(&source, &criteria, request).await.unwrap();
    let direct = SearchEvaluator::new(&criteria).evaluate(catalog, request);

    assert_eq!(ids(&via_source), ids(&direct));
    assert_eq!(via_source.total_count, direct.total_count);
    for (a, b) in via_source.items.iter().zip(&direct.items) {
        assert_eq!(a.relevance_score, b.relevance_score);
        assert_eq!(a.category_ids(), b.category_ids());
    }
}

#[tokio::test]
async fn test_source_failure_is_search_unavailable() {
    let result = search(
        &UnreachableCatalog,
        &SearchCriteria::default(),
        PageRequest::new(0, 20),
    )
    .await;

    assert!(matches!(result, Err(AppError::SearchUnavailable { .. })));
}

// ============================================================================
// Property tests
// ============================================================================

fn arb_catalog() -> impl Strategy<Value = Vec<(i64, u32, Vec<i64>)>> {
    // (created-at minutes, price in cents, category ids)
    prop::collection::vec(
        (0i64..10_000, 1u32..100_000, prop::collection::vec(1i64..5, 0..3)),
        0..40,
    )
}

fn build_rows(layout: &[(i64, u32, Vec<i64>)]) -> Vec<CatalogRow> {
    layout.iter()
        .enumerate()
        .flat_map(|(index, (minutes, cents, categories))| {
            let product = Product {
                price: BigDecimal::from(*cents) / BigDecimal::from(100),
                created_at: minutes_after_epoch(*minutes),
                ..product(index as i64 + 1, "Generated")
            };
            let refs: Vec<CategoryRef> = categories
                .iter()
                .map(|id| category(*id, &format!("Category {}", id)))
                .collect();
            rows(product, &refs)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every returned product satisfies the price range, and the count
    /// matches a brute-force count over distinct products.
    #[test]
    fn prop_price_range_results_are_exact(
        catalog in arb_catalog(),
        low in 0u32..100_000,
        span in 0u32..50_000,
    ) {
        let min = BigDecimal::from(low) / BigDecimal::from(100);
        let max = BigDecimal::from(low + span) / BigDecimal::from(100);
        let criteria = SearchCriteria {
            min_price: Some(min.clone()),
            max_price: Some(max.clone()),
            ..Default::default()
        };

        let page = SearchEvaluator::new(&criteria)
            .evaluate(build_rows(&catalog), PageRequest::new(0, 100));

        let expected = catalog
            .iter()
            .filter(|(_, cents, _)| {
                let price = BigDecimal::from(*cents) / BigDecimal::from(100);
                price >= min && price <= max
            })
            .count() as u64;

        prop_assert_eq!(page.total_count, expected);
        for item in &page.items {
            prop_assert!(item.product.price >= min && item.product.price <= max);
        }
    }

    /// Walking every page yields each product exactly once, in the same
    /// order as a single large page.
    #[test]
    fn prop_pages_partition_the_result(catalog in arb_catalog(), size in 1u32..10) {
        let criteria = SearchCriteria::default();
        let evaluator = SearchEvaluator::new(&criteria);
        let rows = build_rows(&catalog);

        let full = evaluator.evaluate(rows.clone(), PageRequest::new(0, 100));
        let mut walked = Vec::new();
        let mut index = 0;
        loop {
            let page = evaluator.evaluate(rows.clone(), PageRequest::new(index, size));
            prop_assert_eq!(page.total_count, full.total_count);
            prop_assert!(page.items.len() <= size as usize);
            if page.items.is_empty() {
                break;
            }
            walked.extend(ids(&page));
            index += 1;
        }

        prop_assert_eq!(walked, ids(&full));
        prop_assert_eq!(full.total_count, catalog.len() as u64);
    }

    /// Default ordering never puts an older product before a newer one.
    #[test]
    fn prop_default_order_is_newest_first(catalog in arb_catalog()) {
        let page = SearchEvaluator::new(&SearchCriteria::default())
            .evaluate(build_rows(&catalog), PageRequest::new(0, 100));

        for pair in page.items.windows(2) {
            prop_assert!(pair[0].product.created_at.to_jiff() >= pair[1].product.created_at.to_jiff());
        }
    }
}
