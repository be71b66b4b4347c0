use std::collections::{HashMap, HashSet};

use crate::models::{CategoryRef, Product};
use crate::search::{CatalogPage, PageRequest, SearchCriteria, SortPlan};

pub const NAME_WEIGHT: f64 = 3.0;
pub const BRAND_WEIGHT: f64 = 2.5;
pub const DESCRIPTION_WEIGHT: f64 = 2.0;
pub const MODEL_WEIGHT: f64 = 2.0;
/// Added once for every associated category whose name matches.
pub const CATEGORY_WEIGHT: f64 = 1.5;

/// One product joined with at most one of its categories, the shape a
/// `products LEFT JOIN product_categories` query produces.
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub product: Product,
    pub category: Option<CategoryRef>,
}

/// A product with all of its categories, as returned by search.
#[derive(Debug, Clone)]
pub struct ProductSummary {
    pub product: Product,
    pub categories: Vec<CategoryRef>,
    /// Present only when the search carried a free-text query.
    pub relevance_score: Option<f64>,
}

impl ProductSummary {
    pub fn relevance(&self) -> f64 {
        self.relevance_score.unwrap_or(0.0)
    }

    pub fn category_names(&self) -> String {
        self.categories
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn category_ids(&self) -> String {
        self.categories
            .iter()
            .map(|c| c.id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One page of search results plus the size of the full filtered set.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub items: Vec<ProductSummary>,
    pub total_count: u64,
    pub page_index: u32,
    pub page_size: u32,
}

/// Lowercased criteria, prepared once per search.
#[derive(Debug, Default)]
struct Needles {
    name: Option<String>,
    description: Option<String>,
    brand: Option<String>,
    model: Option<String>,
    dimensions: Option<String>,
    free_text: Option<String>,
    category_ids: HashSet<i64>,
    category_names: HashSet<String>,
}

impl Needles {
    fn from_criteria(criteria: &SearchCriteria) -> Self {
        let lower = |value: Option<&str>| value.map(str::to_lowercase);
        Self {
            name: lower(criteria.name_filter()),
            description: lower(criteria.description_filter()),
            brand: lower(criteria.brand_filter()),
            model: lower(criteria.model_filter()),
            dimensions: lower(criteria.dimensions_filter()),
            free_text: lower(criteria.free_text()),
            category_ids: criteria.category_ids.iter().copied().collect(),
            category_names: criteria
                .category_name_filter()
                .into_iter()
                .map(str::to_lowercase)
                .collect(),
        }
    }
}

/// Applies search criteria to catalog rows.
///
/// [`evaluate`](Self::evaluate) is the complete in-memory search: it checks
/// every criterion, then orders, counts and pages. Stores that do that work
/// themselves hand their page to [`score_page`](Self::score_page), which
/// only folds rows and attaches relevance, and must agree with `evaluate`.
pub struct SearchEvaluator<'a> {
    criteria: &'a SearchCriteria,
    needles: Needles,
    sort: SortPlan,
}

impl<'a> SearchEvaluator<'a> {
    pub fn new(criteria: &'a SearchCriteria) -> Self {
        Self {
            criteria,
            needles: Needles::from_criteria(criteria),
            sort: SortPlan::resolve(criteria),
        }
    }

    pub fn evaluate(&self, rows: Vec<CatalogRow>, page: PageRequest) -> SearchPage {
        let matched: Vec<ProductSummary> = aggregate(rows)
            .into_iter()
            .filter(|summary| self.matches(summary))
            .map(|mut summary| {
                summary.relevance_score = self.relevance(&summary);
                summary
            })
            .collect();

        let matched = self.sort.sort(matched);

        let total_count = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(page.offset())
            .take(page.size() as usize)
            .collect();

        SearchPage {
            items,
            total_count,
            page_index: page.index(),
            page_size: page.size(),
        }
    }

    /// Folds an already filtered, ordered and sliced page into summaries,
    /// keeping the row order and attaching relevance.
    pub fn score_page(&self, page: CatalogPage, request: PageRequest) -> SearchPage {
        let items = aggregate(page.rows)
            .into_iter()
            .map(|mut summary| {
                summary.relevance_score = self.relevance(&summary);
                summary
            })
            .collect();

        SearchPage {
            items,
            total_count: page.total_count,
            page_index: request.index(),
            page_size: request.size(),
        }
    }

    fn matches(&self, summary: &ProductSummary) -> bool {
        let product = &summary.product;
        let criteria = self.criteria;
        let needles = &self.needles;

        contains_opt(Some(&product.name), needles.name.as_deref())
            && contains_opt(product.description.as_deref(), needles.description.as_deref())
            && contains_opt(product.brand.as_deref(), needles.brand.as_deref())
            && contains_opt(product.model.as_deref(), needles.model.as_deref())
            && contains_opt(product.dimensions.as_deref(), needles.dimensions.as_deref())
            && within(Some(&product.price), criteria.min_price.as_ref(), criteria.max_price.as_ref())
            && within(Some(&product.stock), criteria.min_stock.as_ref(), criteria.max_stock.as_ref())
            && within(product.weight.as_ref(), criteria.min_weight.as_ref(), criteria.max_weight.as_ref())
            && criteria.active.is_none_or(|active| product.active == active)
            && criteria.featured.is_none_or(|featured| product.featured == featured)
            && self.matches_categories(&summary.categories)
            && self.matches_free_text(summary)
    }

    fn matches_categories(&self, categories: &[CategoryRef]) -> bool {
        let ids = &self.needles.category_ids;
        let names = &self.needles.category_names;
        if ids.is_empty() && names.is_empty() {
            return true;
        }

        categories.iter().any(|category| {
            ids.contains(&category.id) || names.contains(&category.name.to_lowercase())
        })
    }

    fn matches_free_text(&self, summary: &ProductSummary) -> bool {
        let Some(query) = self.needles.free_text.as_deref() else {
            return true;
        };
        let product = &summary.product;

        contains(&product.name, query)
            || product.description.as_deref().is_some_and(|d| contains(d, query))
            || product.brand.as_deref().is_some_and(|b| contains(b, query))
            || product.model.as_deref().is_some_and(|m| contains(m, query))
            || summary.categories.iter().any(|c| contains(&c.name, query))
    }

    fn relevance(&self, summary: &ProductSummary) -> Option<f64> {
        let query = self.needles.free_text.as_deref()?;
        let product = &summary.product;
        let hit = |field: Option<&str>, weight: f64| {
            if field.is_some_and(|value| contains(value, query)) {
                weight
            } else {
                0.0
            }
        };

        let matching_categories = summary
            .categories
            .iter()
            .filter(|c| contains(&c.name, query))
            .count();

        Some(
            hit(Some(&product.name), NAME_WEIGHT)
                + hit(product.brand.as_deref(), BRAND_WEIGHT)
                + hit(product.description.as_deref(), DESCRIPTION_WEIGHT)
                + hit(product.model.as_deref(), MODEL_WEIGHT)
                + CATEGORY_WEIGHT * matching_categories as f64,
        )
    }
}

/// Folds joined rows into one summary per product id, keeping first-seen
/// product order and each category once.
fn aggregate(rows: Vec<CatalogRow>) -> Vec<ProductSummary> {
    let mut position: HashMap<i64, usize> = HashMap::new();
    let mut summaries: Vec<ProductSummary> = Vec::new();

    for CatalogRow { product, category } in rows {
        let index = *position.entry(product.id).or_insert_with(|| {
            summaries.push(ProductSummary {
                product,
                categories: Vec::new(),
                relevance_score: None,
            });
            summaries.len() - 1
        });

        if let Some(category) = category {
            let categories = &mut summaries[index].categories;
            if !categories.iter().any(|c| c.id == category.id) {
                categories.push(category);
            }
        }
    }

    summaries
}

/// `needle` must already be lowercase.
fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// An absent needle matches anything; a present one never matches a
/// missing value.
fn contains_opt(haystack: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => haystack.is_some_and(|h| contains(h, needle)),
    }
}

/// Inclusive range check; a missing value fails any supplied bound.
fn within<T: PartialOrd>(value: Option<&T>, min: Option<&T>, max: Option<&T>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}
