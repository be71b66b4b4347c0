//! Result ordering for product search.
//!
//! The caller's sort field and direction are resolved once into a
//! [`SortPlan`]; comparing two results never looks at the field name again.

use bigdecimal::BigDecimal;
use jiff::civil;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::Product;
use crate::search::{ProductSummary, SearchCriteria};

/// Product attribute a search can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Brand,
    Model,
    Price,
    Stock,
    Weight,
    CreatedAt,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "brand" => Ok(SortKey::Brand),
            "model" => Ok(SortKey::Model),
            "price" => Ok(SortKey::Price),
            "stock" => Ok(SortKey::Stock),
            "weight" => Ok(SortKey::Weight),
            "createdat" | "created_at" => Ok(SortKey::CreatedAt),
            other => Err(format!("Unknown sort field: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("Unknown sort direction: {}", other)),
        }
    }
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// A result with its creation time converted once, ahead of sorting.
struct Keyed {
    created_at: civil::DateTime,
    summary: ProductSummary,
}

impl Keyed {
    fn new(summary: ProductSummary) -> Self {
        Self {
            created_at: summary.product.created_at.to_jiff(),
            summary,
        }
    }

    fn product(&self) -> &Product {
        &self.summary.product
    }
}

type ProductOrder = Box<dyn Fn(&Keyed, &Keyed) -> Ordering + Send + Sync>;

/// Fully resolved ordering of search results:
/// primary key (if usable), then relevance (with free text), then newest
/// first, then highest id so the order is total.
pub struct SortPlan {
    spec: Option<SortSpec>,
    primary: Option<ProductOrder>,
    by_relevance: bool,
}

impl SortPlan {
    pub fn resolve(criteria: &SearchCriteria) -> Self {
        let spec = criteria
            .sort_field
            .as_deref()
            .and_then(|field| field.parse::<SortKey>().ok())
            .map(|key| SortSpec {
                key,
                direction: criteria
                    .sort_direction
                    .as_deref()
                    .and_then(|d| d.parse().ok())
                    .unwrap_or_default(),
            });

        Self {
            spec,
            primary: spec.map(product_order),
            by_relevance: criteria.has_free_text(),
        }
    }

    pub fn spec(&self) -> Option<SortSpec> {
        self.spec
    }

    /// Orders `items` by this plan.
    pub fn sort(&self, items: Vec<ProductSummary>) -> Vec<ProductSummary> {
        let mut keyed: Vec<Keyed> = items.into_iter().map(Keyed::new).collect();
        keyed.sort_by(|a, b| self.compare(a, b));
        keyed.into_iter().map(|k| k.summary).collect()
    }

    fn compare(&self, a: &Keyed, b: &Keyed) -> Ordering {
        let primary = self
            .primary
            .as_ref()
            .map_or(Ordering::Equal, |order| order(a, b));

        primary
            .then_with(|| {
                if self.by_relevance {
                    b.summary.relevance().total_cmp(&a.summary.relevance())
                } else {
                    Ordering::Equal
                }
            })
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.product().id.cmp(&a.product().id))
    }
}

fn product_order(spec: SortSpec) -> ProductOrder {
    let direction = spec.direction;
    match spec.key {
        SortKey::Name => Box::new(move |a: &Keyed, b: &Keyed| {
            direction.apply(caseless(&a.product().name, &b.product().name))
        }),
        SortKey::Brand => Box::new(move |a: &Keyed, b: &Keyed| {
            nulls_last(
                a.product().brand.as_deref(),
                b.product().brand.as_deref(),
                direction,
                caseless,
            )
        }),
        SortKey::Model => Box::new(move |a: &Keyed, b: &Keyed| {
            nulls_last(
                a.product().model.as_deref(),
                b.product().model.as_deref(),
                direction,
                caseless,
            )
        }),
        SortKey::Price => Box::new(move |a: &Keyed, b: &Keyed| {
            direction.apply(a.product().price.cmp(&b.product().price))
        }),
        SortKey::Stock => Box::new(move |a: &Keyed, b: &Keyed| {
            direction.apply(a.product().stock.cmp(&b.product().stock))
        }),
        SortKey::Weight => Box::new(move |a: &Keyed, b: &Keyed| {
            nulls_last(
                a.product().weight.as_ref(),
                b.product().weight.as_ref(),
                direction,
                |x: &BigDecimal, y: &BigDecimal| x.cmp(y),
            )
        }),
        SortKey::CreatedAt => Box::new(move |a: &Keyed, b: &Keyed| {
            direction.apply(a.created_at.cmp(&b.created_at))
        }),
    }
}

/// Missing values sort after present ones in either direction.
fn nulls_last<T: ?Sized>(
    a: Option<&T>,
    b: Option<&T>,
    direction: SortDirection,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(cmp(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn caseless(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
