use bigdecimal::BigDecimal;

/// Smallest page a caller can ask for.
pub const MIN_PAGE_SIZE: u32 = 1;
/// Largest page a caller can ask for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Product search filters. Every field is optional; present fields are
/// AND-ed together.
///
/// Sort field and direction are kept as the caller sent them: an
/// unrecognized value is not an error, it selects the fallback ordering.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub dimensions: Option<String>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub active: Option<bool>,
    pub featured: Option<bool>,
    pub min_weight: Option<BigDecimal>,
    pub max_weight: Option<BigDecimal>,
    pub free_text_query: Option<String>,
    pub category_ids: Vec<i64>,
    pub category_names: Vec<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
}

impl SearchCriteria {
    /// The free-text query, if it has any non-blank content.
    pub fn free_text(&self) -> Option<&str> {
        non_blank(self.free_text_query.as_deref())
    }

    pub fn has_free_text(&self) -> bool {
        self.free_text().is_some()
    }

    pub fn name_filter(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    pub fn description_filter(&self) -> Option<&str> {
        non_blank(self.description.as_deref())
    }

    pub fn brand_filter(&self) -> Option<&str> {
        non_blank(self.brand.as_deref())
    }

    pub fn model_filter(&self) -> Option<&str> {
        non_blank(self.model.as_deref())
    }

    pub fn dimensions_filter(&self) -> Option<&str> {
        non_blank(self.dimensions.as_deref())
    }

    /// Category names, trimmed, with blanks dropped; empty when the filter
    /// is absent. Names are matched whole, so surrounding spaces never count.
    pub fn category_name_filter(&self) -> Vec<&str> {
        self.category_names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// A blank value counts as absent. Anything else is a substring needle and
/// is kept exactly as sent, spaces included.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// A zero-based page request with the size already bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    index: u32,
    size: u32,
}

impl PageRequest {
    /// Builds a page request, clamping `size` into `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`.
    pub fn new(index: u32, size: u32) -> Self {
        Self {
            index,
            size: size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> usize {
        self.index as usize * self.size as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(PageRequest::new(0, 0).size(), 1);
        assert_eq!(PageRequest::new(0, 500).size(), 100);
        assert_eq!(PageRequest::new(3, 10).offset(), 30);
    }

    #[test]
    fn test_blank_text_filters_are_absent() {
        let criteria = SearchCriteria {
            name: Some("   ".to_string()),
            free_text_query: Some("".to_string()),
            brand: Some(" Apple ".to_string()),
            category_names: vec!["".to_string(), "Phones".to_string()],
            ..Default::default()
        };

        assert_eq!(criteria.name_filter(), None);
        assert!(!criteria.has_free_text());
        assert_eq!(criteria.brand_filter(), Some(" Apple "));
        assert_eq!(criteria.category_name_filter(), vec!["Phones"]);
    }

    #[test]
    fn test_text_filters_keep_surrounding_spaces() {
        let criteria = SearchCriteria {
            name: Some(" Pro".to_string()),
            free_text_query: Some("usb c ".to_string()),
            category_names: vec!["  Phones ".to_string()],
            ..Default::default()
        };

        assert_eq!(criteria.name_filter(), Some(" Pro"));
        assert_eq!(criteria.free_text(), Some("usb c "));
        assert_eq!(criteria.category_name_filter(), vec!["Phones"]);
    }
}
