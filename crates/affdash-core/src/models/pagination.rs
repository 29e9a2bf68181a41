use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default page size used by the list views.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Page selection sent as `page` / `per_page` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageParams {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageParams {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }
}

/// `meta` block returned with list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_count: u64,
}

/// Paging summary for responses whose shape varies between endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Pagination {
    pub total: u64,
    pub current_page: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// Build a pagination summary from whatever the backend sent.
    ///
    /// Accepts a camelCase `pagination` object (`total`, `currentPage`,
    /// `totalPages`), a `meta` object (`current_page`, `total_pages`,
    /// `total_count`), or nothing, in which case it is derived from the
    /// item count on this page.
    pub fn normalize(source: Option<&Value>, page: u32, count: usize, per_page: u32) -> Self {
        let per_page = per_page.max(1) as u64;
        let count = count as u64;
        let derived_pages = count.div_ceil(per_page) as u32;
        let field = |obj: &Value, key: &str| obj.get(key).and_then(Value::as_u64);

        match source {
            Some(obj) if obj.get("totalPages").is_some() => Self {
                total: field(obj, "total")
                    .or_else(|| field(obj, "totalItems"))
                    .or_else(|| field(obj, "count"))
                    .unwrap_or(count),
                current_page: field(obj, "currentPage").map(|p| p as u32).unwrap_or(page),
                total_pages: field(obj, "totalPages").map(|p| p as u32).unwrap_or(derived_pages),
            },
            Some(obj) if obj.get("current_page").is_some() => Self {
                total: field(obj, "total_count").filter(|t| *t > 0).unwrap_or(count),
                current_page: field(obj, "current_page")
                    .filter(|p| *p > 0)
                    .map(|p| p as u32)
                    .unwrap_or(page),
                total_pages: field(obj, "total_pages")
                    .filter(|p| *p > 0)
                    .map(|p| p as u32)
                    .unwrap_or(derived_pages),
            },
            _ => Self {
                total: count,
                current_page: page,
                total_pages: derived_pages,
            },
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

impl From<&PageMeta> for Pagination {
    fn from(meta: &PageMeta) -> Self {
        Self {
            total: meta.total_count,
            current_page: meta.current_page,
            total_pages: meta.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_from_meta() {
        let meta = json!({"current_page": 2, "total_pages": 5, "total_count": 48});
        let p = Pagination::normalize(Some(&meta), 1, 10, 10);
        assert_eq!(
            p,
            Pagination {
                total: 48,
                current_page: 2,
                total_pages: 5
            }
        );
        assert!(p.has_next());
    }

    #[test]
    fn test_normalize_keeps_camel_case_pagination() {
        let pagination = json!({"total": 30, "currentPage": 3, "totalPages": 3});
        let p = Pagination::normalize(Some(&pagination), 1, 10, 10);
        assert_eq!(p.current_page, 3);
        assert_eq!(p.total_pages, 3);
        assert!(!p.has_next());
    }

    #[test]
    fn test_normalize_derives_from_count() {
        let p = Pagination::normalize(None, 1, 21, 20);
        assert_eq!(
            p,
            Pagination {
                total: 21,
                current_page: 1,
                total_pages: 2
            }
        );

        let p = Pagination::normalize(None, 1, 0, 20);
        assert_eq!(p.total_pages, 0);
    }

    #[test]
    fn test_page_params_clamp() {
        assert_eq!(PageParams::new(0, 0), PageParams { page: 1, per_page: 1 });
        assert_eq!(PageParams::default().per_page, DEFAULT_PER_PAGE);
    }
}
