use serde::{Deserialize, Serialize};

/// Spring-style page envelope returned by paginated listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: usize,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub number: usize,
    #[serde(default)]
    pub size: usize,
}

/// A listing response: some endpoints page, others return the whole array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    All(Vec<T>),
    Page(PageResponse<T>),
}

impl<T> Listing<T> {
    /// Collapses both shapes into a page envelope. A bare array is one page
    /// holding every element.
    pub fn into_page(self) -> PageResponse<T> {
        match self {
            Listing::Page(page) => page,
            Listing::All(items) => {
                let total = items.len();
                PageResponse {
                    total_pages: 1,
                    total_elements: total as u64,
                    number: 0,
                    size: total,
                    content: items,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_missing_fields_default() {
        let page: PageResponse<serde_json::Value> =
            serde_json::from_str(r#"{"content": [{"id": 1}]}"#).unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.total_elements, 0);
    }

    #[test]
    fn test_listing_accepts_array_and_page() {
        let all: Listing<i32> = serde_json::from_str("[1, 2, 3]").unwrap();
        let page = all.into_page();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_elements, 3);

        let paged: Listing<i32> =
            serde_json::from_str(r#"{"content": [4], "totalPages": 7, "totalElements": 61}"#)
                .unwrap();
        let page = paged.into_page();
        assert_eq!(page.total_pages, 7);
        assert_eq!(page.content, vec![4]);
    }
}
