//! Product document loading and pagination.
//!
//! The catalog is a single JSON array on disk. Entries are served as stored;
//! the service never reshapes a product.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Page served when `page` is omitted.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when `limit` is omitted.
pub const DEFAULT_LIMIT: u32 = 10;

/// Failure to produce the product document.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One page of the catalog, in the wire shape the product feed expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage<T> {
    pub products: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
}

/// Read and parse the product document at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array.
pub async fn load_products(path: &Path) -> Result<Vec<Value>, CatalogError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_slice(&raw).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Slice page `page` (1-based) of `limit` items out of `items`.
///
/// The slice `[(page-1)*limit, page*limit)` is clamped to the catalog, so a
/// page past the end is empty. `total_pages` is `ceil(len / limit)`.
/// Callers guarantee `page >= 1` and `limit >= 1`.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: u32, limit: u32) -> CatalogPage<T> {
    let limit_len = usize::try_from(limit).unwrap_or(usize::MAX).max(1);
    let page_index = usize::try_from(page.saturating_sub(1)).unwrap_or(usize::MAX);

    let start = page_index.saturating_mul(limit_len).min(items.len());
    let end = start.saturating_add(limit_len).min(items.len());
    let total_pages = u32::try_from(items.len().div_ceil(limit_len)).unwrap_or(u32::MAX);

    CatalogPage {
        products: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        current_page: page,
        total_pages,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog(len: u32) -> Vec<u32> {
        (0..len).collect()
    }

    #[test]
    fn test_second_page_of_twenty_five() {
        let page = paginate(&catalog(25), 2, 10);
        assert_eq!(page.products, (10..20).collect::<Vec<_>>());
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_last_page_is_partial() {
        let page = paginate(&catalog(25), 3, 10);
        assert_eq!(page.products, vec![20, 21, 22, 23, 24]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = paginate(&catalog(25), 9, 10);
        assert!(page.products.is_empty());
        assert_eq!(page.current_page, 9);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_empty_catalog() {
        let page = paginate::<u32>(&[], 1, 10);
        assert!(page.products.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_exact_multiple() {
        assert_eq!(paginate(&catalog(20), 1, 10).total_pages, 2);
        assert_eq!(paginate(&catalog(1), 1, 1).total_pages, 1);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let page = paginate(&catalog(5), u32::MAX, u32::MAX);
        assert!(page.products.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(paginate(&catalog(3), 1, 2)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"products": [0, 1], "currentPage": 1, "totalPages": 2})
        );
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_products(Path::new("/nonexistent/products.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[tokio::test]
    async fn test_load_rejects_non_array() {
        let path =
            std::env::temp_dir().join(format!("innomart-catalog-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, br#"{"products": []}"#).await.unwrap();

        let err = load_products(&path).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));

        tokio::fs::remove_file(path).await.unwrap();
    }
}
