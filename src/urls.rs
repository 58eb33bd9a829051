use clap::ValueEnum;
use serde::Serialize;

use crate::domain::DocumentId;
use crate::registry::Registry;

/// Base of the direct file tree. Files live one folder per dataset:
/// `<base>/<folder>/<canonical id>.<extension>`.
pub const DOJ_BASE_URL: &str = "https://www.justice.gov/epstein/files";

/// Direct file URL for `id` under its resolved dataset's folder, or `None`
/// when no dataset (including gap fallback) claims the id. The folder name
/// is encoded as a single path segment; the id and extension are the only
/// other variable parts.
pub fn document_url(registry: &Registry, id: DocumentId, extension: &str) -> Option<String> {
    let resolution = registry.resolve(id)?;
    let folder = urlencoding::encode(&resolution.dataset.folder_name);
    Some(format!("{DOJ_BASE_URL}/{folder}/{id}.{extension}"))
}

/// The resolved dataset's informational listing page, for when a direct
/// file link is not wanted (for example the gap-fallback error affordance).
pub fn dataset_page_url(registry: &Registry, id: DocumentId) -> Option<String> {
    registry
        .resolve(id)
        .map(|resolution| resolution.dataset.external_url.clone())
}

/// External full-text search providers the locator can delegate to. There
/// is no local index; these are pure URL builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SearchProvider {
    /// archive.org full-text search over the mirrored files.
    Archive,
    /// Web search engine scoped to the official disclosure site.
    SiteSearch,
}

pub fn search_url(provider: SearchProvider, query: &str) -> String {
    match provider {
        SearchProvider::Archive => format!(
            "https://archive.org/search?query={}",
            urlencoding::encode(query)
        ),
        SearchProvider::SiteSearch => format!(
            "https://duckduckgo.com/?q={}",
            urlencoding::encode(&format!("site:justice.gov/epstein {query}"))
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_url_encodes_folder_segment() {
        let registry = Registry::builtin();
        let url = document_url(&registry, DocumentId::new(1_234), "pdf").unwrap();
        assert_eq!(
            url,
            "https://www.justice.gov/epstein/files/DataSet%201/EFTA00001234.pdf"
        );
    }

    #[test]
    fn document_url_uses_gap_fallback_folder() {
        let registry = Registry::builtin();
        let url = document_url(&registry, DocumentId::new(5_600), "pdf").unwrap();
        assert!(url.contains("DataSet%203"));
    }

    #[test]
    fn document_url_none_outside_ranges() {
        let registry = Registry::builtin();
        assert_eq!(document_url(&registry, DocumentId::new(10_000_000), "pdf"), None);
    }

    #[test]
    fn search_url_encodes_query() {
        let url = search_url(SearchProvider::Archive, "flight logs 2002");
        assert_eq!(url, "https://archive.org/search?query=flight%20logs%202002");

        let url = search_url(SearchProvider::SiteSearch, "deposition");
        assert!(url.starts_with("https://duckduckgo.com/?q=site%3Ajustice.gov%2Fepstein%20"));
    }
}
