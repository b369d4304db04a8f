//! Image URL normalization.
//!
//! MaxStudio fetches both parent images itself, so signed-URL query strings
//! and fragments are stripped before the references are transmitted.

use reqwest::Url;

use crate::error::{MaxStudioError, Result};

/// Strip the query and fragment from `raw`.
///
/// Everything else is left exactly as the caller wrote it, so stripping an
/// already-clean URL yields the same string. Strings that do not parse as
/// URLs are returned unchanged.
pub fn clean_url_params(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(_) => strip_query_and_fragment(raw).to_string(),
        Err(_) => raw.to_string(),
    }
}

fn strip_query_and_fragment(raw: &str) -> &str {
    raw.split(['?', '#']).next().unwrap_or(raw)
}

/// Validate that `raw` is an absolute `http`/`https` URL and return it
/// without query or fragment.
pub fn normalize_image_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| MaxStudioError::InvalidImageUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(MaxStudioError::InvalidImageUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(MaxStudioError::InvalidImageUrl {
            url: raw.to_string(),
            reason: "missing host".into(),
        });
    }

    Ok(strip_query_and_fragment(trimmed).to_string())
}
