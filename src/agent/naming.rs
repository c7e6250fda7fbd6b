//! Site name translation.
//!
//! Tables in the analytics store are named after the site they track, with
//! the URL flattened and a unique identifier appended:
//! `https___www_example_co_uk__68247968d25f3661a88a24ac`. End users are
//! never shown these internal identifiers; they see `www.example.co.uk`.
//! This module makes that rule code instead of model-instruction policy.

/// Translate an internal table identifier to a readable site name.
///
/// Strips the flattened scheme prefix and the trailing unique identifier,
/// then restores dots in the host. Names that do not follow the convention
/// are returned unchanged.
pub fn site_name(table: &str) -> String {
    let Some(stripped) = table
        .strip_prefix("https___")
        .or_else(|| table.strip_prefix("http___"))
    else {
        return table.to_string();
    };

    // The unique identifier is the last double-underscore segment.
    let host = match stripped.rfind("__") {
        Some(idx) => &stripped[..idx],
        None => stripped,
    };

    if host.is_empty() {
        return table.to_string();
    }

    host.replace('_', ".")
}

/// True if a table follows the flattened-site naming convention.
pub fn is_site_table(table: &str) -> bool {
    table.starts_with("https___") || table.starts_with("http___")
}
