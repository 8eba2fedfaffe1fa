//! Generated header stamped onto the built stylesheet

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// Version reported when the help text carries none
pub const UNKNOWN_VERSION: &str = "Latest";

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:\.\d+)+").unwrap_or_else(|e| unreachable!("invalid version pattern: {e}"))
});

/// First dotted numeric version in `help`, or [`UNKNOWN_VERSION`]
#[must_use]
pub fn extract_version(help: &str) -> String {
    VERSION_PATTERN
        .find(help)
        .map_or_else(|| UNKNOWN_VERSION.to_string(), |m| m.as_str().to_string())
}

/// Header block placed above the compiler output
#[must_use]
pub fn render_header(generated_at: DateTime<Utc>, version: &str) -> String {
    format!(
        "/**\n \
         * ElaineCrud stylesheet\n \
         * Generated: {}\n \
         * Tailwind CSS version: {version}\n \
         *\n \
         * Do not edit this file directly. Regenerate with `elaine-crud css build`.\n \
         */\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

/// Prepend the header to `css`
#[must_use]
pub fn stamp(css: &str, generated_at: DateTime<Utc>, version: &str) -> String {
    let mut stamped = render_header(generated_at, version);
    stamped.push_str(css);
    stamped
}
