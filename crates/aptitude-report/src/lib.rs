//! aptitude-report — Rendering and export for aptitude reports.
//!
//! Turns the view descriptions from `aptitude-core` into a self-contained
//! HTML page with a radar chart, a paginated export document, and a short
//! share summary.

pub mod export;
pub mod html;
pub mod radar;
pub mod share;

/// Escape a string for safe HTML/SVG insertion.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }
}
