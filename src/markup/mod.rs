//! Extraction of template `<script>` elements from rendered HTML.

pub mod events;
mod splitter;

pub use splitter::FragmentSplitter;

use crate::Result;
use crate::settings::TemplateMarker;

/// A named client template body taken from a marked `<script>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFragment {
    pub name: String,
    pub body: String,
}

/// Result of splitting a document: the template fragments in document order
/// and the remaining markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitDocument {
    pub fragments: Vec<TemplateFragment>,
    pub markup: String,
}

/// Splits `html` into template fragments and non-template markup.
pub fn split(html: &str, marker: TemplateMarker) -> Result<SplitDocument> {
    let mut splitter = FragmentSplitter::new(marker);
    for event in events::scan(html)? {
        splitter.feed(event);
    }
    splitter.finish()
}
