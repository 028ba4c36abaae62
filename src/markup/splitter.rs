use crate::Result;
use crate::error::Error;
use crate::markup::events::MarkupEvent;
use crate::markup::{SplitDocument, TemplateFragment};
use crate::settings::TemplateMarker;

enum ScanState {
    Idle,
    Capturing { name: String, body: String },
}

/// Separates template `<script>` elements from the surrounding markup.
///
/// A script whose type is the marker MIME type and which carries the marker's
/// id attribute is captured as a named fragment. Everything else is written
/// back out: tags re-serialized with double-quoted attributes, and text kept
/// unless it is whitespace only.
pub struct FragmentSplitter {
    marker: TemplateMarker,
    state: ScanState,
    fragments: Vec<TemplateFragment>,
    markup: String,
}

impl FragmentSplitter {
    pub fn new(marker: TemplateMarker) -> Self {
        Self {
            marker,
            state: ScanState::Idle,
            fragments: Vec::new(),
            markup: String::new(),
        }
    }

    pub fn feed(&mut self, event: MarkupEvent<'_>) {
        match event {
            MarkupEvent::Start {
                name,
                attrs,
                self_closing,
            } => {
                if let ScanState::Capturing { body, .. } = &mut self.state {
                    write_start(body, &name, &attrs, self_closing);
                } else if let Some(id) = self.template_id(&name, &attrs) {
                    if self_closing {
                        self.fragments.push(TemplateFragment {
                            name: id,
                            body: String::new(),
                        });
                    } else {
                        self.state = ScanState::Capturing {
                            name: id,
                            body: String::new(),
                        };
                    }
                } else {
                    write_start(&mut self.markup, &name, &attrs, self_closing);
                }
            }
            MarkupEvent::Text(text) => match &mut self.state {
                ScanState::Capturing { body, .. } => body.push_str(&text),
                ScanState::Idle => {
                    if text.chars().any(|c| !c.is_whitespace()) {
                        self.markup.push_str(&text);
                    }
                }
            },
            MarkupEvent::End { name } => {
                let closes_capture = name.eq_ignore_ascii_case("script")
                    && matches!(self.state, ScanState::Capturing { .. });
                if closes_capture {
                    if let ScanState::Capturing { name, body } =
                        std::mem::replace(&mut self.state, ScanState::Idle)
                    {
                        self.fragments.push(TemplateFragment { name, body });
                    }
                    return;
                }
                let out = match &mut self.state {
                    ScanState::Capturing { body, .. } => body,
                    ScanState::Idle => &mut self.markup,
                };
                out.push_str("</");
                out.push_str(&name);
                out.push('>');
            }
            MarkupEvent::Verbatim(raw) => match &mut self.state {
                ScanState::Capturing { body, .. } => body.push_str(raw),
                ScanState::Idle => self.markup.push_str(raw),
            },
        }
    }

    /// Ends the scan. A template block still open at this point is an error.
    pub fn finish(self) -> Result<SplitDocument> {
        if let ScanState::Capturing { name, .. } = self.state {
            return Err(Error::UnterminatedFragment(name));
        }
        Ok(SplitDocument {
            fragments: self.fragments,
            markup: self.markup,
        })
    }

    fn template_id(&self, tag: &str, attrs: &[(String, String)]) -> Option<String> {
        if !tag.eq_ignore_ascii_case("script") {
            return None;
        }
        let attr = |key: &str| {
            attrs
                .iter()
                .rev()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_str())
        };
        if attr("type") != Some(self.marker.mime) {
            return None;
        }
        attr(self.marker.id_attr).map(str::to_string)
    }
}

fn write_start(out: &mut String, name: &str, attrs: &[(String, String)], self_closing: bool) {
    out.push('<');
    out.push_str(name);
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    out.push_str(if self_closing { "/>" } else { ">" });
}
