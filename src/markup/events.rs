use crate::Result;
use crate::error::Error;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::borrow::Cow;

/// Elements whose content is raw text rather than markup.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// A tag-level event of an HTML scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    Start {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    End {
        name: String,
    },
    Text(Cow<'a, str>),
    /// Comments, doctype, processing instructions and CDATA, as written.
    Verbatim(&'a str),
}

/// Scans `html` into markup events.
///
/// Attribute values and text are kept exactly as written (no entity
/// decoding). Contents of `<script>` and `<style>` elements are delivered as
/// a single text event, like an HTML tokenizer does.
pub fn scan(html: &str) -> Result<Vec<MarkupEvent<'_>>> {
    let mut events = Vec::new();
    let mut offset = 0;

    'resume: while offset < html.len() {
        let rest = &html[offset..];
        let mut reader = Reader::from_str(rest);
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.allow_dangling_amp = true;

        loop {
            let before = reader.buffer_position() as usize;
            if is_stray_lt(&rest.as_bytes()[before..]) {
                push_text(&mut events, &rest[before..before + 1]);
                offset += before + 1;
                continue 'resume;
            }
            let event = reader.read_event().map_err(|e| {
                Error::Markup(format!("{} (at byte {})", e, offset + before))
            })?;
            let after = reader.buffer_position() as usize;

            match event {
                Event::Start(ref e) => {
                    let start = start_event(e, false)?;
                    let raw_text = match &start {
                        MarkupEvent::Start { name, .. } if is_raw_text(name) => Some(name.clone()),
                        _ => None,
                    };
                    events.push(start);

                    if let Some(tag) = raw_text {
                        offset = read_raw_text(html, offset + after, &tag, &mut events);
                        continue 'resume;
                    }
                }
                Event::Empty(ref e) => events.push(start_event(e, true)?),
                Event::End(ref e) => events.push(MarkupEvent::End {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                }),
                Event::Text(_) | Event::GeneralRef(_) => {
                    push_text(&mut events, &rest[before..after]);
                }
                Event::Eof => break 'resume,
                _ => events.push(MarkupEvent::Verbatim(&rest[before..after])),
            }
        }
    }

    Ok(events)
}

/// A `<` that cannot open a tag, comment or declaration is plain text.
fn is_stray_lt(input: &[u8]) -> bool {
    match input {
        [b'<', next, ..] => !(next.is_ascii_alphabetic() || matches!(next, b'/' | b'!' | b'?')),
        [b'<'] => true,
        _ => false,
    }
}

fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|t| name.eq_ignore_ascii_case(t))
}

fn start_event<'a>(e: &BytesStart, self_closing: bool) -> Result<MarkupEvent<'a>> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    let mut attributes = e.html_attributes();
    attributes.with_checks(false);
    for attr in attributes {
        let attr = attr.map_err(|err| Error::Markup(format!("<{}>: {}", name, err)))?;
        attrs.push((
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            String::from_utf8_lossy(&attr.value).into_owned(),
        ));
    }
    Ok(MarkupEvent::Start {
        name,
        attrs,
        self_closing,
    })
}

/// Emits the raw body of `tag` starting at `body_start` plus its end tag and
/// returns the offset to resume scanning from. An unterminated element leaves
/// the end tag out and consumes the rest of the input.
fn read_raw_text<'a>(
    html: &'a str,
    body_start: usize,
    tag: &str,
    events: &mut Vec<MarkupEvent<'a>>,
) -> usize {
    let body = &html[body_start..];
    let closing = format!("</{}", tag.to_ascii_lowercase());
    let lowered = body.to_ascii_lowercase();

    let Some(body_len) = lowered.find(&closing) else {
        if !body.is_empty() {
            events.push(MarkupEvent::Text(Cow::Borrowed(body)));
        }
        return html.len();
    };

    if body_len > 0 {
        events.push(MarkupEvent::Text(Cow::Borrowed(&body[..body_len])));
    }
    let end_tag = &body[body_len..];
    let resume = end_tag.find('>').map_or(html.len(), |i| body_start + body_len + i + 1);
    events.push(MarkupEvent::End {
        name: end_tag[2..closing.len()].to_string(),
    });
    resume
}

/// Text arrives split around entity references; glue the parts back together.
fn push_text<'a>(events: &mut Vec<MarkupEvent<'a>>, text: &'a str) {
    if let Some(MarkupEvent::Text(last)) = events.last_mut() {
        last.to_mut().push_str(text);
    } else {
        events.push(MarkupEvent::Text(Cow::Borrowed(text)));
    }
}
