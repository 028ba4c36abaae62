use crate::Result;
use crate::error::Error;
use crate::host::{Parser, Renderable, TokenKind};
use std::fmt;

/// An element of a verbatim block: literal text or a live host node.
pub enum Piece {
    Text(String),
    Node(Box<dyn Renderable>),
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Piece::Text(t) => f.debug_tuple("Text").field(t).finish(),
            Piece::Node(_) => f.write_str("Node(..)"),
        }
    }
}

/// Consumes tokens up to the block token `end_tag`, restoring the host
/// delimiters around variable tokens so the client template syntax survives.
///
/// Block tags inside the region are still compiled through the host tag
/// library, which keeps tags such as `url` or `csrf_token` working.
pub fn scan_verbatim(parser: &mut Parser, end_tag: &str) -> Result<Vec<Piece>> {
    let mut pieces = Vec::new();

    loop {
        let token = parser
            .next_token()
            .ok_or_else(|| Error::UnclosedTag(end_tag.to_string()))?;

        match token.kind {
            TokenKind::Block if token.contents.trim() == end_tag => break,
            TokenKind::Text => append_text(&mut pieces, &token.contents),
            TokenKind::Variable => {
                append_text(&mut pieces, "{{");
                append_text(&mut pieces, &token.contents);
                append_text(&mut pieces, "}}");
            }
            TokenKind::Block => {
                let node = parser.compile_block(&token)?;
                pieces.push(Piece::Node(node));
            }
            // Comments have nothing to render.
            TokenKind::Comment => {}
        }
    }

    Ok(pieces)
}

/// Append text, merging with the previous text piece when possible.
fn append_text(pieces: &mut Vec<Piece>, text: &str) {
    if let Some(Piece::Text(last)) = pieces.last_mut() {
        last.push_str(text);
    } else {
        pieces.push(Piece::Text(text.to_string()));
    }
}
