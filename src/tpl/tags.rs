use crate::Engine;
use crate::Result;
use crate::error::Error;
use crate::host::{Parser, Renderable, TagLibrary, Token};
use crate::tpl::compress::CompressNode;
use crate::tpl::handlebars::{HandlebarsJsNode, HandlebarsNode};
use crate::tpl::scanner::scan_verbatim;
use crate::tpl::verbatim::VerbatimNode;
use std::sync::Arc;

/// Registers `verbatim`, `tplhandlebars`, `compress_handlebars` and
/// `handlebars_js` into the host tag library.
pub fn register(library: &mut TagLibrary, engine: Arc<Engine>) {
    library.register("verbatim", verbatim);

    let e = engine.clone();
    library.register("tplhandlebars", move |parser, token| {
        tplhandlebars(parser, token, e.clone())
    });

    let e = engine.clone();
    library.register("compress_handlebars", move |parser, _token| {
        let body = VerbatimNode::new(scan_verbatim(parser, "endcompress_handlebars")?);
        Ok(Box::new(CompressNode::new(body, e.clone())) as Box<dyn Renderable>)
    });

    library.register("handlebars_js", move |_parser, _token| {
        Ok(Box::new(HandlebarsJsNode::new(engine.clone())) as Box<dyn Renderable>)
    });
}

fn verbatim(parser: &mut Parser, _token: &Token) -> Result<Box<dyn Renderable>> {
    let pieces = scan_verbatim(parser, "endverbatim")?;
    Ok(Box::new(VerbatimNode::new(pieces)))
}

fn tplhandlebars(
    parser: &mut Parser,
    token: &Token,
    engine: Arc<Engine>,
) -> Result<Box<dyn Renderable>> {
    let body = VerbatimNode::new(scan_verbatim(parser, "endtplhandlebars")?);

    let bits = token.split_contents();
    let template_id = match bits.as_slice() {
        [_, id, ..] => strip_quotes(id),
        _ => {
            return Err(Error::Syntax(format!(
                "{} tag requires exactly one argument",
                bits.first().map(String::as_str).unwrap_or("tplhandlebars")
            )));
        }
    };

    Ok(Box::new(HandlebarsNode::new(template_id, body, engine)))
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = s
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    s
}
