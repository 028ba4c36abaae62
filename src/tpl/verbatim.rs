use crate::Result;
use crate::host::{Context, Renderable};
use crate::tpl::scanner::Piece;
use async_trait::async_trait;

/// Renders a verbatim block: text pieces as-is, host nodes through the context.
///
/// ```text
/// {% verbatim %}
///     {% trans "Your name is" %} {{first}} {{last}}
/// {% endverbatim %}
/// ```
pub struct VerbatimNode {
    pieces: Vec<Piece>,
}

impl VerbatimNode {
    pub fn new(pieces: Vec<Piece>) -> Self {
        Self { pieces }
    }
}

#[async_trait]
impl Renderable for VerbatimNode {
    async fn render(&self, ctx: &Context) -> Result<String> {
        let mut output = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(t) => output.push_str(t),
                Piece::Node(node) => output.push_str(&node.render(ctx).await?),
            }
        }
        Ok(output)
    }
}
