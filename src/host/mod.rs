//! The host template engine collaborator.
//!
//! The plugin only needs a token stream, a table of tag compilers and a single
//! rendering capability from the host. The pieces here are that minimal
//! surface: enough to register the plugin tags and run them end-to-end.

mod context;
mod parser;
mod token;

pub use context::Context;
pub use parser::{Parser, TagCompiler, TagLibrary};
pub use token::{Token, TokenKind};

use crate::Result;
use async_trait::async_trait;

/// Anything the host can render into a string.
#[async_trait]
pub trait Renderable: Send + Sync {
    async fn render(&self, ctx: &Context) -> Result<String>;
}

/// A parsed top-level template.
#[derive(Default)]
pub struct NodeList {
    nodes: Vec<Box<dyn Renderable>>,
}

impl NodeList {
    pub fn push(&mut self, node: Box<dyn Renderable>) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[async_trait]
impl Renderable for NodeList {
    async fn render(&self, ctx: &Context) -> Result<String> {
        let mut output = String::new();
        for node in &self.nodes {
            output.push_str(&node.render(ctx).await?);
        }
        Ok(output)
    }
}

pub struct TextNode(pub String);

#[async_trait]
impl Renderable for TextNode {
    async fn render(&self, _ctx: &Context) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Outputs a context variable; missing variables render empty.
pub struct VariableNode(pub String);

#[async_trait]
impl Renderable for VariableNode {
    async fn render(&self, ctx: &Context) -> Result<String> {
        Ok(ctx.get(self.0.trim()).unwrap_or_default().to_string())
    }
}
