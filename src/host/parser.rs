use crate::Result;
use crate::error::Error;
use crate::host::{NodeList, Renderable, TextNode, Token, TokenKind, VariableNode};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Compiles a block tag into a node. The parser is positioned right after the
/// tag token, so block tags may consume tokens up to their end tag.
pub type TagCompiler =
    Arc<dyn Fn(&mut Parser, &Token) -> Result<Box<dyn Renderable>> + Send + Sync>;

/// Registry of tag compilers keyed by command word.
#[derive(Default, Clone)]
pub struct TagLibrary {
    tags: HashMap<String, TagCompiler>,
}

impl TagLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, compile: F)
    where
        F: Fn(&mut Parser, &Token) -> Result<Box<dyn Renderable>> + Send + Sync + 'static,
    {
        self.tags.insert(name.into(), Arc::new(compile));
    }

    pub fn get(&self, name: &str) -> Option<TagCompiler> {
        self.tags.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }
}

/// A token queue paired with the tag library used to compile block tags.
pub struct Parser {
    tokens: VecDeque<Token>,
    library: Arc<TagLibrary>,
}

impl Parser {
    pub fn new(tokens: impl IntoIterator<Item = Token>, library: Arc<TagLibrary>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
            library,
        }
    }

    /// Pops the next token.
    pub fn next_token(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    pub fn tag(&self, command: &str) -> Option<TagCompiler> {
        self.library.get(command)
    }

    /// Compiles a block token through the tag library.
    pub fn compile_block(&mut self, token: &Token) -> Result<Box<dyn Renderable>> {
        let command = token.command().ok_or(Error::EmptyBlockTag)?;
        let compile = self
            .tag(command)
            .ok_or_else(|| Error::InvalidBlockTag(command.to_string()))?;
        compile(self, token)
    }

    /// Parses the remaining tokens into a node list.
    pub fn parse(&mut self) -> Result<NodeList> {
        let mut nodes = NodeList::default();
        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::Text => nodes.push(Box::new(TextNode(token.contents))),
                TokenKind::Variable => nodes.push(Box::new(VariableNode(token.contents))),
                TokenKind::Block => nodes.push(self.compile_block(&token)?),
                TokenKind::Comment => {}
            }
        }
        Ok(nodes)
    }
}
