/// Kind of a host template token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Literal text between tags.
    Text,
    /// `{{ ... }}` expression.
    Variable,
    /// `{% ... %}` tag.
    Block,
    /// `{# ... #}` comment.
    Comment,
}

/// A unit of the host template token stream, carrying its raw contents
/// (without the surrounding delimiters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub contents: String,
}

impl Token {
    pub fn new(kind: TokenKind, contents: impl Into<String>) -> Self {
        Self {
            kind,
            contents: contents.into(),
        }
    }

    pub fn text(contents: impl Into<String>) -> Self {
        Self::new(TokenKind::Text, contents)
    }

    pub fn variable(contents: impl Into<String>) -> Self {
        Self::new(TokenKind::Variable, contents)
    }

    pub fn block(contents: impl Into<String>) -> Self {
        Self::new(TokenKind::Block, contents)
    }

    pub fn comment(contents: impl Into<String>) -> Self {
        Self::new(TokenKind::Comment, contents)
    }

    /// The leading command word of a block token, e.g. `url` for `url "home"`.
    pub fn command(&self) -> Option<&str> {
        self.contents.split_whitespace().next()
    }

    /// Splits the contents on whitespace, keeping quoted arguments whole.
    ///
    /// `tplhandlebars "my tpl" x` yields `["tplhandlebars", "\"my tpl\"", "x"]`.
    pub fn split_contents(&self) -> Vec<String> {
        let mut bits = Vec::new();
        let mut current = String::new();
        let mut quote: Option<char> = None;

        for c in self.contents.chars() {
            match quote {
                Some(q) => {
                    current.push(c);
                    if c == q {
                        quote = None;
                    }
                }
                None if c == '"' || c == '\'' => {
                    current.push(c);
                    quote = Some(c);
                }
                None if c.is_whitespace() => {
                    if !current.is_empty() {
                        bits.push(std::mem::take(&mut current));
                    }
                }
                None => current.push(c),
            }
        }
        if !current.is_empty() {
            bits.push(current);
        }
        bits
    }
}
