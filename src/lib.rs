//! Client-side Handlebars blocks for server-rendered pages.
//!
//! The crate plugs four tags into a host template engine:
//!
//! - `{% verbatim %}` keeps `{{ }}` expressions as literal text while still
//!   running whitelisted host tags such as `{% url %}` or `{% csrf_token %}`.
//! - `{% tplhandlebars "id" %}` wraps a verbatim block in a named template
//!   `<script>`, or precompiles it through an external compiler.
//! - `{% compress_handlebars %}` extracts every template `<script>` from its
//!   body and replaces them with compiled JavaScript.
//! - `{% handlebars_js %}` emits the script tags for the client runtime.
//!
//! ```no_run
//! use std::sync::Arc;
//! use handlebars_embed::Engine;
//! use handlebars_embed::host::{Context, Parser, Renderable, TagLibrary, Token};
//! use handlebars_embed::settings::Settings;
//!
//! # async fn demo() -> handlebars_embed::Result<()> {
//! let engine = Arc::new(Engine::new(Settings::from_env()));
//! let mut library = TagLibrary::new();
//! handlebars_embed::tpl::tags::register(&mut library, engine);
//!
//! let tokens = vec![
//!     Token::block("verbatim"),
//!     Token::variable("name"),
//!     Token::block("endverbatim"),
//! ];
//! let nodes = Parser::new(tokens, Arc::new(library)).parse()?;
//! assert_eq!(nodes.render(&Context::new()).await?, "{{name}}");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod compiler;
pub mod engine;
pub mod error;
pub mod host;
pub mod markup;
pub mod settings;
pub mod tpl;

pub use engine::Engine;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
