//! The external template compiler.
//!
//! Two protocols are supported, both driven by a shell command template:
//! [`FileCompiler`] passes `{infile}` / `{outfile}` paths, [`StreamCompiler`]
//! pipes the source through stdin/stdout.

pub mod command;
mod file;
pub mod output;
mod stream;

pub use file::FileCompiler;
pub use stream::StreamCompiler;

use crate::Result;
use async_trait::async_trait;

/// Turns the source of one named client template into JavaScript.
#[async_trait]
pub trait Compiler: Send + Sync {
    async fn compile(&self, name: &str, source: &str) -> Result<String>;
}
