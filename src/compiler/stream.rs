use crate::Result;
use crate::compiler::{Compiler, command};
use crate::error::Error;
use async_trait::async_trait;
use std::time::Duration;

/// Compiles through pipes: the template source goes to stdin and the compiled
/// script is read from stdout. `{template_name}` in the command is replaced
/// with the template name.
pub struct StreamCompiler {
    command: String,
    timeout: Option<Duration>,
}

impl StreamCompiler {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Compiler for StreamCompiler {
    async fn compile(&self, name: &str, source: &str) -> Result<String> {
        let command = command::expand(&self.command, &[("{template_name}", name)]);
        let stdout = command::run(&command, Some(source.as_bytes()), self.timeout).await?;
        String::from_utf8(stdout).map_err(|_| Error::CompilerOutput(command))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stream_compiler() {
        let compiler = StreamCompiler::new("printf '[{template_name}]'; cat");
        let compiled = compiler.compile("tpl-popup", "{{#if a}}ü{{/if}}").await.unwrap();
        assert_eq!(compiled, "[tpl-popup]{{#if a}}ü{{/if}}");
    }

    #[tokio::test]
    async fn test_invalid_utf8_output() {
        let compiler = StreamCompiler::new("printf '\\377'");
        let result = compiler.compile("t", "").await;
        assert!(matches!(result, Err(Error::CompilerOutput(_))));
    }
}
