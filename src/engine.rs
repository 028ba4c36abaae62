use crate::Result;
use crate::cache::ArtifactCache;
use crate::compiler::{Compiler, FileCompiler, StreamCompiler};
use crate::error::Error;
use crate::settings::Settings;
use std::sync::Arc;

/// Shared state behind the plugin tags: settings plus the compilers and the
/// optional cache used while rendering.
///
/// Compilers default to ones built from `settings.compiler_command`; tests and
/// embedders can inject their own.
pub struct Engine {
    settings: Settings,
    cache: Option<Arc<dyn ArtifactCache>>,
    file_compiler: Option<Arc<dyn Compiler>>,
    stream_compiler: Option<Arc<dyn Compiler>>,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            cache: None,
            file_compiler: None,
            stream_compiler: None,
        }
    }

    /// Caches compiled `compress_handlebars` output.
    pub fn with_cache(mut self, cache: Arc<dyn ArtifactCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Compiler used by `compress_handlebars`.
    pub fn with_file_compiler(mut self, compiler: Arc<dyn Compiler>) -> Self {
        self.file_compiler = Some(compiler);
        self
    }

    /// Compiler used by `tplhandlebars` in precompile mode.
    pub fn with_stream_compiler(mut self, compiler: Arc<dyn Compiler>) -> Self {
        self.stream_compiler = Some(compiler);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cache(&self) -> Option<&Arc<dyn ArtifactCache>> {
        self.cache.as_ref()
    }

    /// Whether `compress_handlebars` has a compiler to run.
    pub fn has_file_compiler(&self) -> bool {
        self.file_compiler.is_some() || self.settings.compiler_command.is_some()
    }

    pub fn file_compiler(&self) -> Result<Arc<dyn Compiler>> {
        if let Some(compiler) = &self.file_compiler {
            return Ok(compiler.clone());
        }
        let command = self.compiler_command()?;
        let mut compiler = FileCompiler::new(command).timeout(self.settings.compiler_timeout());
        if let Some(root) = &self.settings.temp_root {
            compiler = compiler.temp_root(root);
        }
        Ok(Arc::new(compiler))
    }

    pub fn stream_compiler(&self) -> Result<Arc<dyn Compiler>> {
        if let Some(compiler) = &self.stream_compiler {
            return Ok(compiler.clone());
        }
        let command = self.compiler_command()?;
        Ok(Arc::new(
            StreamCompiler::new(command).timeout(self.settings.compiler_timeout()),
        ))
    }

    fn compiler_command(&self) -> Result<&str> {
        self.settings
            .compiler_command
            .as_deref()
            .ok_or_else(|| Error::Configuration("HANDLEBARS_COMPILER".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Upper;

    #[async_trait]
    impl Compiler for Upper {
        async fn compile(&self, _name: &str, source: &str) -> Result<String> {
            Ok(source.to_uppercase())
        }
    }

    #[test]
    fn test_missing_compiler_is_configuration_error() {
        let engine = Engine::new(Settings::default());
        assert!(!engine.has_file_compiler());
        assert!(matches!(engine.file_compiler(), Err(Error::Configuration(_))));
        assert!(matches!(engine.stream_compiler(), Err(Error::Configuration(_))));
    }

    #[tokio::test]
    async fn test_injected_compiler_wins() {
        let engine = Engine::new(Settings::default()).with_file_compiler(Arc::new(Upper));
        assert!(engine.has_file_compiler());
        let compiler = engine.file_compiler().unwrap();
        assert_eq!(compiler.compile("t", "abc").await.unwrap(), "ABC");
    }

    #[test]
    fn test_compiler_from_settings() {
        let settings = Settings {
            compiler_command: Some("handlebars {infile} -f {outfile}".to_string()),
            ..Settings::default()
        };
        let engine = Engine::new(settings);
        assert!(engine.has_file_compiler());
        assert!(engine.file_compiler().is_ok());
        assert!(engine.stream_compiler().is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_zero_timeout_compiles_without_limit() {
        let settings: Settings = serde_json::from_str(
            r#"{ "compiler_command": "cp {infile} {outfile}", "compiler_timeout_secs": 0 }"#,
        )
        .unwrap();
        let compiler = Engine::new(settings).file_compiler().unwrap();
        assert_eq!(compiler.compile("tpl", "HELLO").await.unwrap(), "HELLO");
    }
}
