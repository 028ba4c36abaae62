use crate::Result;
use crate::compiler::{Compiler, command};
use crate::error::Error;
use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

/// Compiles through temporary files: the command receives `{infile}` holding
/// the template source and must write the result to `{outfile}`.
///
/// Each call works in a fresh temporary directory which is removed whether
/// the compiler succeeds or not.
pub struct FileCompiler {
    command: String,
    temp_root: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl FileCompiler {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            temp_root: None,
            timeout: None,
        }
    }

    pub fn temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn workdir(&self) -> Result<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("handlebars-");
        let dir = match &self.temp_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }
}

#[async_trait]
impl Compiler for FileCompiler {
    async fn compile(&self, name: &str, source: &str) -> Result<String> {
        let workdir = self.workdir()?;
        let stem = file_stem(name);
        let infile = workdir.path().join(&stem);
        let outfile = workdir.path().join(format!("{}.compiled", stem));

        tokio::fs::write(&infile, source).await?;

        let infile_arg = infile.display().to_string();
        let outfile_arg = outfile.display().to_string();
        let command = command::expand(
            &self.command,
            &[("{infile}", &infile_arg), ("{outfile}", &outfile_arg)],
        );
        command::run(&command, None, self.timeout).await?;

        let compiled = tokio::fs::read(&outfile).await?;
        tokio::fs::remove_file(&infile).await?;
        tokio::fs::remove_file(&outfile).await?;
        debug!("Removing compiler workdir {}", workdir.path().display());
        workdir.close()?;

        String::from_utf8(compiled).map_err(|_| Error::CompilerOutput(command))
    }
}

/// File name for a template: the compiler may derive the template name from
/// it, so keep it recognisable but never let it leave the working directory.
fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.chars().all(|c| c == '.') {
        "template".to_string()
    } else {
        stem
    }
}
