use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing configuration: {0}")]
    Configuration(String),
    #[error("Unclosed tag, looking for '{0}'")]
    UnclosedTag(String),
    #[error("Empty block tag")]
    EmptyBlockTag,
    #[error("Invalid block tag: '{0}'")]
    InvalidBlockTag(String),
    #[error("Template Syntax Error: {0}")]
    Syntax(String),
    #[error("Markup Error: {0}")]
    Markup(String),
    #[error("Unterminated template block: '{0}'")]
    UnterminatedFragment(String),
    #[error("Unable to run {command}: {status}")]
    CompilerFailed { command: String, status: String },
    #[error("Compiler timed out after {millis}ms: {command}")]
    CompilerTimeout { command: String, millis: u64 },
    #[error("Compiler output is not valid UTF-8: {0}")]
    CompilerOutput(String),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}
