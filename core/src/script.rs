use std::path::PathBuf;

use crate::LuairErrorExt;

/// A source file loaded for compilation.
#[derive(Debug, Clone)]
pub struct Script {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Script {
    pub fn new(path: PathBuf) -> Result<Self, Box<dyn LuairErrorExt>> {
        let name = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(&path).map_err(|err| {
            Box::new(MissingScriptError { path: path.clone(), reason: err.to_string() }) as Box<dyn LuairErrorExt>
        })?;
        Ok(Script { name, path, content })
    }

    /// Wrap in-memory source text, e.g. for tests or editor buffers.
    pub fn from_source(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Script { path: PathBuf::from(&name), name, content: content.into() }
    }

    pub fn source_map(&self) -> crate::location::SourceMap<'_> {
        crate::location::SourceMap::new(self.name.clone(), &self.content)
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Script: {} at {:?}", self.name, self.path)
    }
}

#[derive(Debug, Clone)]
pub struct MissingScriptError {
    pub path: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for MissingScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cannot read script at {:?}: {}", self.path, self.reason)
    }
}

impl std::error::Error for MissingScriptError {}

impl LuairErrorExt for MissingScriptError {
    fn level(&self) -> crate::Level {
        crate::Level::Error
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "luair.script".to_string()
    }

    fn span(&self) -> Option<crate::location::Span> {
        None
    }

    fn location(&self) -> Option<crate::location::Location> {
        None
    }
}
