//! Parse configurations.
//!
//! A [`ParseConfiguration`] is a named, immutable bundle of grammar options
//! and enabled extensions. Configurations are `const` values so a guessing
//! order can be declared as a static table with no runtime mutation path.

use std::fmt;

use serde::Serialize;

use crate::extension::GrammarExtension;
use crate::grammar::Grammar;

/// Goal symbol a configuration parses towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// ES module: strict mode, `import`/`export`, top-level `await`.
    Module,
    /// Classic script.
    Script,
}

impl SourceType {
    /// Returns the lower-case identifier for this source type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Script => "script",
        }
    }

    /// Returns whether code is implicitly strict under this goal.
    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Module)
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grammar options and extensions used for a single parse attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfiguration {
    name: &'static str,
    source_type: SourceType,
    allow_import_export_everywhere: bool,
    allow_return_outside_function: bool,
    extensions: &'static [GrammarExtension],
}

impl ParseConfiguration {
    /// Module goal with `import`/`export` permitted in any statement position.
    pub const MODULE: Self =
        Self::new("module", SourceType::Module).allowing_import_export_everywhere();

    /// Script goal with `return` permitted outside functions.
    pub const SCRIPT: Self =
        Self::new("script", SourceType::Script).allowing_return_outside_function();

    /// Creates a configuration with every extension enabled and both
    /// permissive options off.
    #[must_use]
    pub const fn new(name: &'static str, source_type: SourceType) -> Self {
        Self {
            name,
            source_type,
            allow_import_export_everywhere: false,
            allow_return_outside_function: false,
            extensions: GrammarExtension::ALL,
        }
    }

    /// Replaces the enabled extensions.
    #[must_use]
    pub const fn with_extensions(mut self, extensions: &'static [GrammarExtension]) -> Self {
        self.extensions = extensions;
        self
    }

    /// Permits `import`/`export` declarations below the top level.
    #[must_use]
    pub const fn allowing_import_export_everywhere(mut self) -> Self {
        self.allow_import_export_everywhere = true;
        self
    }

    /// Permits `return` statements outside any function body.
    #[must_use]
    pub const fn allowing_return_outside_function(mut self) -> Self {
        self.allow_return_outside_function = true;
        self
    }

    /// Name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Goal symbol of the attempt.
    #[must_use]
    pub const fn source_type(&self) -> SourceType {
        self.source_type
    }

    /// Whether `import`/`export` may appear below the top level.
    #[must_use]
    pub const fn allow_import_export_everywhere(&self) -> bool {
        self.allow_import_export_everywhere
    }

    /// Whether `return` may appear outside a function.
    #[must_use]
    pub const fn allow_return_outside_function(&self) -> bool {
        self.allow_return_outside_function
    }

    /// Enabled extensions.
    #[must_use]
    pub const fn extensions(&self) -> &'static [GrammarExtension] {
        self.extensions
    }

    /// Returns whether `extension` is enabled.
    #[must_use]
    pub fn enables(&self, extension: GrammarExtension) -> bool {
        self.extensions.contains(&extension)
    }

    /// Grammar the engine loads for this configuration.
    #[must_use]
    pub fn grammar(&self) -> Grammar {
        if self.enables(GrammarExtension::Flow) {
            Grammar::Typed
        } else {
            Grammar::JavaScript
        }
    }
}
