//! Optional grammar extensions.
//!
//! Extension names follow the plugin identifiers JavaScript tooling uses
//! (`jsx`, `optionalChaining`, ...), so configurations and error messages
//! read the same as in the wider ecosystem.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// An optional grammar extension a configuration may enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarExtension {
    /// JSX elements and fragments.
    Jsx,
    /// Flow-style type annotations. Selects the typed grammar.
    Flow,
    /// `do { ... }` expressions.
    DoExpressions,
    /// Object spread and rest (`{ ...a }`).
    ObjectRestSpread,
    /// Decorators (`@dec class A {}`).
    Decorators2,
    /// Public class fields.
    ClassProperties,
    /// Private class fields (`#x`).
    ClassPrivateProperties,
    /// Private class methods (`#m() {}`).
    ClassPrivateMethods,
    /// `export * as ns from "mod"`.
    ExportExtensions,
    /// `async function*`.
    AsyncGenerators,
    /// `::` bind operator.
    FunctionBind,
    /// `function.sent` meta property.
    FunctionSend,
    /// `import()` calls.
    DynamicImport,
    /// `1_000_000`.
    NumericSeparator,
    /// `a?.b`.
    OptionalChaining,
    /// `import.meta`.
    ImportMeta,
    /// `10n`.
    BigInt,
    /// `catch {}` without a binding.
    OptionalCatchBinding,
    /// `throw` in expression position.
    ThrowExpressions,
    /// `|>` pipelines.
    PipelineOperator,
    /// `a ?? b` and `a ??= b`.
    NullishCoalescingOperator,
}

impl GrammarExtension {
    /// Every extension, in the order the default configurations list them.
    pub const ALL: &'static [Self] = &[
        Self::Jsx,
        Self::Flow,
        Self::DoExpressions,
        Self::ObjectRestSpread,
        Self::Decorators2,
        Self::ClassProperties,
        Self::ClassPrivateProperties,
        Self::ClassPrivateMethods,
        Self::ExportExtensions,
        Self::AsyncGenerators,
        Self::FunctionBind,
        Self::FunctionSend,
        Self::DynamicImport,
        Self::NumericSeparator,
        Self::OptionalChaining,
        Self::ImportMeta,
        Self::BigInt,
        Self::OptionalCatchBinding,
        Self::ThrowExpressions,
        Self::PipelineOperator,
        Self::NullishCoalescingOperator,
    ];

    /// Returns the plugin identifier for this extension.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jsx => "jsx",
            Self::Flow => "flow",
            Self::DoExpressions => "doExpressions",
            Self::ObjectRestSpread => "objectRestSpread",
            Self::Decorators2 => "decorators2",
            Self::ClassProperties => "classProperties",
            Self::ClassPrivateProperties => "classPrivateProperties",
            Self::ClassPrivateMethods => "classPrivateMethods",
            Self::ExportExtensions => "exportExtensions",
            Self::AsyncGenerators => "asyncGenerators",
            Self::FunctionBind => "functionBind",
            Self::FunctionSend => "functionSend",
            Self::DynamicImport => "dynamicImport",
            Self::NumericSeparator => "numericSeparator",
            Self::OptionalChaining => "optionalChaining",
            Self::ImportMeta => "importMeta",
            Self::BigInt => "bigInt",
            Self::OptionalCatchBinding => "optionalCatchBinding",
            Self::ThrowExpressions => "throwExpressions",
            Self::PipelineOperator => "pipelineOperator",
            Self::NullishCoalescingOperator => "nullishCoalescingOperator",
        }
    }

    /// Returns whether the Tree-sitter grammars can express this extension.
    ///
    /// Extensions the grammars reject outright are accepted in
    /// configurations but never gate anything.
    #[must_use]
    pub const fn is_recognised_by_grammar(self) -> bool {
        !matches!(
            self,
            Self::DoExpressions
                | Self::FunctionBind
                | Self::FunctionSend
                | Self::ThrowExpressions
                | Self::PipelineOperator
        )
    }
}

impl fmt::Display for GrammarExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when an extension identifier is not recognised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown grammar extension: '{0}'")]
pub struct ExtensionParseError(String);

impl ExtensionParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for GrammarExtension {
    type Err = ExtensionParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|extension| extension.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ExtensionParseError(trimmed.to_owned()))
    }
}
