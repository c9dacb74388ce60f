//! Ordered-fallback dialect guessing.
//!
//! The guesser tries each configuration of a fixed list against the same
//! source text. The first configuration that accepts the text wins; when none
//! does, every configuration's error is returned in the order it was tried.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use jsdriver_syntax::{
    AttemptResult, EngineError, ParseConfiguration, ParseEngine, ParseError, SyntaxTree,
    TreeSitterEngine,
};

/// Tracing target for guesser diagnostics.
pub(crate) const GUESSER_TARGET: &str = "jsdriverd::guesser";

/// Configurations tried by default: module goal first, then script goal.
pub const DEFAULT_GUESSING_ORDER: &[ParseConfiguration] =
    &[ParseConfiguration::MODULE, ParseConfiguration::SCRIPT];

/// Result of guessing the dialect of a piece of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// A configuration accepted the text.
    Parsed(SyntaxTree),
    /// Every configuration rejected the text; one error per attempt, in
    /// attempt order.
    AllAttemptsFailed(Vec<ParseError>),
}

/// Returned when a guesser is built with no configurations to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("guessing order must contain at least one configuration")]
pub struct EmptyGuessingOrder;

/// Tries parse configurations in a fixed order until one succeeds.
///
/// The guesser holds no mutable state, so one instance can serve any number
/// of threads and repeated calls on the same text return equal outcomes.
#[derive(Clone)]
pub struct DialectGuesser {
    engine: Arc<dyn ParseEngine>,
    order: &'static [ParseConfiguration],
}

impl DialectGuesser {
    /// Builds a guesser over `engine` using [`DEFAULT_GUESSING_ORDER`].
    pub fn new(engine: impl ParseEngine + 'static) -> Self {
        Self {
            engine: Arc::new(engine),
            order: DEFAULT_GUESSING_ORDER,
        }
    }

    /// Builds a guesser that tries `order` front to back.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyGuessingOrder`] when `order` is empty, since such a
    /// guesser could fail without reporting a single error.
    pub fn with_order(
        engine: impl ParseEngine + 'static,
        order: &'static [ParseConfiguration],
    ) -> Result<Self, EmptyGuessingOrder> {
        if order.is_empty() {
            return Err(EmptyGuessingOrder);
        }
        Ok(Self {
            engine: Arc::new(engine),
            order,
        })
    }

    /// Configurations in the order they are tried.
    #[must_use]
    pub const fn order(&self) -> &'static [ParseConfiguration] {
        self.order
    }

    /// Guesses the dialect of `source`.
    ///
    /// # Errors
    ///
    /// Returns the engine's error as soon as any attempt fails to run; no
    /// further configurations are tried.
    pub fn guess(&self, source: &str) -> Result<GuessOutcome, EngineError> {
        let mut errors = Vec::with_capacity(self.order.len());
        for configuration in self.order {
            match self.engine.attempt(source, configuration)? {
                AttemptResult::Success(tree) => {
                    debug!(
                        target: GUESSER_TARGET,
                        configuration = configuration.name(),
                        rejected = errors.len(),
                        "source accepted"
                    );
                    return Ok(GuessOutcome::Parsed(tree));
                }
                AttemptResult::Failure(error) => {
                    debug!(
                        target: GUESSER_TARGET,
                        configuration = configuration.name(),
                        %error,
                        "source rejected"
                    );
                    errors.push(error);
                }
            }
        }
        Ok(GuessOutcome::AllAttemptsFailed(errors))
    }
}

impl Default for DialectGuesser {
    fn default() -> Self {
        Self::new(TreeSitterEngine::new())
    }
}

impl std::fmt::Debug for DialectGuesser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.order.iter().map(ParseConfiguration::name).collect();
        f.debug_struct("DialectGuesser")
            .field("order", &names)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsdriver_syntax::{Grammar, SourcePosition, SourceSpan, SourceType, SyntaxNode};
    use mockall::{Sequence, mock, predicate};
    use rstest::{fixture, rstest};

    mock! {
        Engine {}

        impl ParseEngine for Engine {
            fn attempt(
                &self,
                source: &str,
                configuration: &ParseConfiguration,
            ) -> Result<AttemptResult, EngineError>;
        }
    }

    fn tree(source_type: SourceType) -> SyntaxTree {
        let origin = SourcePosition {
            line: 1,
            column: 1,
            offset: 0,
        };
        let span = SourceSpan {
            start: origin,
            end: origin,
        };
        SyntaxTree::new(source_type, SyntaxNode::new("program", span))
    }

    fn is_named(name: &'static str) -> impl Fn(&ParseConfiguration) -> bool {
        move |configuration| configuration.name() == name
    }

    #[fixture]
    fn guesser() -> DialectGuesser {
        DialectGuesser::default()
    }

    #[test]
    fn first_success_short_circuits() {
        let mut engine = MockEngine::new();
        engine
            .expect_attempt()
            .withf(|_, configuration| configuration.name() == "module")
            .times(1)
            .returning(|_, _| Ok(AttemptResult::Success(tree(SourceType::Module))));
        engine
            .expect_attempt()
            .withf(|_, configuration| configuration.name() == "script")
            .never();

        let outcome = DialectGuesser::new(engine).guess("export default 42;");

        assert_eq!(outcome, Ok(GuessOutcome::Parsed(tree(SourceType::Module))));
    }

    #[test]
    fn falls_back_to_script_after_module_rejects() {
        let mut sequence = Sequence::new();
        let mut engine = MockEngine::new();
        engine
            .expect_attempt()
            .with(predicate::eq("return 1;"), predicate::function(is_named("module")))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| {
                Ok(AttemptResult::Failure(ParseError::new(
                    "'return' outside of function (1:1)",
                )))
            });
        engine
            .expect_attempt()
            .with(predicate::eq("return 1;"), predicate::function(is_named("script")))
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(AttemptResult::Success(tree(SourceType::Script))));

        let outcome = DialectGuesser::new(engine).guess("return 1;");

        assert_eq!(outcome, Ok(GuessOutcome::Parsed(tree(SourceType::Script))));
    }

    #[test]
    fn aggregates_every_error_in_attempt_order() {
        let mut engine = MockEngine::new();
        engine.expect_attempt().times(2).returning(|_, configuration| {
            Ok(AttemptResult::Failure(ParseError::new(format!(
                "{} rejected",
                configuration.name()
            ))))
        });

        let outcome = DialectGuesser::new(engine).guess("a +% b");

        let Ok(GuessOutcome::AllAttemptsFailed(errors)) = outcome else {
            panic!("expected aggregated failure, got {outcome:?}");
        };
        let messages: Vec<&str> = errors.iter().map(ParseError::message).collect();
        assert_eq!(messages, ["module rejected", "script rejected"]);
    }

    #[test]
    fn engine_failure_aborts_the_sequence() {
        let mut engine = MockEngine::new();
        engine
            .expect_attempt()
            .withf(|_, configuration| configuration.name() == "module")
            .times(1)
            .returning(|_, _| Err(EngineError::no_tree(Grammar::Typed)));
        engine
            .expect_attempt()
            .withf(|_, configuration| configuration.name() == "script")
            .never();

        let outcome = DialectGuesser::new(engine).guess("a;");

        assert_eq!(outcome, Err(EngineError::no_tree(Grammar::Typed)));
    }

    #[test]
    fn custom_order_is_respected() {
        const SCRIPT_ONLY: &[ParseConfiguration] = &[ParseConfiguration::SCRIPT];
        let mut engine = MockEngine::new();
        engine
            .expect_attempt()
            .withf(|_, configuration| configuration.name() == "script")
            .times(1)
            .returning(|_, _| Ok(AttemptResult::Failure(ParseError::new("nope"))));

        let guesser = DialectGuesser::with_order(engine, SCRIPT_ONLY).expect("non-empty order");
        let outcome = guesser.guess("x");

        assert_eq!(
            outcome,
            Ok(GuessOutcome::AllAttemptsFailed(vec![ParseError::new("nope")]))
        );
    }

    #[test]
    fn empty_order_is_rejected() {
        let result = DialectGuesser::with_order(MockEngine::new(), &[]);
        assert!(matches!(result, Err(EmptyGuessingOrder)));
    }

    #[rstest]
    fn default_order_is_module_then_script(guesser: DialectGuesser) {
        let names: Vec<&str> = guesser.order().iter().map(ParseConfiguration::name).collect();
        assert_eq!(names, ["module", "script"]);
    }

    #[rstest]
    fn module_source_parses_as_module(guesser: DialectGuesser) {
        let outcome = guesser.guess("export default 42;").expect("engine");
        let GuessOutcome::Parsed(tree) = outcome else {
            panic!("expected a parse, got {outcome:?}");
        };
        assert_eq!(tree.source_type(), SourceType::Module);
    }

    #[rstest]
    fn bare_return_falls_back_to_script(guesser: DialectGuesser) {
        let outcome = guesser.guess("return 1;").expect("engine");
        let GuessOutcome::Parsed(tree) = outcome else {
            panic!("expected a parse, got {outcome:?}");
        };
        assert_eq!(tree.source_type(), SourceType::Script);
    }

    #[rstest]
    fn invalid_source_reports_one_error_per_configuration(guesser: DialectGuesser) {
        let outcome = guesser.guess("a +% b").expect("engine");
        let GuessOutcome::AllAttemptsFailed(errors) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(errors.len(), 2);
        assert!(
            errors
                .iter()
                .all(|error| error.message().starts_with("Unexpected token"))
        );
    }

    #[rstest]
    #[case("export default 42;")]
    #[case("return 1;")]
    #[case("a +% b")]
    fn guessing_is_idempotent(guesser: DialectGuesser, #[case] source: &str) {
        assert_eq!(guesser.guess(source), guesser.guess(source));
    }
}
