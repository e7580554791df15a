use std::mem;

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::core::{Construct, StructuralError};
use crate::{
    ast::{HookKind, Spec, SuiteRegistry},
    tokenizer::{
        keyword::Keyword,
        token::{Span, Token, TokenSpan, Tokenizer},
    },
};

/// Builds suites from spec source.
///
/// The parser walks the token stream once, keeping a small state machine: an
/// open describe, an open spec or hook body, and a comment flag. Body text is
/// never interpreted here; it is collected verbatim for the runner.
#[derive(Debug, Clone, Default)]
pub struct SpecParser {
    tokenizer: Tokenizer,
}

impl SpecParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `input` into a fresh registry. On error nothing is returned, so a
    /// malformed source never leaves a partial suite behind.
    #[tracing::instrument(level = "debug", skip(self, input))]
    pub fn parse(&self, input: &str) -> Result<SuiteRegistry, StructuralError> {
        let mut state = ParserState::default();

        for span in self.tokenizer.tokenize(input) {
            if let Flow::Halt = state.feed(span)? {
                debug!("halt marker reached, discarding remaining input");
                break;
            }
        }

        state.finish()
    }
}

enum Flow {
    Continue,
    Halt,
}

struct PendingSuite {
    description: Option<String>,
    span: Span,
    specs: Vec<Spec>,
    hooks: IndexMap<HookKind, String>,
}

enum OpenBody {
    Spec {
        description: Option<String>,
        span: Span,
    },
    Hook {
        kind: HookKind,
        span: Span,
    },
}

impl OpenBody {
    fn construct(&self) -> Construct {
        match self {
            OpenBody::Spec { .. } => Construct::It,
            OpenBody::Hook { .. } => Construct::Hook,
        }
    }

    fn span(&self) -> Span {
        match self {
            OpenBody::Spec { span, .. } | OpenBody::Hook { span, .. } => *span,
        }
    }

    /// Whether tokens are currently captured into the body buffer.
    fn capturing(&self) -> bool {
        !matches!(
            self,
            OpenBody::Spec {
                description: None,
                ..
            }
        )
    }
}

#[derive(Default)]
struct ParserState {
    registry: SuiteRegistry,
    suite: Option<PendingSuite>,
    body: Option<OpenBody>,
    buffer: String,
    commenting: bool,
}

impl ParserState {
    fn feed(&mut self, span: TokenSpan<'_>) -> Result<Flow, StructuralError> {
        let at = Span::from(&span);

        if self.commenting {
            if span.token.is_newline() {
                self.commenting = false;
            }
            return Ok(Flow::Continue);
        }

        match span.token {
            Token::Keyword(Keyword::Halt) => return Ok(Flow::Halt),
            Token::Keyword(Keyword::End) => self.close(at)?,
            Token::Keyword(Keyword::Describe) => self.open_describe(at)?,
            Token::Keyword(kw @ Keyword::It) => {
                self.ensure_can_open(kw, at)?;
                self.body = Some(OpenBody::Spec {
                    description: None,
                    span: at,
                });
            }
            Token::Keyword(kw) => {
                if let Some(kind) = kw.hook() {
                    self.ensure_can_open(kw, at)?;
                    debug!(hook = %kind, "capturing hook body");
                    self.body = Some(OpenBody::Hook { kind, span: at });
                }
            }
            token => self.text(token, at)?,
        }

        Ok(Flow::Continue)
    }

    fn open_describe(&mut self, at: Span) -> Result<(), StructuralError> {
        if let Some(body) = &self.body {
            return Err(StructuralError::Nested {
                keyword: Keyword::Describe,
                open: body.construct(),
                span: at,
            });
        }
        if self.suite.is_some() {
            return Err(StructuralError::Nested {
                keyword: Keyword::Describe,
                open: Construct::Describe,
                span: at,
            });
        }
        self.suite = Some(PendingSuite {
            description: None,
            span: at,
            specs: Vec::new(),
            hooks: IndexMap::new(),
        });
        Ok(())
    }

    fn ensure_can_open(&self, keyword: Keyword, at: Span) -> Result<(), StructuralError> {
        if let Some(body) = &self.body {
            return Err(StructuralError::Nested {
                keyword,
                open: body.construct(),
                span: at,
            });
        }
        match &self.suite {
            None => Err(StructuralError::OutsideSuite { keyword, span: at }),
            Some(PendingSuite {
                description: None,
                span,
                ..
            }) => Err(StructuralError::MissingDescription {
                construct: Construct::Describe,
                span: *span,
            }),
            Some(_) => Ok(()),
        }
    }

    fn text(&mut self, token: Token<'_>, at: Span) -> Result<(), StructuralError> {
        match &mut self.body {
            Some(body) if body.capturing() => {
                self.buffer.push_str(token.raw());
                Ok(())
            }
            Some(OpenBody::Spec { description, span }) => match token {
                Token::Literal(_) => {
                    *description = token.literal_text().map(str::to_string);
                    Ok(())
                }
                t if t.raw().trim().is_empty() => Ok(()),
                _ => Err(StructuralError::MissingDescription {
                    construct: Construct::It,
                    span: *span,
                }),
            },
            Some(OpenBody::Hook { .. }) => Ok(()),
            None => {
                match (token, &mut self.suite) {
                    (Token::CommentMarker, _) => self.commenting = true,
                    (Token::Literal(raw), Some(suite)) => {
                        if suite.description.is_some() {
                            return Err(StructuralError::UnexpectedLiteral {
                                literal: raw.to_string(),
                                span: at,
                            });
                        }
                        suite.description = token.literal_text().map(str::to_string);
                    }
                    // Loose text between constructs carries no meaning.
                    _ => {}
                }
                Ok(())
            }
        }
    }

    /// `end` closes an open spec first, then an open hook, then the describe.
    fn close(&mut self, at: Span) -> Result<(), StructuralError> {
        if let Some(body) = self.body.take() {
            let text = mem::take(&mut self.buffer);
            // A body can only be open inside a described suite.
            let Some(suite) = self.suite.as_mut() else {
                return Err(StructuralError::OutsideSuite {
                    keyword: Keyword::End,
                    span: at,
                });
            };
            match body {
                OpenBody::Spec {
                    description: Some(description),
                    ..
                } => {
                    debug!(spec = %description, "spec closed");
                    suite.specs.push(Spec::new(description, text));
                }
                OpenBody::Spec {
                    description: None,
                    span,
                } => {
                    return Err(StructuralError::MissingDescription {
                        construct: Construct::It,
                        span,
                    })
                }
                OpenBody::Hook { kind, .. } => {
                    suite.hooks.insert(kind, text);
                }
            }
            return Ok(());
        }

        match self.suite.take() {
            Some(PendingSuite {
                description: Some(description),
                specs,
                hooks,
                ..
            }) => {
                debug!(suite = %description, specs = specs.len(), "suite closed");
                let suite = self.registry.get_or_insert(&description);
                for spec in specs {
                    suite.add_spec(spec);
                }
                for (kind, body) in hooks {
                    suite.set_hook(kind, body);
                }
                Ok(())
            }
            Some(PendingSuite {
                description: None,
                span,
                ..
            }) => Err(StructuralError::MissingDescription {
                construct: Construct::Describe,
                span,
            }),
            None => {
                warn!(%at, "end without an open construct");
                Err(StructuralError::UnmatchedEnd { span: at })
            }
        }
    }

    fn finish(self) -> Result<SuiteRegistry, StructuralError> {
        if let Some(body) = self.body {
            return Err(StructuralError::Unterminated {
                construct: body.construct(),
                span: body.span(),
            });
        }
        if let Some(suite) = self.suite {
            return Err(StructuralError::Unterminated {
                construct: Construct::Describe,
                span: suite.span,
            });
        }
        Ok(self.registry)
    }
}
