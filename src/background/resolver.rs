//! Background resolution: ask the external match service first, fall back to
//! keyword scoring on any failure. The public entry points always produce a
//! catalog record; failures only show up in the log.

use thiserror::Error;

use super::catalog::{BackgroundRecord, Catalog};
use super::matcher::best_match;

/// Reasons the external path was abandoned. Never leaves this module's
/// public `resolve*` functions; converted into the keyword fallback.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("match service answered with HTTP {0}")]
    Status(u16),
    #[error("could not encode match service request: {0}")]
    Encode(serde_json::Error),
    #[error("malformed match service payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("match service returned an empty answer")]
    EmptyAnswer,
    #[error("match service picked unknown background {0:?}")]
    UnknownId(String),
}

/// Black-box text completion: prompt in, raw reply text out.
#[allow(async_fn_in_trait)]
pub trait MatchService {
    async fn complete(&self, prompt: &str) -> Result<String, ResolveError>;
}

/// Which path produced a resolution (observability only).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchPath {
    /// Blank input, nothing attempted.
    Default,
    External,
    Fallback,
}

#[derive(Clone, Copy, Debug)]
pub struct Resolution<'c> {
    pub record: &'c BackgroundRecord,
    pub path: MatchPath,
}

pub struct Resolver<'c, S> {
    catalog: &'c Catalog,
    service: Option<S>,
}

impl<'c, S: MatchService> Resolver<'c, S> {
    /// `service = None` means no credential: keyword matching only.
    pub fn new(catalog: &'c Catalog, service: Option<S>) -> Self {
        Self { catalog, service }
    }

    pub fn keyword_only(catalog: &'c Catalog) -> Self {
        Self::new(catalog, None)
    }

    pub fn has_service(&self) -> bool {
        self.service.is_some()
    }

    pub async fn resolve(&self, input: &str) -> &'c BackgroundRecord {
        self.resolve_traced(input).await.record
    }

    pub async fn resolve_traced(&self, input: &str) -> Resolution<'c> {
        if input.trim().is_empty() {
            let record = self.catalog.default_record();
            log::info!("background: blank answer, using default {}", record.id);
            return Resolution {
                record,
                path: MatchPath::Default,
            };
        }

        let Some(service) = &self.service else {
            log::info!("background: no match service credential, keyword matching only");
            return self.fallback(input);
        };

        match self.ask(service, input).await {
            Ok(record) => {
                log::info!("background: external match picked {}", record.id);
                Resolution {
                    record,
                    path: MatchPath::External,
                }
            }
            Err(err) => {
                log::warn!("background: external match failed ({}), falling back", err);
                self.fallback(input)
            }
        }
    }

    async fn ask(&self, service: &S, input: &str) -> Result<&'c BackgroundRecord, ResolveError> {
        let prompt = build_prompt(self.catalog, input);
        let reply = service.complete(&prompt).await?;
        let id = normalize_reply(&reply);
        if id.is_empty() {
            return Err(ResolveError::EmptyAnswer);
        }
        self.catalog
            .get(id)
            .ok_or_else(|| ResolveError::UnknownId(id.to_string()))
    }

    fn fallback(&self, input: &str) -> Resolution<'c> {
        let record = best_match(input, self.catalog.records(), self.catalog.default_record());
        log::info!("background: keyword fallback picked {}", record.id);
        Resolution {
            record,
            path: MatchPath::Fallback,
        }
    }
}

/// Instruction prompt listing every catalog entry as
/// `id: title - description (tags: a, b, c)` followed by the raw answer.
pub fn build_prompt(catalog: &Catalog, input: &str) -> String {
    let mut prompt = String::from(
        "You pick the background scene for a children's exploration game.\n\
         Choose the single background that best fits the player's answer.\n\n\
         Available backgrounds:\n",
    );
    for r in catalog.records() {
        prompt.push_str(&format!(
            "{}: {} - {} (tags: {})\n",
            r.id,
            r.title,
            r.description,
            r.tags.join(", ")
        ));
    }
    prompt.push_str(&format!(
        "\nPlayer's answer: \"{}\"\n\n\
         Reply with only the id of the best background (for example: {}). No other text.",
        input.trim(),
        catalog.default_record().id
    ));
    prompt
}

/// Strip whitespace, quotes and trailing punctuation the model tends to add.
pub fn normalize_reply(reply: &str) -> &str {
    reply
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '.') || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn small_catalog() -> Catalog {
        Catalog::new(
            vec![
                BackgroundRecord::new("bg1", "Meadow", "Grass.", &["meadow", "sunshine"]),
                BackgroundRecord::new("bg7", "Space Nebula", "Stars.", &["space", "stars"]),
            ],
            0,
        )
    }

    struct Scripted {
        reply: Result<&'static str, u16>,
        calls: Cell<u32>,
    }

    impl MatchService for Scripted {
        async fn complete(&self, _prompt: &str) -> Result<String, ResolveError> {
            self.calls.set(self.calls.get() + 1);
            self.reply
                .map(str::to_string)
                .map_err(ResolveError::Status)
        }
    }

    #[test]
    fn normalize_strips_decoration() {
        assert_eq!(normalize_reply("  \"bg7\".\n"), "bg7");
        assert_eq!(normalize_reply("`bg12`"), "bg12");
        assert_eq!(normalize_reply("   "), "");
    }

    #[test]
    fn prompt_lists_catalog_and_answer() {
        let cat = small_catalog();
        let prompt = build_prompt(&cat, "  rockets and stars ");
        assert!(prompt.contains("bg7: Space Nebula - Stars. (tags: space, stars)"));
        assert!(prompt.contains("bg1: Meadow - Grass. (tags: meadow, sunshine)"));
        assert!(prompt.contains("\"rockets and stars\""));
    }

    #[test]
    fn external_reply_is_used_case_insensitively() {
        let cat = small_catalog();
        let svc = Scripted {
            reply: Ok(" BG7 "),
            calls: Cell::new(0),
        };
        let resolver = Resolver::new(&cat, Some(svc));
        let res = pollster::block_on(resolver.resolve_traced("galaxy"));
        assert_eq!(res.record.id, "bg7");
        assert_eq!(res.path, MatchPath::External);
    }

    #[test]
    fn unknown_id_falls_back_to_keywords() {
        let cat = small_catalog();
        let svc = Scripted {
            reply: Ok("bg99"),
            calls: Cell::new(0),
        };
        let resolver = Resolver::new(&cat, Some(svc));
        let res = pollster::block_on(resolver.resolve_traced("outer space"));
        assert_eq!(res.record.id, "bg7");
        assert_eq!(res.path, MatchPath::Fallback);
    }

    #[test]
    fn service_error_falls_back_to_keywords() {
        let cat = small_catalog();
        let svc = Scripted {
            reply: Err(503),
            calls: Cell::new(0),
        };
        let resolver = Resolver::new(&cat, Some(svc));
        let res = pollster::block_on(resolver.resolve_traced("nothing matches here"));
        assert_eq!(res.record.id, "bg1");
        assert_eq!(res.path, MatchPath::Fallback);
    }

    #[test]
    fn empty_reply_falls_back() {
        let cat = small_catalog();
        let svc = Scripted {
            reply: Ok("  "),
            calls: Cell::new(0),
        };
        let resolver = Resolver::new(&cat, Some(svc));
        let res = pollster::block_on(resolver.resolve_traced("space"));
        assert_eq!(res.path, MatchPath::Fallback);
        assert_eq!(res.record.id, "bg7");
    }

    #[test]
    fn blank_input_skips_service() {
        let cat = small_catalog();
        let resolver = Resolver::new(
            &cat,
            Some(Scripted {
                reply: Ok("bg7"),
                calls: Cell::new(0),
            }),
        );
        let res = pollster::block_on(resolver.resolve_traced(" \t "));
        assert_eq!(res.record.id, "bg1");
        assert_eq!(res.path, MatchPath::Default);
        assert_eq!(resolver.service.as_ref().map(|s| s.calls.get()), Some(0));
    }
}
