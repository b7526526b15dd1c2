//! World backgrounds: the compiled-in catalog, keyword scoring and the
//! resolver that turns a player's free-text answer into a catalog record.

mod catalog;
mod fetch;
mod matcher;
mod resolver;

pub use catalog::{BackgroundRecord, Catalog, asset_filename, catalog};
pub use fetch::{ChatCompletionsService, parse_reply, request_body};
pub use matcher::{best_match, score_record};
pub use resolver::{
    MatchPath, MatchService, Resolution, ResolveError, Resolver, build_prompt, normalize_reply,
};
