//! Schema catalog: each named component schema as its own file, exactly as received

use anyhow::Result;

use super::{pretty_json, Artifact};
use crate::description::ResolvedDescription;
use crate::output::layout;

pub fn entries(resolved: &ResolvedDescription) -> Result<Vec<Artifact>> {
    resolved
        .description
        .components
        .schemas
        .iter()
        .map(|(name, typed)| {
            let contents = match resolved.raw_schema(name) {
                Some(raw) => pretty_json(raw)?,
                None => pretty_json(typed)?,
            };
            Ok(Artifact::new(layout::schema_path(name), contents))
        })
        .collect()
}
