//! One-shot weave of a stored document.
//!
//! `logos-wiki weave Intro` compiles `wikidata/src/Intro.nw` into
//! `wikidata/dst/Intro.html` with the configured weaver, without starting
//! the server. Useful for rebuilding after editing sources on disk.

use crate::artifact::ArtifactStore;
use crate::config::WikiConfig;
use crate::error::WikiError;
use crate::ident::DocumentId;
use crate::log;
use crate::store::SourceStore;
use anyhow::{Context, Result, bail};
use std::fs;

pub fn run(config: &WikiConfig, title: &str) -> Result<()> {
    let id = DocumentId::parse(title)?;

    let store = SourceStore::new(&config.wiki.source_dir, config.wiki.extension.clone());
    let source_path = store.path_for(&id);
    if !source_path.is_file() {
        bail!("no source for `{}` at `{}`", id, source_path.display());
    }

    let artifacts = ArtifactStore::new(&config.wiki.dest_dir);
    fs::create_dir_all(artifacts.root())
        .with_context(|| format!("unable to create `{}`", artifacts.root().display()))?;
    let dest_path = artifacts.path_for(&id);

    config
        .weaver
        .weaver()
        .weave(&source_path, &dest_path)
        .map_err(|source| WikiError::Weave {
            title: id.to_string(),
            source,
        })?;

    log!("weave"; "{} -> {}", source_path.display(), dest_path.display());
    Ok(())
}
