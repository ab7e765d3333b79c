//! Configuration and environment diagnostics.
//!
//! Verifies everything `serve` needs before the first request: a resolvable
//! weaver executable, a readable credentials file, and where the document
//! roots will land.

use crate::config::WikiConfig;
use crate::log;
use crate::users::UserDirectory;
use anyhow::{Result, bail};

pub fn run(config: &WikiConfig) -> Result<()> {
    let mut broken = false;

    match which::which(&config.weaver.program) {
        Ok(path) => log!("check"; "weaver `{}` found at {}", config.weaver.program, path.display()),
        Err(e) => {
            log!("error"; "weaver `{}` not found: {}", config.weaver.program, e);
            broken = true;
        }
    }

    match UserDirectory::load(&config.wiki.users_file) {
        Ok(users) if users.is_empty() => {
            log!("warning"; "`{}` has no users; nobody can log in", config.wiki.users_file.display());
        }
        Ok(users) => log!("check"; "{} user(s) in `{}`", users.len(), config.wiki.users_file.display()),
        Err(e) => {
            log!("error"; "{e:#}");
            broken = true;
        }
    }

    for (name, dir) in [
        ("source", &config.wiki.source_dir),
        ("dest", &config.wiki.dest_dir),
    ] {
        if dir.is_dir() {
            log!("check"; "{} root `{}` exists", name, dir.display());
        } else {
            log!("check"; "{} root `{}` will be created on first use", name, dir.display());
        }
    }

    if broken {
        bail!("check failed");
    }
    log!("check"; "ok");
    Ok(())
}
