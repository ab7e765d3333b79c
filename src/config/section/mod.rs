//! Configuration section definitions.

mod serve;
mod site;
mod weaver;
mod wiki;

pub use serve::ServeConfig;
pub use site::SiteConfig;
pub use weaver::WeaverConfig;
pub use wiki::WikiPaths;
