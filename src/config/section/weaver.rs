//! `[weaver]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [weaver]
//! program = "noweave"
//! args = ["-filter", "l2h", "-index", "-html"]
//! timeout_secs = 120          # 0 disables the limit
//! ```

use crate::weave::Weaver;
use serde::Deserialize;
use std::time::Duration;

/// External weaving tool settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeaverConfig {
    /// Executable name or path, resolved through `PATH`.
    pub program: String,

    /// Arguments placed before the source file path.
    pub args: Vec<String>,

    /// Wall-clock limit for one weave; `0` means unlimited.
    pub timeout_secs: u64,
}

impl WeaverConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Build the invoker for these settings.
    pub fn weaver(&self) -> Weaver {
        Weaver::new(self.program.clone(), self.args.clone(), self.timeout())
    }
}

impl Default for WeaverConfig {
    fn default() -> Self {
        Self {
            program: "noweave".into(),
            args: ["-filter", "l2h", "-index", "-html"]
                .map(String::from)
                .to_vec(),
            timeout_secs: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use std::time::Duration;

    #[test]
    fn test_weaver_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.weaver.program, "noweave");
        assert_eq!(config.weaver.args[0], "-filter");
        assert_eq!(config.weaver.timeout(), None);
    }

    #[test]
    fn test_weaver_override() {
        let config = test_parse_config(
            "[weaver]\nprogram = \"my-weaver\"\nargs = [\"-x\"]\ntimeout_secs = 30",
        );

        assert_eq!(config.weaver.program, "my-weaver");
        assert_eq!(config.weaver.args, vec!["-x"]);
        assert_eq!(config.weaver.timeout(), Some(Duration::from_secs(30)));
    }
}
