//! Per-context encoder configuration.
//!
//! The embedding context builds an [`EncoderConfig`] once when it creates the encoder. Besides
//! the plain constructor there is [`EncoderConfig::from_env`], which lets test rigs override the
//! advertised version, the draw flush interval and the extension list without recompiling:
//! - `AERO_GLES_VERSION`: `major.minor`, e.g. `3.1`.
//! - `AERO_GLES_DRAW_FLUSH_INTERVAL`: draws between forced flushes; `0` disables the flush.
//! - `AERO_GLES_EXTENSIONS`: space separated extension names.

use aero_gles_state::HostCaps;
use tracing::warn;

pub const GLES_VERSION_ENV: &str = "AERO_GLES_VERSION";
pub const DRAW_FLUSH_INTERVAL_ENV: &str = "AERO_GLES_DRAW_FLUSH_INTERVAL";
pub const EXTENSIONS_ENV: &str = "AERO_GLES_EXTENSIONS";

pub const DEFAULT_DRAW_CALL_FLUSH_INTERVAL: u32 = 800;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    /// ES version the context advertises; gates targets, pnames and limits.
    pub gles_version: (u32, u32),
    /// The command stream is flushed after this many draw calls.
    pub draw_call_flush_interval: u32,
    /// Extensions reported by `GetString(EXTENSIONS)` and `GetStringi`.
    pub extensions: Vec<String>,
    pub host_caps: HostCaps,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            gles_version: (3, 0),
            draw_call_flush_interval: DEFAULT_DRAW_CALL_FLUSH_INTERVAL,
            extensions: Vec::new(),
            host_caps: HostCaps::default(),
        }
    }
}

impl EncoderConfig {
    pub fn with_version(mut self, major: u32, minor: u32) -> Self {
        self.gles_version = (major, minor);
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_host_caps(mut self, caps: HostCaps) -> Self {
        self.host_caps = caps;
        self
    }

    /// Defaults overridden by the `AERO_GLES_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`; malformed values are logged and ignored.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(GLES_VERSION_ENV) {
            match parse_version(&raw) {
                Some(v) => self.gles_version = v,
                None => warn!(var = GLES_VERSION_ENV, value = %raw, "ignoring malformed GLES version"),
            }
        }
        if let Some(raw) = lookup(DRAW_FLUSH_INTERVAL_ENV) {
            match parse_u32(&raw) {
                Some(v) => self.draw_call_flush_interval = v,
                None => warn!(var = DRAW_FLUSH_INTERVAL_ENV, value = %raw, "ignoring malformed flush interval"),
            }
        }
        if let Some(raw) = lookup(EXTENSIONS_ENV) {
            self.extensions = raw.split_whitespace().map(str::to_owned).collect();
        }
        self
    }
}

fn parse_u32(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

/// `"3"`, `"3.1"`; only ES 2.0 through 3.2 are accepted.
fn parse_version(raw: &str) -> Option<(u32, u32)> {
    let raw = raw.trim();
    let (major, minor) = match raw.split_once('.') {
        Some((major, minor)) => (parse_u32(major)?, parse_u32(minor)?),
        None => (parse_u32(raw)?, 0),
    };
    match (major, minor) {
        (2, 0) | (3, 0..=2) => Some((major, minor)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_owned())
        }
    }

    #[test]
    fn overrides_replace_defaults() {
        let cfg = EncoderConfig::default().apply_overrides(lookup(&[
            (GLES_VERSION_ENV, "3.1"),
            (DRAW_FLUSH_INTERVAL_ENV, " 16 "),
            (EXTENSIONS_ENV, "GL_OES_EGL_image_external  GL_EXT_color_buffer_float"),
        ]));
        assert_eq!(cfg.gles_version, (3, 1));
        assert_eq!(cfg.draw_call_flush_interval, 16);
        assert_eq!(
            cfg.extensions,
            vec!["GL_OES_EGL_image_external", "GL_EXT_color_buffer_float"]
        );
    }

    #[test]
    fn malformed_values_keep_defaults() {
        let cfg = EncoderConfig::default().apply_overrides(lookup(&[
            (GLES_VERSION_ENV, "4.6"),
            (DRAW_FLUSH_INTERVAL_ENV, "often"),
        ]));
        assert_eq!(cfg, EncoderConfig::default());
    }

    #[test]
    fn bare_major_version_means_minor_zero() {
        assert_eq!(parse_version("2"), Some((2, 0)));
        assert_eq!(parse_version("3.x"), None);
    }
}
