//! `samplerExternalOES` lowering for shader sources.
//!
//! Host drivers get `sampler2D` wherever the guest declared an external sampler, padded so
//! that every column in the source stays where it was (compiler diagnostics keep pointing at
//! the right place). `#extension GL_OES_EGL_image_external*` lines are blanked. The names of
//! the uniforms declared external are returned so the encoder can route texture bindings for
//! them through `TEXTURE_EXTERNAL_OES`.
//!
//! The scan works on unpreprocessed text. A declaration inside a disabled `#if` block or inside
//! a comment is treated like any other.

const EXTERNAL_TYPE: &str = "samplerExternalOES";
const REPLACEMENT: &str = "sampler2D         ";
const EXTENSION_DIRECTIVE: &str = "#extension";
const EXTERNAL_EXTENSION: &str = "GL_OES_EGL_image_external";
const DEFINE_DIRECTIVE: &str = "#define";

/// Rewrites `source` for the host and returns it with the external sampler uniform names, in
/// declaration order.
pub fn rewrite_external_samplers(source: &str) -> (String, Vec<String>) {
    let mut text = source.as_bytes().to_vec();
    blank_extension_lines(&mut text);

    let mut names = Vec::new();
    let aliases = define_aliases(source);
    replace_declarations(&mut text, EXTERNAL_TYPE, true, &mut names);
    for alias in &aliases {
        replace_declarations(&mut text, alias, false, &mut names);
    }

    // Only ASCII bytes were overwritten, and only with ASCII.
    let text = String::from_utf8(text)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
    (text, names)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

fn line_end(text: &[u8], from: usize) -> usize {
    text[from..]
        .iter()
        .position(|&b| b == b'\n' || b == b'\r')
        .map_or(text.len(), |i| i + from)
}

fn line_is_directive(text: &[u8], at: usize) -> bool {
    let start = text[..at]
        .iter()
        .rposition(|&b| b == b'\n' || b == b'\r')
        .map_or(0, |i| i + 1);
    text[start..at]
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'#')
}

/// Both the ES2 extension and its `_essl3` variant share the prefix.
fn blank_extension_lines(text: &mut [u8]) {
    let mut at = 0;
    while let Some(start) = find_from(text, EXTENSION_DIRECTIVE.as_bytes(), at) {
        let end = line_end(text, start);
        let mut c = start + EXTENSION_DIRECTIVE.len();
        while c < end && text[c].is_ascii_whitespace() {
            c += 1;
        }
        if text[c..end].starts_with(EXTERNAL_EXTENSION.as_bytes()) {
            text[start..end].fill(b' ');
        }
        at = end.max(start + 1);
    }
}

/// `#define NAME samplerExternalOES` lines, each giving one alias.
fn define_aliases(source: &str) -> Vec<String> {
    let mut aliases = Vec::new();
    for line in source.lines() {
        let Some(rest) = line.trim_start().strip_prefix(DEFINE_DIRECTIVE) else {
            continue;
        };
        let mut tokens = rest.split_whitespace();
        if let (Some(name), Some(EXTERNAL_TYPE), None) = (tokens.next(), tokens.next(), tokens.next()) {
            if name.bytes().all(is_ident) && !aliases.iter().any(|a| a == name) {
                aliases.push(name.to_owned());
            }
        }
    }
    aliases
}

/// Finds `ty` used as a declaration type, records the declared name, and overwrites the type
/// when `replace` is set. Aliases are left alone: their `#define` line carries the real type,
/// which the direct pass rewrites.
fn replace_declarations(text: &mut [u8], ty: &str, replace: bool, names: &mut Vec<String>) {
    let mut at = 0;
    while let Some(start) = find_from(text, ty.as_bytes(), at) {
        let end = start + ty.len();
        at = end;
        if start == 0 || !text[start - 1].is_ascii_whitespace() {
            continue;
        }
        if end < text.len() && !text[end].is_ascii_whitespace() && text[end] != b';' {
            continue;
        }

        if !line_is_directive(text, start) {
            let mut c = end;
            while c < text.len() && text[c].is_ascii_whitespace() {
                c += 1;
            }
            if c < text.len() && is_ident_start(text[c]) {
                let name_start = c;
                while c < text.len() && is_ident(text[c]) {
                    c += 1;
                }
                let name = String::from_utf8_lossy(&text[name_start..c]).into_owned();
                names.push(name);
            }
        }

        if replace {
            text[start..end].copy_from_slice(REPLACEMENT.as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn direct_declarations_are_lowered_in_place() {
        let src = "#version 100\n\
                   #extension GL_OES_EGL_image_external : require\n\
                   precision mediump float;\n\
                   uniform samplerExternalOES uTex;\n\
                   varying vec2 v;\n\
                   void main() { gl_FragColor = texture2D(uTex, v); }\n";
        let (out, names) = rewrite_external_samplers(src);

        assert_eq!(names, vec!["uTex"]);
        assert_eq!(out.len(), src.len());
        assert!(!out.contains("samplerExternalOES"));
        assert!(!out.contains("#extension"));
        assert!(out.contains("uniform sampler2D          uTex;"));
        assert_eq!(out.lines().count(), src.lines().count());
    }

    #[test]
    fn define_aliases_are_followed() {
        let src = "#extension GL_OES_EGL_image_external_essl3 : require\n\
                   #define EXT samplerExternalOES\n\
                   uniform EXT a;\n\
                   uniform lowp EXT b;\n";
        let (out, names) = rewrite_external_samplers(src);

        assert_eq!(names, vec!["a", "b"]);
        assert!(out.contains("#define EXT sampler2D         \n"));
        assert!(out.contains("uniform EXT a;"));
    }

    #[test]
    fn longer_tokens_and_other_extensions_are_untouched() {
        let src = "#extension GL_OES_standard_derivatives : enable\n\
                   uniform samplerExternalOESx notMe;\n\
                   float xsamplerExternalOES;\n";
        let (out, names) = rewrite_external_samplers(src);

        assert_eq!(out, src);
        assert!(names.is_empty());
    }

    #[test]
    fn non_ascii_text_survives() {
        let src = "// héllo\nuniform samplerExternalOES t; // ünïcode\n";
        let (out, names) = rewrite_external_samplers(src);
        assert_eq!(names, vec!["t"]);
        assert!(out.starts_with("// héllo\nuniform sampler2D"));
        assert!(out.ends_with("// ünïcode\n"));
    }
}
