use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, info};

use crate::error::{Error, Result};

static UNDEFINED_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"undefined reference to `([^']+)'").expect("undefined reference pattern"));

static SCRIPT_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""script"(\s*:\s*")([^"\\]+)""#).expect("script field pattern"));

pub const FIXME_PREFIX: &str = "// FIXME undefined reference: ";

/// Symbols named by `undefined reference to `SYM'` lines in linker output.
pub fn parse_undefined_symbols(output: &str) -> BTreeSet<String> {
    UNDEFINED_REFERENCE
        .captures_iter(output)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Drop the `SPECIAL_` prefix so special-function symbols match their script names.
pub fn normalize_symbols(symbols: &BTreeSet<String>) -> BTreeSet<String> {
    symbols
        .iter()
        .map(|s| s.strip_prefix("SPECIAL_").unwrap_or(s).to_string())
        .collect()
}

/// Prefix every non-comment line mentioning one of `symbols` with [`FIXME_PREFIX`].
///
/// Line endings are kept as they were.
pub fn comment_out_symbols(content: &str, symbols: &BTreeSet<String>) -> (String, usize) {
    let mut touched = 0;
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        let stripped = line.trim_start();
        let skip = stripped.trim_end().is_empty() || stripped.starts_with("//") || stripped.starts_with("/*");
        if !skip && symbols.iter().any(|s| line.contains(s.as_str())) {
            out.push_str(FIXME_PREFIX);
            touched += 1;
        }
        out.push_str(line);
    }
    (out, touched)
}

/// Rename `"script": "SYM"` to `"script_comment": "SYM"` for each undefined `SYM`.
pub fn disable_script_fields(content: &str, symbols: &BTreeSet<String>) -> (String, usize) {
    let mut touched = 0;
    let updated = SCRIPT_FIELD.replace_all(content, |caps: &Captures| {
        if symbols.contains(&caps[2]) {
            touched += 1;
            format!("\"script_comment\"{}{}\"", &caps[1], &caps[2])
        } else {
            caps[0].to_string()
        }
    });
    (updated.into_owned(), touched)
}

/// Split a `--make-args` string the way a shell would.
pub fn split_make_args(args: &str) -> Result<Vec<String>> {
    shlex::split(args).ok_or_else(|| Error::invalid(format!("unbalanced quotes in make arguments: {args}")))
}

/// Run `make` in `root`. Returns the exit code and stdout followed by stderr.
pub fn run_make(root: &Path, args: &[String]) -> Result<(i32, String)> {
    let command_line = std::iter::once("make".to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ");
    info!(command = %command_line, "running make");

    let output = Command::new("make")
        .args(args)
        .current_dir(root)
        .output()
        .map_err(|source| Error::Build {
            command: command_line,
            source,
        })?;

    let code = output.status.code().unwrap_or(-1);
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    debug!(code, bytes = combined.len(), "make finished");
    Ok((code, combined))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
ld: data/maps.o: in function `Foo':
(.text+0x10): undefined reference to `Route1_EventScript_Gone'
(.text+0x20): undefined reference to `SPECIAL_DoThing'
(.text+0x30): undefined reference to `Route1_EventScript_Gone'
";

    #[test]
    fn parses_and_normalizes_symbols() {
        let symbols = parse_undefined_symbols(LOG);
        assert_eq!(symbols.len(), 2);
        let normalized = normalize_symbols(&symbols);
        assert!(normalized.contains("DoThing"));
        assert!(normalized.contains("Route1_EventScript_Gone"));
    }

    #[test]
    fn comments_out_mentions_but_not_comments() {
        let symbols: BTreeSet<String> = ["Gone".to_string()].into();
        let src = "\tcall Gone\r\n\t// call Gone\n\n\tend\n";
        let (out, touched) = comment_out_symbols(src, &symbols);
        assert_eq!(touched, 1);
        assert_eq!(out, "// FIXME undefined reference: \tcall Gone\r\n\t// call Gone\n\n\tend\n");
    }

    #[test]
    fn disables_only_undefined_scripts() {
        let symbols: BTreeSet<String> = ["Gone".to_string()].into();
        let src = r#"{"script": "Gone", "other": {"script" : "Kept"}}"#;
        let (out, touched) = disable_script_fields(src, &symbols);
        assert_eq!(touched, 1);
        assert_eq!(out, r#"{"script_comment": "Gone", "other": {"script" : "Kept"}}"#);
    }

    #[test]
    fn splits_quoted_make_args() {
        assert_eq!(
            split_make_args("-j8 CFLAGS='-O2 -g'").unwrap(),
            vec!["-j8", "CFLAGS=-O2 -g"]
        );
        assert!(split_make_args("\"open").is_err());
    }
}
