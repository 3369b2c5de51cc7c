use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::Context;
use log::debug;

use crate::record::Record;

/// Placeholder tokens in the order they are tried, each with the record
/// field it substitutes. No token maps to `id`; it only names the output.
const TOKENS: [&str; 4] = ["%%2%%", "%%3%%", "%%4%%", "%%5%%"];

/// The outcome of substituting one record into the template.
#[derive(Debug, PartialEq, Eq)]
pub struct Rendered {
    /// Substituted lines, each with its trailing newline.
    pub lines: Vec<String>,
    /// False when a template line kept an unrecognized or unfilled
    /// `%%` marker. The offending line is the last one in `lines`.
    pub all_resolved: bool,
}

/// Reads the template and substitutes the record's fields into it.
///
/// The template is opened fresh on every call; a record whose template
/// cannot be read is a fatal error, not a per-record diagnostic. Consuming
/// stops at the first line left with an unresolved marker.
pub fn render(template_path: &Path, record: &Record) -> anyhow::Result<Rendered> {
    debug!("Rendering {template_path:?} for record id {:?}", record.id);
    let file = File::open(template_path)
        .with_context(|| format!("Error al leer el archivo de la plantilla {template_path:?}"))?;

    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line
            .with_context(|| format!("Error al leer el archivo de la plantilla {template_path:?}"))?;
        let (substituted, resolved) = substitute(&line, record);
        lines.push(substituted + "\n");
        if !resolved {
            debug!("Unresolved marker in template line, stopping render");
            return Ok(Rendered {
                lines,
                all_resolved: false,
            });
        }
    }

    Ok(Rendered {
        lines,
        all_resolved: true,
    })
}

/// Replaces every recognized token in `line` with the matching field.
///
/// Single pass, left to right: inserted field values are never
/// re-scanned, so a value containing a literal `%%` sequence is emitted
/// verbatim and does not count as unresolved. Only `%%` markers in the
/// template text itself that form no recognized token flip the flag.
fn substitute(line: &str, record: &Record) -> (String, bool) {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    let mut resolved = true;

    while let Some(pos) = rest.find("%%") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match recognized_token(tail, record) {
            Some((token, value)) => {
                out.push_str(value);
                rest = &tail[token.len()..];
            }
            None => {
                resolved = false;
                out.push_str("%%");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);

    (out, resolved)
}

fn recognized_token<'a>(tail: &str, record: &'a Record) -> Option<(&'static str, &'a str)> {
    let values = [
        &record.ciudad,
        &record.email,
        &record.empresa,
        &record.empleado,
    ];
    TOKENS
        .iter()
        .zip(values)
        .find(|(token, _)| tail.starts_with(*token))
        .map(|(token, value)| (*token, value.as_str()))
}
