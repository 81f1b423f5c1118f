//! Line-by-line question loop for non-interactive terminals and pipes.
use crate::manifest::{AnswerValue, Answers, ManifestEntry, ManifestGroups};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

pub(super) fn run<R, W>(
    title: &str,
    mut groups: ManifestGroups,
    input: &mut R,
    out: &mut W,
) -> Result<Option<Answers>>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "{title}").context("write prompt")?;
    for group in groups.groups_mut() {
        writeln!(out).context("write prompt")?;
        writeln!(out, "{}", group.prompt).context("write prompt")?;
        for entry in &mut group.entries {
            let Some(value) = ask(entry, input, out)? else {
                return Ok(None);
            };
            entry.value = value;
        }
    }

    writeln!(out).context("write prompt")?;
    let confirmed = match read_reply(input, out, "Generate manifest? [y/N]: ")? {
        Some(reply) => matches!(reply.to_ascii_lowercase().as_str(), "y" | "yes"),
        None => false,
    };
    if !confirmed {
        return Ok(None);
    }
    Ok(Some(groups.answers()))
}

/// Ask until the reply parses. Outer `None` means end of input.
fn ask<R: BufRead, W: Write>(
    entry: &ManifestEntry,
    input: &mut R,
    out: &mut W,
) -> Result<Option<Option<AnswerValue>>> {
    if !entry.is_bool() && !entry.is_natural() {
        writeln!(out, "  {} (unsupported value type, skipped)", entry.name)
            .context("write prompt")?;
        return Ok(Some(None));
    }
    let hint = if entry.is_bool() { "y/n/s" } else { "number/s" };
    let question = format!("  {} [{hint}]: ", entry.name);
    loop {
        let Some(reply) = read_reply(input, out, &question)? else {
            return Ok(None);
        };
        match parse_reply(entry, &reply) {
            Some(value) => return Ok(Some(value)),
            None => writeln!(out, "  please answer {hint}").context("write prompt")?,
        }
    }
}

/// `Some(None)` is an explicit skip; `None` is an unparseable reply.
fn parse_reply(entry: &ManifestEntry, reply: &str) -> Option<Option<AnswerValue>> {
    let reply = reply.to_ascii_lowercase();
    if matches!(reply.as_str(), "" | "s" | "skip") {
        return Some(None);
    }
    if entry.is_bool() {
        return match reply.as_str() {
            "y" | "yes" => Some(Some(AnswerValue::Bool(true))),
            "n" | "no" => Some(Some(AnswerValue::Bool(false))),
            _ => None,
        };
    }
    reply.parse::<u64>().ok().map(|n| Some(AnswerValue::Natural(n)))
}

fn read_reply<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
) -> Result<Option<String>> {
    write!(out, "{question}").context("write prompt")?;
    out.flush().context("flush prompt")?;
    let mut line = String::new();
    let read = input.read_line(&mut line).context("read answer")?;
    if read == 0 {
        writeln!(out).context("write prompt")?;
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ValueType;
    use crate::manifest::{DEFAULT_BOOL_PROMPT, DEFAULT_NATURAL_PROMPT};
    use serde_json::json;
    use std::io::Cursor;

    fn entry(id: &str, value_type: ValueType) -> ManifestEntry {
        ManifestEntry {
            id: id.to_string(),
            partial_id: id.to_string(),
            name: format!("{id} name"),
            value_type: Some(value_type),
            value: None,
        }
    }

    fn groups() -> ManifestGroups {
        let mut groups = ManifestGroups::default();
        groups.push(DEFAULT_BOOL_PROMPT.to_string(), entry("camera", ValueType::Bool));
        groups.push(DEFAULT_BOOL_PROMPT.to_string(), entry("hdmi", ValueType::Bool));
        groups.push(DEFAULT_NATURAL_PROMPT.to_string(), entry("ports", ValueType::Natural));
        groups
    }

    fn session(script: &str) -> (Option<Answers>, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let answers = run("System Manifest:", groups(), &mut input, &mut out).unwrap();
        (answers, String::from_utf8(out).unwrap())
    }

    #[test]
    fn collects_answers_after_confirmation() {
        let (answers, transcript) = session("yes\ns\n3\ny\n");
        assert_eq!(
            serde_json::to_value(answers.unwrap()).unwrap(),
            json!({"camera": true, "hdmi": null, "ports": 3})
        );
        assert!(transcript.starts_with("System Manifest:\n"));
        assert!(transcript.contains(DEFAULT_BOOL_PROMPT));
        assert!(transcript.contains("  camera name [y/n/s]: "));
        assert!(transcript.contains("  ports name [number/s]: "));
    }

    #[test]
    fn invalid_replies_are_asked_again() {
        let (answers, transcript) = session("maybe\nN\n\nlots\n2\nyes\n");
        assert_eq!(
            serde_json::to_value(answers.unwrap()).unwrap(),
            json!({"camera": false, "hdmi": null, "ports": 2})
        );
        assert!(transcript.contains("please answer y/n/s"));
        assert!(transcript.contains("please answer number/s"));
    }

    #[test]
    fn declining_confirmation_aborts() {
        let (answers, _) = session("y\ny\n1\nn\n");
        assert!(answers.is_none());
        let (answers, _) = session("y\ny\n1\n\n");
        assert!(answers.is_none());
    }

    #[test]
    fn end_of_input_aborts() {
        let (answers, _) = session("y\n");
        assert!(answers.is_none());
        let (answers, _) = session("y\ny\n1\n");
        assert!(answers.is_none());
    }

    #[test]
    fn unsupported_types_are_skipped_without_asking() {
        let mut groups = ManifestGroups::default();
        groups.push(
            "Describe the panel".to_string(),
            entry("panel", ValueType::Other("string".to_string())),
        );
        let mut input = Cursor::new(b"y\n".to_vec());
        let mut out = Vec::new();
        let answers = run("t", groups, &mut input, &mut out).unwrap().unwrap();
        assert_eq!(answers["panel"], serde_json::Value::Null);
    }
}
