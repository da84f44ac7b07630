//! Interactive form: fills a [`SubmissionForm`] by prompting line by line.

use std::io::{BufRead, Write};

use anyhow::Context;
use feedback_core::form::{DEFAULT_SCORE, DEFAULT_SOURCE};
use feedback_core::{AttributeRow, SubmissionForm};

/// Read one line without its terminator. `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> anyhow::Result<Option<String>> {
    let mut line = String::new();
    let n = input.read_line(&mut line).context("reading from stdin")?;
    if n == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

/// Parse the score answer: empty means the default, `-` means no score.
fn parse_score(answer: &str) -> Result<Option<u8>, String> {
    match answer.trim() {
        "" => Ok(Some(DEFAULT_SCORE)),
        "-" => Ok(None),
        s => match s.parse::<u8>() {
            Ok(n) if (1..=5).contains(&n) => Ok(Some(n)),
            _ => Err(format!("{s:?} is not a score between 1 and 5")),
        },
    }
}

/// Prompt for every field. Input ends early at EOF; whatever was read is kept.
pub fn fill_form<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<SubmissionForm> {
    let mut form = SubmissionForm::new();

    writeln!(output, "Message * (finish with an empty line):")?;
    let mut lines = Vec::new();
    while let Some(line) = read_line(input)? {
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }
    form.set_message(lines.join("\n"));

    loop {
        write!(output, "Score 1-5 [{DEFAULT_SCORE}, '-' for none]: ")?;
        output.flush()?;
        let Some(answer) = read_line(input)? else {
            form.set_score(Some(DEFAULT_SCORE));
            break;
        };
        match parse_score(&answer) {
            Ok(score) => {
                form.set_score(score);
                break;
            }
            Err(msg) => writeln!(output, "{msg}")?,
        }
    }

    write!(output, "Data source (optional) [{DEFAULT_SOURCE}]: ")?;
    output.flush()?;
    if let Some(source) = read_line(input)? {
        form.set_source(source);
    }

    writeln!(output, "Extra attributes as key=value (finish with an empty line):")?;
    while let Some(line) = read_line(input)? {
        if line.trim().is_empty() {
            break;
        }
        match AttributeRow::parse(&line) {
            Ok(row) => form.push_row(row),
            Err(e) => writeln!(output, "{e}")?,
        }
    }

    Ok(form)
}
