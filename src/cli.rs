use std::io::{self, BufRead, Write};

use crate::state::dictionary::SharedDictionary;

const MENU_PROMPT: &str = "Enter ADD, DEF, REMOVE, LIST, EXIT: ";
const WORD_PROMPT: &str = "Enter the word: ";
const DEFINITION_PROMPT: &str = "Enter the definition: ";

/// Interactive dictionary loop.
///
/// Reads commands from `input` until `EXIT` or end of input. Unknown
/// commands are ignored and the menu is shown again.
pub fn run<R: BufRead, W: Write>(
    dict: &SharedDictionary,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    loop {
        let Some(command) = prompt(&mut input, &mut output, MENU_PROMPT)? else {
            break;
        };

        match command.as_str() {
            "ADD" => action_add(dict, &mut input, &mut output)?,
            "DEF" => action_define(dict, &mut input, &mut output)?,
            "REMOVE" => action_remove(dict, &mut input, &mut output)?,
            "LIST" => action_list(dict, &mut output)?,
            "EXIT" => break,
            _ => {}
        }
    }

    tracing::debug!("CLI loop finished ({} words in dictionary)", dict.len());
    Ok(())
}

/// Print `message`, then read one trimmed line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<Option<String>> {
    write!(output, "{message}")?;
    output.flush()?;

    // Bytes that are not UTF-8 are replaced, not rejected.
    let mut line = Vec::new();
    if input.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
}

fn action_add<R: BufRead, W: Write>(
    dict: &SharedDictionary,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let word = prompt(input, output, WORD_PROMPT)?.unwrap_or_default();
    let definition = prompt(input, output, DEFINITION_PROMPT)?.unwrap_or_default();

    dict.add(word, definition);
    Ok(())
}

fn action_define<R: BufRead, W: Write>(
    dict: &SharedDictionary,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let word = prompt(input, output, WORD_PROMPT)?.unwrap_or_default();

    match dict.get(&word) {
        Ok(entry) => writeln!(output, "  Definition: {entry}"),
        Err(e) => writeln!(output, "  Definition: {e}"),
    }
}

fn action_remove<R: BufRead, W: Write>(
    dict: &SharedDictionary,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let word = prompt(input, output, WORD_PROMPT)?.unwrap_or_default();

    dict.remove(&word);
    Ok(())
}

fn action_list<W: Write>(dict: &SharedDictionary, output: &mut W) -> io::Result<()> {
    let (words, entries) = dict.list();

    writeln!(output, "Words in the dictionary:")?;

    for word in &words {
        writeln!(output, "- Word: {word}")?;
        if let Some(entry) = entries.get(word) {
            writeln!(output, "- Definition: {entry}")?;
        }
    }
    Ok(())
}
