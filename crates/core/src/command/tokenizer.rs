//! Splitting free-text argument blocks into tokens, and escaping tokens for
//! embedding into shell wrappers.

/// Splits a raw argument block into tokens.
///
/// With `multiline` set, all line breaks collapse to single spaces first and
/// the result is split as one logical line. Otherwise each line is trimmed
/// and split independently, blank lines are dropped, and tokens concatenate
/// in line order. A double-quoted span counts as one token with its quotes
/// retained.
pub fn tokenize(raw: &str, multiline: bool) -> Vec<String> {
    if multiline {
        let collapsed: String = raw
            .replace("\r\n", " ")
            .replace(['\r', '\n'], " ");
        split_quoted(&collapsed)
    } else {
        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .flat_map(split_quoted)
            .collect()
    }
}

/// Whitespace split honoring double-quote-delimited spans. Quotes stay in
/// the token literal.
fn split_quoted(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Escapes one token for a cmd.exe batch line: `%` doubled so variable
/// expansion stays inert, tokens with whitespace or a cmd metacharacter
/// (`& | ^ < > ( )`) wrapped in double quotes, inside which cmd treats
/// them literally.
pub fn escape_cmd(token: &str) -> String {
    let escaped = token.replace('%', "%%");
    let needs_quoting = escaped
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '&' | '|' | '^' | '<' | '>' | '(' | ')'));
    if needs_quoting && !escaped.starts_with('"') {
        format!("\"{escaped}\"")
    } else {
        escaped
    }
}

/// Escapes one token for a POSIX shell line using single quotes, splicing
/// embedded single quotes as `'\''`.
pub fn escape_sh(token: &str) -> String {
    let plain = token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '=' | ':'));
    if plain && !token.is_empty() {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_token_round_trips() {
        assert_eq!(tokenize("  -NoLogo  ", false), vec!["-NoLogo"]);
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(tokenize("", false).is_empty());
        assert!(tokenize("  \n   \n", false).is_empty());
        assert!(tokenize("", true).is_empty());
    }

    #[test]
    fn multiline_mode_collapses_line_breaks() {
        let tokens = tokenize("arg1\n\"a b\"\narg3", true);
        assert_eq!(tokens, vec!["arg1", "\"a b\"", "arg3"]);
    }

    #[test]
    fn line_mode_splits_each_line_independently() {
        let tokens = tokenize("-Tag smoke\n\n  -Output \"C:\\out dir\"  \n", false);
        assert_eq!(tokens, vec!["-Tag", "smoke", "-Output", "\"C:\\out dir\""]);
    }

    #[test]
    fn quoted_span_survives_as_one_token() {
        assert_eq!(
            tokenize("\"hello  world\" rest", false),
            vec!["\"hello  world\"", "rest"]
        );
    }

    #[test]
    fn cmd_escaping_doubles_percent_and_quotes_spaces() {
        assert_eq!(escape_cmd("100%"), "100%%");
        assert_eq!(escape_cmd("a b"), "\"a b\"");
        assert_eq!(escape_cmd("-NonInteractive"), "-NonInteractive");
    }

    #[test]
    fn cmd_escaping_quotes_metacharacters() {
        // Bare `&` would split the batch line into two commands.
        assert_eq!(escape_cmd("a&b"), "\"a&b\"");
        assert_eq!(escape_cmd("out|err"), "\"out|err\"");
        assert_eq!(escape_cmd("^caret"), "\"^caret\"");
        assert_eq!(escape_cmd("(group)"), "\"(group)\"");
        assert_eq!(escape_cmd("2>nul"), "\"2>nul\"");
    }

    #[test]
    fn sh_escaping_wraps_specials_in_single_quotes() {
        assert_eq!(escape_sh("plain-token.ps1"), "plain-token.ps1");
        assert_eq!(escape_sh("a b"), "'a b'");
        assert_eq!(escape_sh("it's"), r"'it'\''s'");
    }
}
