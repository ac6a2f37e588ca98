//! Comment stripping for JSON configuration files.
//!
//! Project configuration files conventionally allow `// line` and
//! `/* block */` comments, which strict JSON parsers reject. Comments are
//! removed textually before parsing. The scan tracks string literals, so a
//! comment-like sequence inside a string (`"https://example.com"`) is kept.

/// Removes `//` and `/* */` comments outside string literals.
///
/// Line comments are removed up to, not including, the newline. An
/// unterminated block comment swallows the rest of the input, which then
/// fails JSON parsing if anything required was lost.
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                while chars.peek().is_some_and(|&next| next != '\n') {
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_comments_unchanged() {
        let json = r#"{"a": [1, 2], "b": "c"}"#;
        assert_eq!(strip_comments(json), json);
    }

    #[test]
    fn line_comments_removed() {
        let json = "{\n  // the target\n  \"target\": \"ES6\" // trailing\n}";
        assert_eq!(strip_comments(json), "{\n  \n  \"target\": \"ES6\" \n}");
    }

    #[test]
    fn block_comments_removed() {
        let json = "{/* a */\"a\": /* multi\nline ** comment */ true}";
        assert_eq!(strip_comments(json), "{\"a\":  true}");
    }

    #[test]
    fn comment_markers_inside_strings_kept() {
        let json = r#"{"baseUrl": "https://example.com/*path*/", "x": "//y"}"#;
        assert_eq!(strip_comments(json), json);
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        let json = r#"{"a": "say \"//hi\"" // gone
}"#;
        assert_eq!(strip_comments(json), "{\"a\": \"say \\\"//hi\\\"\" \n}");
    }

    #[test]
    fn unterminated_block_comment_swallows_rest() {
        assert_eq!(strip_comments("{} /* never closed"), "{} ");
    }

    #[test]
    fn line_comment_at_end_of_input() {
        assert_eq!(strip_comments("{}//"), "{}");
    }

    #[test]
    fn stripped_output_parses() {
        let json = r#"{
            // Output options
            "compilerOptions": {
                "strict": true, /* always */
                "outDir": "dist"
            }
        }"#;
        let value: serde_json::Value = serde_json::from_str(&strip_comments(json)).unwrap();
        assert_eq!(value["compilerOptions"]["outDir"], "dist");
    }
}
