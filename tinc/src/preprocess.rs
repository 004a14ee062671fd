use crate::error::Error;

/// Blank out `//` and (nestable) `/* */` comments.
///
/// Every comment character becomes spaces of the same byte width and newlines
/// are kept, so offsets into the output are offsets into `source`.
pub fn preprocess(source: &str) -> Result<String, Error> {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.char_indices().peekable();
    let mut depth = 0usize;
    let mut opened = vec![];
    let mut line_comment = false;

    while let Some((idx, ch)) = chars.next() {
        let next = chars.peek().map(|(_, c)| *c);

        if ch == '\n' {
            line_comment = false;
            out.push('\n');
            continue;
        }
        if line_comment {
            blank(&mut out, ch);
            continue;
        }

        match (ch, next) {
            ('/', Some('/')) if depth == 0 => {
                line_comment = true;
                blank(&mut out, ch);
            }
            ('/', Some('*')) => {
                depth += 1;
                opened.push(idx);
                chars.next();
                out.push_str("  ");
            }
            ('*', Some('/')) => {
                if depth == 0 {
                    return Err(Error::Preprocess {
                        offset: idx,
                        message: "closed unopened multiline comment".to_string(),
                    });
                }
                depth -= 1;
                opened.pop();
                chars.next();
                out.push_str("  ");
            }
            _ if depth > 0 => blank(&mut out, ch),
            _ => out.push(ch),
        }
    }

    match opened.first() {
        Some(&offset) => Err(Error::Preprocess {
            offset,
            message: "unterminated multiline comment".to_string(),
        }),
        None => Ok(out),
    }
}

fn blank(out: &mut String, ch: char) {
    for _ in 0..ch.len_utf8() {
        out.push(' ');
    }
}
