//! Post-processing of generated C++ text.
//!
//! Templates are written for readability, not for tidy output: empty blocks leave blank lines
//! behind and argument lists carry whatever spacing the call text had. [`normalize`] cleans both
//! up in one pass per rewrite.

mod config;

pub use config::FormatConfig;

/// Apply the rewrites enabled in `config`, blank lines first.
pub fn normalize(text: &str, config: &FormatConfig) -> String {
    let mut out = if config.collapse_blank_lines {
        collapse_blank_lines(text)
    } else {
        text.to_string()
    };
    if config.normalize_commas {
        out = normalize_commas(&out);
    }
    out
}

/// Replace every run of three or more `\n` with a single `\n`.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for c in text.chars() {
        if c == '\n' {
            run += 1;
            continue;
        }
        push_newlines(&mut out, run);
        run = 0;
        out.push(c);
    }
    push_newlines(&mut out, run);
    out
}

fn push_newlines(out: &mut String, run: usize) {
    let count = if run >= 3 { 1 } else { run };
    out.extend(std::iter::repeat_n('\n', count));
}

/// Rewrite `[ ]*,[ ]*` to `", "`.
pub fn normalize_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    // Spaces before `floor` belong to an earlier rewrite and are never trimmed.
    let mut floor = 0;
    while let Some(c) = chars.next() {
        if c != ',' {
            out.push(c);
            continue;
        }
        let kept = floor + out[floor..].trim_end_matches(' ').len();
        out.truncate(kept);
        out.push_str(", ");
        floor = out.len();
        while chars.next_if_eq(&' ').is_some() {}
    }
    out
}
