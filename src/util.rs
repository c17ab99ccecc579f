// src/util.rs — Byte-bounded string helpers for model output and CLI previews

/// Longest prefix of `s` that fits in `max_bytes` without splitting a character.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let end = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max_bytes)
        .last()
        .unwrap_or(0);
    &s[..end]
}

/// First line of `s`, cut to `max_bytes` with a trailing ellipsis when shortened.
pub fn preview(s: &str, max_bytes: usize) -> String {
    let line = s.lines().next().unwrap_or("");
    let cut = truncate_str(line, max_bytes);
    if cut.len() < s.trim_end().len() {
        format!("{cut}…")
    } else {
        cut.to_string()
    }
}
