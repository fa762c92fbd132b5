//! Text shortening for the small display.

/// Shorten `name` to roughly `length` characters, keeping a third at each
/// end around `"..."`.
pub fn ellipsis_len(name: &str, length: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= length {
        return name.to_string();
    }
    let keep = length / 3;
    let head: String = chars[..keep].iter().collect();
    let tail: String = chars[chars.len() - keep..].iter().collect();
    format!("{head}...{tail}")
}

/// Shorten names longer than 32 characters to 12 + `"..."` + 17.
pub fn ellipsis(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= 32 {
        return name.to_string();
    }
    let head: String = chars[..12].iter().collect();
    let tail: String = chars[chars.len() - 17..].iter().collect();
    format!("{head}...{tail}")
}

/// Strip a `.gco*` suffix and cut names longer than 35 characters to 32 +
/// `"..."`.
pub fn filename_ellipsis(name: &str) -> String {
    let stem = match name.rfind(".gco") {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    };
    if stem.chars().count() > 35 {
        let head: String = stem.chars().take(32).collect();
        return format!("{head}...");
    }
    stem.to_string()
}
