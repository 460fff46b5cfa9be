/// Shortens a file name for the file row.
///
/// Names longer than `max_chars` characters keep their first `max_chars`
/// characters followed by `extension`; shorter names are shown as-is.
pub fn display_label(name: &str, max_chars: usize, extension: &str) -> String {
    match name.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &name[..cut], extension),
        None => name.to_string(),
    }
}
