/// Default name of the compiled document: `{prefix}_{date}.{extension}`.
///
/// Spaces in the date become underscores and characters that are unsafe in
/// filenames become underscores too, so a date like `3/4/2024` cannot
/// escape into a subdirectory.
pub fn output_filename(prefix: &str, date: &str, extension: &str) -> String {
    let date = sanitize_component(&date.trim().replace(' ', "_"));
    let prefix = sanitize_component(prefix.trim());
    format!("{prefix}_{date}.{extension}")
}

fn sanitize_component(input: &str) -> String {
    input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect()
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
