/// Lowercases `input` and collapses every run of non-alphanumeric
/// characters into a single `-`. Used to derive customer slugs.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut gap = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    slug
}

/// Strips `input` down to characters safe for a filename in a
/// `Content-Disposition` header. Alphanumerics, `-`, `_` and `.` pass
/// through; everything else becomes `_`.
pub fn sanitize_filename(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.';
        out.push(if ok { ch } else { '_' });
    }
    if out.chars().all(|ch| ch == '_') {
        "document".to_owned()
    } else {
        out
    }
}
