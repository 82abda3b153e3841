/// Content type for a `.ext` extension, `application/octet-stream` when unknown.
pub fn mime_type_for_extension(ext: &str) -> String {
    mime_guess::from_ext(ext.trim_start_matches('.'))
        .first_or_octet_stream()
        .to_string()
}
