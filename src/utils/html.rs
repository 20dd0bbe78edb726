use ammonia;

/// Clean admin-authored quiz text using the ammonia library.
///
/// Whitelist-based: safe inline tags (like <b>, <code>) survive, while
/// <script>, <iframe> and event-handler attributes are stripped, together with
/// the body of any <script> element.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
