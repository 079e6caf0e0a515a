/// Escape text for Telegram HTML parse mode.
///
/// Telegram HTML supports only a small tag subset; everything user-supplied
/// (e.g. first names interpolated into deletion notices) must be escaped.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
