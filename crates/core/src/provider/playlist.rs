//! HLS-style playlist interpretation.
//!
//! A playlist body is a line-oriented text document: `#`-prefixed lines are
//! tags/comments, every other non-empty line is a URI. Relative URIs
//! resolve against the playlist's own URL.

use reqwest::Url;

use super::error::ProviderError;

/// Extracts the entry URIs of a playlist body, resolved to absolute URLs.
pub fn entry_urls(body: &str, playlist_url: &Url) -> Result<Vec<Url>, ProviderError> {
    let mut urls = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let url = playlist_url
            .join(line)
            .map_err(|e| ProviderError::Parse(format!("bad playlist entry {line:?}: {e}")))?;
        urls.push(url);
    }
    Ok(urls)
}

/// Whether a playlist entry points at another playlist (master playlist
/// indirection) rather than a media chunk.
pub fn is_playlist_ref(url: &Url) -> bool {
    url.path().ends_with(".m3u8")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://media.example.com/ts/LFR/20231003010000.m3u8").unwrap()
    }

    #[test]
    fn skips_tags_and_blank_lines() {
        let body = "#EXTM3U\n#EXT-X-TARGETDURATION:5\n\n#EXTINF:5.0,\nhttps://cdn.example.com/chunks/20231003_0001.aac\n#EXTINF:5.0,\nhttps://cdn.example.com/chunks/20231003_0002.aac\n";
        let urls = entry_urls(body, &base()).unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(
            urls[0].as_str(),
            "https://cdn.example.com/chunks/20231003_0001.aac"
        );
    }

    #[test]
    fn resolves_relative_entries_against_playlist_url() {
        let body = "#EXTM3U\nchunklist.m3u8\n";
        let urls = entry_urls(body, &base()).unwrap();
        assert_eq!(
            urls[0].as_str(),
            "https://media.example.com/ts/LFR/chunklist.m3u8"
        );
    }

    #[test]
    fn detects_playlist_references() {
        let urls = entry_urls("child.m3u8\nchunk_0001.aac\n", &base()).unwrap();
        assert!(is_playlist_ref(&urls[0]));
        assert!(!is_playlist_ref(&urls[1]));
    }

    #[test]
    fn empty_body_yields_no_entries() {
        assert!(entry_urls("#EXTM3U\n", &base()).unwrap().is_empty());
    }
}
