//! RSS 2.0 feed generation from recorded artifacts.
//!
//! The output directory is the source of truth: every metadata sidecar
//! with a matching media file becomes one feed item. No corpus crate
//! covers RSS serialization, so the document is assembled directly.

use std::fmt::Write as _;
use std::path::Path;

use tracing::{debug, warn};

use super::config::FeedConfig;
use super::error::FeedError;
use crate::provider::ProgramMeta;

/// One feed entry: a recorded program and its media artifact.
#[derive(Debug)]
struct FeedItem {
    meta: ProgramMeta,
    media_filename: String,
    media_size_bytes: u64,
}

/// Scans `out_dir` and renders the podcast feed document.
///
/// Sidecars without a media file (failed or in-flight jobs) are skipped
/// with a warning rather than failing the whole feed.
pub async fn generate_feed(
    out_dir: &Path,
    base_url: &str,
    media_extension: &str,
    config: &FeedConfig,
) -> Result<String, FeedError> {
    let mut items = Vec::new();
    let mut entries = tokio::fs::read_dir(out_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let contents = tokio::fs::read(&path).await?;
        let meta: ProgramMeta = match serde_json::from_slice(&contents) {
            Ok(meta) => meta,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable sidecar");
                continue;
            }
        };

        let media_path = path.with_extension(media_extension);
        let media_size_bytes = match tokio::fs::metadata(&media_path).await {
            Ok(m) => m.len(),
            Err(_) => {
                warn!(path = %path.display(), "sidecar has no media file, skipping");
                continue;
            }
        };
        let Some(media_filename) = media_path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        items.push(FeedItem {
            meta,
            media_filename: media_filename.to_string(),
            media_size_bytes,
        });
    }

    // Newest broadcast first.
    items.sort_by(|a, b| b.meta.start_time.cmp(&a.meta.start_time));
    debug!(items = items.len(), "generated feed");

    Ok(render_rss(&items, base_url, media_extension, config))
}

fn render_rss(
    items: &[FeedItem],
    base_url: &str,
    media_extension: &str,
    config: &FeedConfig,
) -> String {
    let base = base_url.trim_end_matches('/');
    let mime = media_mime(media_extension);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(
        "<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\" xmlns:itunes=\"http://www.itunes.com/dtds/podcast-1.0.dtd\">\n",
    );
    out.push_str("  <channel>\n");
    let _ = writeln!(out, "    <title>{}</title>", escape_xml(&config.title));
    let _ = writeln!(
        out,
        "    <description>{}</description>",
        escape_xml(&config.description)
    );
    let _ = writeln!(out, "    <language>{}</language>", escape_xml(&config.language));
    let _ = writeln!(
        out,
        "    <itunes:author>{}</itunes:author>",
        escape_xml(&config.author)
    );
    out.push_str("    <generator>airshift</generator>\n");

    for item in items {
        let meta = &item.meta;
        let duration = meta.end_time.signed_duration_since(meta.start_time);
        let enclosure_url = format!(
            "{base}/assets/{}",
            urlencoding::encode(&item.media_filename)
        );
        out.push_str("    <item>\n");
        let _ = writeln!(out, "      <title>{}</title>", escape_xml(&meta.title));
        let _ = writeln!(
            out,
            "      <description>{}</description>",
            escape_xml(&meta.info)
        );
        let _ = writeln!(
            out,
            "      <pubDate>{}</pubDate>",
            meta.start_time.to_rfc2822()
        );
        if !meta.url.is_empty() {
            let _ = writeln!(out, "      <link>{}</link>", escape_xml(&meta.url));
        }
        if !meta.performer.is_empty() {
            let _ = writeln!(
                out,
                "      <itunes:author>{}</itunes:author>",
                escape_xml(&meta.performer)
            );
        }
        let _ = writeln!(
            out,
            "      <itunes:duration>{}</itunes:duration>",
            format_duration(duration)
        );
        let _ = writeln!(
            out,
            "      <enclosure url=\"{}\" length=\"{}\" type=\"{}\"/>",
            escape_xml(&enclosure_url),
            item.media_size_bytes,
            mime
        );
        let _ = writeln!(
            out,
            "      <guid isPermaLink=\"false\">{}</guid>",
            escape_xml(&item.media_filename)
        );
        out.push_str("    </item>\n");
    }

    out.push_str("  </channel>\n");
    out.push_str("</rss>\n");
    out
}

/// MIME type for a media artifact extension.
pub fn media_mime(extension: &str) -> &'static str {
    match extension {
        "aac" => "audio/aac",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        _ => "application/octet-stream",
    }
}

fn format_duration(duration: chrono::Duration) -> String {
    let total_secs = duration.num_seconds().max(0);
    format!(
        "{}:{:02}:{:02}",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60
    )
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
