// Video URL helpers - pulling the video id out of the links users paste

use once_cell::sync::Lazy;
use regex::Regex;

static URL_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?i:https?://)?(?P<host>[^/?#:]+)(?::\d+)?(?P<path>/[^?#]*)?(?:\?(?P<query>[^#]*))?",
    )
    .expect("static regex is valid")
});

static TOPIC_CHANNEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<artist>.+) - Topic$").expect("static regex is valid"));

const WATCH_HOSTS: [&str; 3] = ["www.youtube.com", "youtube.com", "music.youtube.com"];
const SHORT_HOST: &str = "youtu.be";

/// Extracts the video id from a watch URL (`?v=`) or a short `youtu.be/<id>` link.
pub fn extract_video_id(url: &str) -> Option<String> {
    let caps = URL_PARTS.captures(url.trim())?;
    let host = caps.name("host")?.as_str().to_ascii_lowercase();

    if WATCH_HOSTS.contains(&host.as_str()) {
        return caps
            .name("query")?
            .as_str()
            .split('&')
            .find_map(|pair| pair.strip_prefix("v="))
            .filter(|id| !id.is_empty())
            .map(str::to_string);
    }

    if host == SHORT_HOST {
        let id = caps.name("path")?.as_str().trim_start_matches('/');
        return (!id.is_empty()).then(|| id.to_string());
    }

    None
}

/// Auto-generated music channels are named "<Artist> - Topic".
pub fn normalize_artist(channel: &str) -> String {
    match TOPIC_CHANNEL.captures(channel) {
        Some(caps) => caps["artist"].to_string(),
        None => channel.to_string(),
    }
}
