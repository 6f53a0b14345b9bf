//! Media launcher
//!
//! Opening a track is fire-and-forget: a launcher tries its links in order
//! and reports nothing back beyond logging.

use url::form_urlencoded::byte_serialize;

/// Spotify search deep-link prefix
pub const SPOTIFY_URI_PREFIX: &str = "spotify:search:";

/// Spotify web search prefix
pub const SPOTIFY_WEB_PREFIX: &str = "https://open.spotify.com/search/";

/// Opens a track in an external player
pub trait MediaLauncher: Send + Sync {
    /// Open `track` by `artist`; failures are the launcher's concern
    fn open(&self, artist: &str, track: &str);
}

/// Links for one track search, in the order a launcher should try them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyLinks {
    /// Combined `artist track` search text
    pub query: String,
    /// App deep link
    pub app_uri: String,
    /// Web fallback
    pub web_url: String,
}

impl SpotifyLinks {
    /// Build the links for `track` by `artist`
    #[must_use]
    pub fn for_track(artist: &str, track: &str) -> Self {
        let query = [artist.trim(), track.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let encoded: String = byte_serialize(query.as_bytes()).collect();

        Self {
            app_uri: format!("{SPOTIFY_URI_PREFIX}{query}"),
            web_url: format!("{SPOTIFY_WEB_PREFIX}{}", encoded.replace('+', "%20")),
            query,
        }
    }

    /// Links in fallback order
    #[must_use]
    pub fn chain(&self) -> [&str; 2] {
        [&self.app_uri, &self.web_url]
    }
}

/// Launcher that only logs the links it would open
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLauncher;

impl MediaLauncher for LoggingLauncher {
    fn open(&self, artist: &str, track: &str) {
        let links = SpotifyLinks::for_track(artist, track);
        tracing::info!(
            artist,
            track,
            app_uri = %links.app_uri,
            web_url = %links.web_url,
            "opening track"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_chain() {
        let links = SpotifyLinks::for_track("AC/DC", " Back in Black ");

        assert_eq!(links.query, "AC/DC Back in Black");
        assert_eq!(links.app_uri, "spotify:search:AC/DC Back in Black");
        assert_eq!(
            links.web_url,
            "https://open.spotify.com/search/AC%2FDC%20Back%20in%20Black"
        );
        assert_eq!(links.chain()[0], links.app_uri);
    }

    #[test]
    fn encodes_non_ascii() {
        let links = SpotifyLinks::for_track("Måneskin", "");
        assert_eq!(links.query, "Måneskin");
        assert_eq!(links.web_url, "https://open.spotify.com/search/M%C3%A5neskin");
    }
}
