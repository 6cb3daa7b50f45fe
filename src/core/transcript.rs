// transcripts - turn a video reference into plain text

use crate::Error;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info};

const WATCH_URL: &str = "https://www.youtube.com/watch";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn fetch(&self, source: &str) -> Result<String, Error>;
}

/// Fetches captions straight from youtube's watch page.
pub struct YouTube {
    client: reqwest::Client,
    language: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    // "asr" for auto-generated tracks
    #[serde(default)]
    kind: Option<String>,
}

#[derive(Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedEvent>,
}

#[derive(Deserialize)]
struct TimedEvent {
    #[serde(default)]
    segs: Vec<Segment>,
}

#[derive(Deserialize)]
struct Segment {
    #[serde(default)]
    utf8: String,
}

impl YouTube {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            language: language.into(),
        }
    }

    async fn get(&self, url: &str) -> Result<String, Error> {
        let response = self
            .client
            .get(url)
            .header("user-agent", USER_AGENT)
            .header("accept-language", format!("{},en;q=0.8", self.language))
            .send()
            .await
            .map_err(|e| Error::Transcript(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Transcript(format!(
                "youtube returned {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Transcript(e.to_string()))
    }
}

#[async_trait]
impl TranscriptProvider for YouTube {
    async fn fetch(&self, source: &str) -> Result<String, Error> {
        let id = video_id(source)?;
        debug!(video = %id, "fetching watch page");

        let page = self.get(&format!("{WATCH_URL}?v={id}")).await?;
        let tracks = caption_tracks(&page)?;
        let track = pick_track(&tracks, &self.language)
            .ok_or_else(|| Error::Transcript("no captions available for this video".to_string()))?;

        debug!(video = %id, language = %track.language_code, "fetching captions");
        let url = json3_url(&track.base_url)?;
        let body = self.get(url.as_str()).await?;
        let transcript = format_json3(&body)?;

        info!(video = %id, chars = transcript.chars().count(), "transcript loaded");
        Ok(transcript)
    }
}

/// Pull the 11 character video id out of a url or a bare id.
pub fn video_id(source: &str) -> Result<String, Error> {
    let source = source.trim();
    if is_video_id(source) {
        return Ok(source.to_string());
    }

    let url = Url::parse(source)
        .or_else(|_| Url::parse(&format!("https://{source}")))
        .map_err(|_| Error::Transcript(format!("not a video url: '{source}'")))?;

    let host = url.host_str().unwrap_or_default();
    let host = host
        .trim_start_matches("www.")
        .trim_start_matches("m.")
        .trim_start_matches("music.");

    let mut segments = url.path_segments().into_iter().flatten();

    let id = match host {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "youtube-nocookie.com" => match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            Some("shorts" | "embed" | "live" | "v") => segments.next().map(str::to_string),
            _ => None,
        },
        _ => None,
    };

    id.filter(|id| is_video_id(id))
        .ok_or_else(|| Error::Transcript(format!("not a video url: '{source}'")))
}

fn is_video_id(s: &str) -> bool {
    s.len() == 11
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// the watch page embeds the caption list as json inside a script tag
fn caption_tracks(page: &str) -> Result<Vec<CaptionTrack>, Error> {
    const MARKER: &str = "\"captionTracks\":";

    let start = page
        .find(MARKER)
        .map(|i| i + MARKER.len())
        .ok_or_else(|| Error::Transcript("no captions available for this video".to_string()))?;

    let mut stream =
        serde_json::Deserializer::from_str(&page[start..]).into_iter::<Vec<CaptionTrack>>();

    match stream.next() {
        Some(Ok(tracks)) if !tracks.is_empty() => Ok(tracks),
        Some(Ok(_)) | None => Err(Error::Transcript(
            "no captions available for this video".to_string(),
        )),
        Some(Err(e)) => Err(Error::Transcript(format!("malformed caption list: {e}"))),
    }
}

// manual track in our language, then any track in our language, then whatever is first
fn pick_track<'a>(tracks: &'a [CaptionTrack], language: &str) -> Option<&'a CaptionTrack> {
    let matches_language = |t: &&CaptionTrack| {
        t.language_code == language || t.language_code.starts_with(&format!("{language}-"))
    };

    tracks
        .iter()
        .filter(matches_language)
        .find(|t| t.kind.as_deref() != Some("asr"))
        .or_else(|| tracks.iter().find(matches_language))
        .or_else(|| tracks.first())
}

fn json3_url(base_url: &str) -> Result<Url, Error> {
    let mut url = Url::parse(base_url)
        .map_err(|e| Error::Transcript(format!("bad caption url: {e}")))?;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "fmt")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "json3");

    Ok(url)
}

// one line per caption event, whitespace collapsed
fn format_json3(body: &str) -> Result<String, Error> {
    let timed: TimedText = serde_json::from_str(body)
        .map_err(|e| Error::Transcript(format!("malformed captions: {e}")))?;

    let lines: Vec<String> = timed
        .events
        .iter()
        .map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(Error::Transcript("captions are empty".to_string()));
    }

    Ok(lines.join("\n"))
}
