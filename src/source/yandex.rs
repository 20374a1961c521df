//! Yandex Music client, only the calls needed to read liked tracks.

use std::time::Duration;

use serde_json::Value;

use crate::source::{ResolvedTrack, SourceCatalog, TrackRef, error::SourceError};

const API_BASE: &str = "https://api.music.yandex.net";

pub struct YandexMusic {
    http_client: ureq::Agent,
    token: String,
}

impl YandexMusic {
    pub fn new(token: &str) -> Self {
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(30))
            .timeout_write(Duration::from_secs(30))
            .build();
        Self {
            http_client,
            token: token.trim().to_string(),
        }
    }

    fn get_result(&self, path: &str) -> Result<Value, SourceError> {
        let url = format!("{API_BASE}{path}");
        log::debug!("GET {url}");
        let response: Value = self
            .http_client
            .get(&url)
            .set("Authorization", &format!("OAuth {}", self.token))
            .call()?
            .into_json()?;
        response
            .get("result")
            .cloned()
            .ok_or_else(|| SourceError::Malformed(format!("{path}: no `result` field")))
    }

    /// uid of the account owning the token
    pub fn account_uid(&self) -> Result<String, SourceError> {
        let status = self.get_result("/account/status")?;
        status
            .get("account")
            .and_then(|account| account.get("uid"))
            .and_then(id_string)
            .ok_or_else(|| SourceError::Malformed("account status without uid".into()))
    }
}

impl SourceCatalog for YandexMusic {
    fn liked_tracks(&self) -> Result<Vec<TrackRef>, SourceError> {
        let uid = self.account_uid()?;
        let likes = self.get_result(&format!("/users/{uid}/likes/tracks"))?;
        parse_likes(&likes)
    }

    fn resolve(&self, track: &TrackRef) -> Result<ResolvedTrack, SourceError> {
        let tracks = self.get_result(&format!("/tracks/{}", track.qualified_id()))?;
        let first = tracks
            .as_array()
            .and_then(|tracks| tracks.first())
            .ok_or_else(|| SourceError::Malformed(format!("track {} not returned", track.id)))?;
        parse_track(first, &track.id)
    }
}

/// ids come either as strings or as numbers
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_likes(likes: &Value) -> Result<Vec<TrackRef>, SourceError> {
    let tracks = likes
        .get("library")
        .and_then(|library| library.get("tracks"))
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::Malformed("likes without track list".into()))?;

    tracks
        .iter()
        .map(|entry| {
            let id = entry
                .get("id")
                .and_then(id_string)
                .ok_or_else(|| SourceError::Malformed(format!("liked entry without id: {entry}")))?;
            Ok(TrackRef {
                id,
                album_id: entry.get("albumId").and_then(id_string),
            })
        })
        .collect()
}

fn parse_track(track: &Value, track_id: &str) -> Result<ResolvedTrack, SourceError> {
    let title = track
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| SourceError::Malformed(format!("track {track_id} without title")))?
        .to_string();

    let mut artists = Vec::new();
    for artist in track
        .get("artists")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        if artist.get("id").and_then(id_string).is_none() {
            return Err(SourceError::MissingArtistId {
                track_id: track_id.to_string(),
            });
        }
        if let Some(name) = artist.get("name").and_then(Value::as_str) {
            artists.push(name.to_string());
        }
    }

    Ok(ResolvedTrack { title, artists })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_likes_mixed_id_types() -> anyhow::Result<()> {
        let likes = json!({
            "library": {
                "uid": 42,
                "revision": 7,
                "tracks": [
                    {"id": "1001", "albumId": "55", "timestamp": "2024-01-01T00:00:00+00:00"},
                    {"id": 1002, "albumId": 56},
                    {"id": "1003"}
                ]
            }
        });

        let refs = parse_likes(&likes)?;

        assert_eq!(
            refs,
            vec![
                TrackRef {
                    id: "1001".into(),
                    album_id: Some("55".into())
                },
                TrackRef {
                    id: "1002".into(),
                    album_id: Some("56".into())
                },
                TrackRef {
                    id: "1003".into(),
                    album_id: None
                },
            ]
        );
        assert_eq!(refs[0].qualified_id(), "1001:55");
        assert_eq!(refs[2].qualified_id(), "1003");
        Ok(())
    }

    #[test]
    fn test_parse_likes_without_library() {
        let err = parse_likes(&json!({})).unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[test]
    fn test_parse_track() -> anyhow::Result<()> {
        let track = json!({
            "id": "1001",
            "title": "Звезда по имени Солнце",
            "artists": [{"id": 3, "name": "Кино"}, {"id": "4", "name": "Виктор Цой"}]
        });

        let resolved = parse_track(&track, "1001")?;

        assert_eq!(resolved.title, "Звезда по имени Солнце");
        assert_eq!(resolved.artists, vec!["Кино", "Виктор Цой"]);
        Ok(())
    }

    #[test]
    fn test_parse_track_artist_without_id() {
        let track = json!({
            "id": "1001",
            "title": "Song",
            "artists": [{"id": 3, "name": "A"}, {"name": "B", "various": false}]
        });

        let err = parse_track(&track, "1001").unwrap_err();

        assert!(matches!(
            err,
            SourceError::MissingArtistId { track_id } if track_id == "1001"
        ));
    }

    #[test]
    fn test_parse_track_without_artists() -> anyhow::Result<()> {
        let resolved = parse_track(&json!({"id": "9", "title": "Podcast"}), "9")?;
        assert!(resolved.artists.is_empty());
        Ok(())
    }
}
