//! YouTube Music client over its internal JSON API.

use serde_json::{Value, json};

use crate::{
    destination::{
        DestinationCatalog, SearchFilter, auth::TokenStore, error::DestinationError,
        session::Session,
    },
    domain::candidate::{SearchCandidate, TOP_RESULT},
};

const API_BASE: &str = "https://music.youtube.com/youtubei/v1";
const ORIGIN: &str = "https://music.youtube.com";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:88.0) Gecko/20100101 Firefox/88.0";

impl SearchFilter {
    /// encoded search params selecting a single result category
    fn params(self) -> &'static str {
        match self {
            SearchFilter::Songs => "EgWKAQIIAWoMEA4QChADEAQQCRAF",
        }
    }
}

pub struct YtMusic {
    session: Session,
    tokens: TokenStore,
}

impl YtMusic {
    pub fn new(session: Session, tokens: TokenStore) -> Self {
        Self { session, tokens }
    }

    fn context() -> Value {
        let client_version = format!("1.{}.01.00", chrono::Utc::now().format("%Y%m%d"));
        json!({
            "client": {
                "clientName": "WEB_REMIX",
                "clientVersion": client_version,
                "hl": "en",
            },
            "user": {},
        })
    }

    fn post(&self, endpoint: &str, mut body: Value) -> Result<Value, DestinationError> {
        body["context"] = Self::context();
        let authorization = self.tokens.authorization(&self.session.agent)?;
        let request_time = chrono::Utc::now().timestamp().to_string();

        log::debug!("POST {endpoint}");
        let response = self
            .session
            .agent
            .post(&format!("{API_BASE}/{endpoint}"))
            .query("alt", "json")
            .set("User-Agent", USER_AGENT)
            .set("Accept", "*/*")
            .set("Content-Type", "application/json")
            .set("Origin", ORIGIN)
            .set("X-Origin", ORIGIN)
            .set("X-Goog-AuthUser", "0")
            .set("X-Goog-Request-Time", &request_time)
            .set("Authorization", &authorization)
            .send_json(body)?;
        Ok(response.into_json()?)
    }
}

impl DestinationCatalog for YtMusic {
    fn search(
        &self,
        query: &str,
        filter: SearchFilter,
    ) -> Result<Vec<SearchCandidate>, DestinationError> {
        let response = self.post(
            "search",
            json!({
                "query": query,
                "params": filter.params(),
            }),
        )?;
        parse_search(&response)
    }

    fn like(&self, video_id: &str) -> Result<(), DestinationError> {
        self.post(
            "like/like",
            json!({
                "target": {"videoId": video_id},
            }),
        )?;
        Ok(())
    }
}

/// walks `path` through nested objects and arrays
fn nav<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| match key.parse::<usize>() {
        Ok(index) => current.get(index),
        Err(_) => current.get(*key),
    })
}

fn nav_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    nav(value, path).and_then(Value::as_str)
}

fn parse_search(response: &Value) -> Result<Vec<SearchCandidate>, DestinationError> {
    let contents = response
        .get("contents")
        .ok_or_else(|| DestinationError::Malformed("search response without contents".into()))?;

    let sections = match contents.get("tabbedSearchResultsRenderer") {
        Some(tabs) => nav(
            tabs,
            &["tabs", "0", "tabRenderer", "content", "sectionListRenderer", "contents"],
        ),
        None => nav(contents, &["sectionListRenderer", "contents"]),
    };
    // no sections at all means nothing matched
    let Some(sections) = sections.and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut candidates = Vec::new();
    for section in sections {
        if let Some(card) = section.get("musicCardShelfRenderer") {
            candidates.push(parse_card(card));
        } else if let Some(shelf) = section.get("musicShelfRenderer") {
            let category = nav_str(shelf, &["title", "runs", "0", "text"]);
            let items = shelf.get("contents").and_then(Value::as_array);
            for item in items.into_iter().flatten() {
                if let Some(renderer) = item.get("musicResponsiveListItemRenderer") {
                    candidates.push(parse_list_item(renderer, category));
                }
            }
        }
    }
    Ok(candidates)
}

fn parse_card(card: &Value) -> SearchCandidate {
    let title_run = nav(card, &["title", "runs", "0"]);
    let category = nav_str(
        card,
        &["header", "musicCardShelfHeaderBasicRenderer", "title", "runs", "0", "text"],
    )
    .unwrap_or(TOP_RESULT);

    SearchCandidate {
        video_id: title_run
            .and_then(|run| nav_str(run, &["navigationEndpoint", "watchEndpoint", "videoId"]))
            .map(str::to_string),
        title: title_run
            .and_then(|run| nav_str(run, &["text"]))
            .map(str::to_string),
        category: Some(category.to_string()),
    }
}

fn parse_list_item(item: &Value, category: Option<&str>) -> SearchCandidate {
    let title_run = nav(
        item,
        &["flexColumns", "0", "musicResponsiveListItemFlexColumnRenderer", "text", "runs", "0"],
    );

    let video_id = nav_str(item, &["playlistItemData", "videoId"])
        .or_else(|| {
            title_run
                .and_then(|run| nav_str(run, &["navigationEndpoint", "watchEndpoint", "videoId"]))
        })
        .or_else(|| {
            nav_str(
                item,
                &[
                    "overlay",
                    "musicItemThumbnailOverlayRenderer",
                    "content",
                    "musicPlayButtonRenderer",
                    "playNavigationEndpoint",
                    "watchEndpoint",
                    "videoId",
                ],
            )
        });

    SearchCandidate {
        video_id: video_id.map(str::to_string),
        title: title_run
            .and_then(|run| nav_str(run, &["text"]))
            .map(str::to_string),
        category: category.map(str::to_string),
    }
}
