use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use letterboxd_export_models::{Guid, WatchedMovie};
use serde_json::Value;
use tracing::debug;

use crate::error::PlexError;
use crate::traits::MovieLibrary;

const PLEX_TV_BASE_URL: &str = "https://plex.tv";

#[derive(Debug, Clone)]
pub struct SectionInfo {
    pub key: String,
    pub type_: String,
    pub title: String,
}

/// An account shared with the owner's server, as listed by plex.tv.
#[derive(Debug, Clone)]
pub struct SharedUser {
    pub id: u64,
    pub username: String,
    pub home: bool,
}

/// HTTP client bound to one Plex server and one access token. An
/// impersonated session is simply a second client built with the
/// exchanged per-user token; nothing is cached across exports.
pub struct PlexHttpClient {
    client: reqwest::Client,
    server_url: String,
}

impl PlexHttpClient {
    pub fn new(server_url: String, token: String) -> Result<Self, PlexError> {
        let client = reqwest::Client::builder()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers.insert(
                    reqwest::header::HeaderName::from_static("x-plex-token"),
                    reqwest::header::HeaderValue::from_str(&token)
                        .map_err(|_| PlexError::Unexpected("invalid token format".to_string()))?,
                );
                headers.insert(
                    reqwest::header::HeaderName::from_static("x-plex-client-identifier"),
                    reqwest::header::HeaderValue::from_static("plex2letterboxd"),
                );
                headers
            })
            .build()?;

        Ok(Self {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn get_json(&self, url: &str, context: &str) -> Result<Value, PlexError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PlexError::Unauthorized);
        }
        if !status.is_success() {
            return Err(PlexError::Status {
                status,
                context: context.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    /// Machine identifier of the server this client is bound to.
    pub async fn machine_identifier(&self) -> Result<String, PlexError> {
        let url = format!("{}/identity", self.server_url);
        let json = self.get_json(&url, "reading server identity").await?;

        json.get("MediaContainer")
            .and_then(|mc| mc.get("machineIdentifier"))
            .and_then(|id| id.as_str())
            .map(|id| id.to_string())
            .ok_or_else(|| {
                PlexError::Unexpected("identity response has no machineIdentifier".to_string())
            })
    }

    /// Username of the account that owns this client's token.
    pub async fn owner_username(&self) -> Result<String, PlexError> {
        let url = format!("{}/api/v2/user", PLEX_TV_BASE_URL);
        let json = self.get_json(&url, "reading account").await?;

        json.get("username")
            .or_else(|| json.get("title"))
            .and_then(|u| u.as_str())
            .map(|u| u.to_string())
            .ok_or_else(|| PlexError::Unexpected("account response has no username".to_string()))
    }

    /// Accounts the owner shares the server with, including home profiles.
    pub async fn shared_users(&self) -> Result<Vec<SharedUser>, PlexError> {
        let url = format!("{}/api/users", PLEX_TV_BASE_URL);
        let json = self.get_json(&url, "listing shared users").await?;

        let mut users = Vec::new();
        if let Some(user_array) = json
            .get("MediaContainer")
            .and_then(|mc| mc.get("User"))
            .and_then(|u| u.as_array())
        {
            for item in user_array {
                if let Some(user) = parse_shared_user(item) {
                    users.push(user);
                } else {
                    debug!("Plex users: skipped entry without id/username: {:?}", item);
                }
            }
        }

        debug!("Plex users: found {} shared users", users.len());
        Ok(users)
    }

    /// Exchange a shared user for their access token on the given server.
    /// Returns None when the user has no grant on that machine.
    pub async fn user_token(
        &self,
        user_id: u64,
        machine_identifier: &str,
    ) -> Result<Option<String>, PlexError> {
        let url = format!(
            "{}/api/servers/{}/shared_servers",
            PLEX_TV_BASE_URL, machine_identifier
        );
        let json = self.get_json(&url, "exchanging user token").await?;

        let shared = json
            .get("MediaContainer")
            .and_then(|mc| mc.get("SharedServer"))
            .and_then(|s| s.as_array());

        if let Some(shared) = shared {
            for entry in shared {
                if parse_u64(entry.get("userID")) == Some(user_id) {
                    return Ok(entry
                        .get("accessToken")
                        .and_then(|t| t.as_str())
                        .map(|t| t.to_string()));
                }
            }
        }

        Ok(None)
    }

    /// All sections of this server's library.
    pub async fn sections(&self) -> Result<Vec<SectionInfo>, PlexError> {
        let url = format!("{}/library/sections", self.server_url);
        let json = self.get_json(&url, "listing library sections").await?;

        let mut sections = Vec::new();
        if let Some(dir_array) = json
            .get("MediaContainer")
            .and_then(|mc| mc.get("Directory"))
            .and_then(|d| d.as_array())
        {
            for dir in dir_array {
                let key = dir
                    .get("key")
                    .and_then(|k| k.as_str())
                    .unwrap_or("")
                    .to_string();
                let type_ = dir
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("")
                    .to_string();
                let title = dir
                    .get("title")
                    .and_then(|t| t.as_str())
                    .unwrap_or("")
                    .to_string();

                sections.push(SectionInfo { key, type_, title });
            }
        }

        Ok(sections)
    }

    async fn query_watched_movies(
        &self,
        section_key: &str,
        watched_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<WatchedMovie>, PlexError> {
        let url = format!("{}/library/sections/{}/all", self.server_url, section_key);

        let mut query: Vec<(&str, String)> = vec![
            ("type", "1".to_string()),
            ("includeGuids", "1".to_string()),
            ("sort", "lastViewedAt".to_string()),
            ("unwatched", "0".to_string()),
        ];
        if let Some(after) = watched_after {
            query.push(("lastViewedAt>>", after.timestamp().to_string()));
        }

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PlexError::Unauthorized);
        }
        if !status.is_success() {
            return Err(PlexError::Status {
                status,
                context: format!("querying section {}", section_key),
            });
        }
        let json: Value = response.json().await?;

        let mut movies = Vec::new();
        let mut skipped = 0;
        if let Some(meta_array) = json
            .get("MediaContainer")
            .and_then(|mc| mc.get("Metadata"))
            .and_then(|m| m.as_array())
        {
            for item in meta_array {
                if let Some(movie) = parse_movie(item) {
                    movies.push(movie);
                } else {
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            debug!(
                "Plex section {}: skipped {} items that couldn't be parsed",
                section_key, skipped
            );
        }

        // The server already filters and sorts; enforced again here so the
        // export contract doesn't depend on server-side query behavior.
        movies.retain(|movie| match (movie.last_viewed_at, watched_after) {
            (None, _) => false,
            (Some(watched), Some(bound)) => watched > bound,
            (Some(_), None) => true,
        });
        movies.sort_by_key(|movie| movie.last_viewed_at);

        Ok(movies)
    }
}

/// Match a section by title, restricted to movie sections so a music or
/// show library with the same name can't be exported by accident.
fn find_movie_section(sections: &[SectionInfo], name: &str) -> Option<String> {
    sections
        .iter()
        .find(|section| section.type_ == "movie" && section.title == name)
        .map(|section| section.key.clone())
}

#[async_trait]
impl MovieLibrary for PlexHttpClient {
    async fn section_key(&self, name: &str) -> Result<Option<String>, PlexError> {
        let sections = self.sections().await?;
        Ok(find_movie_section(&sections, name))
    }

    async fn watched_movies(
        &self,
        section_key: &str,
        watched_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<WatchedMovie>, PlexError> {
        self.query_watched_movies(section_key, watched_after).await
    }
}

fn parse_u64(value: Option<&Value>) -> Option<u64> {
    let value = value?;
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn parse_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        Some(Value::String(s)) => s == "1" || s == "true",
        _ => false,
    }
}

fn parse_shared_user(item: &Value) -> Option<SharedUser> {
    let id = parse_u64(item.get("id"))?;
    let username = item
        .get("username")
        .or_else(|| item.get("title"))
        .and_then(|u| u.as_str())?
        .to_string();
    if username.is_empty() {
        return None;
    }

    Some(SharedUser {
        id,
        username,
        home: parse_bool(item.get("home")),
    })
}

fn parse_timestamp(timestamp: Option<&Value>) -> Option<DateTime<Utc>> {
    timestamp
        .and_then(|t| t.as_i64())
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
}

fn parse_guid_array(guid_value: Option<&Value>) -> Vec<Guid> {
    let mut guids = Vec::new();
    let Some(guid_value) = guid_value else {
        return guids;
    };

    if let Some(guid_array) = guid_value.as_array() {
        for guid_obj in guid_array {
            if let Some(id) = guid_obj.get("id").and_then(|i| i.as_str()) {
                guids.push(Guid { id: id.to_string() });
            } else if let Some(id_str) = guid_obj.as_str() {
                // Sometimes GUIDs are plain strings
                guids.push(Guid {
                    id: id_str.to_string(),
                });
            }
        }
    } else if let Some(id) = guid_value.get("id").and_then(|i| i.as_str()) {
        guids.push(Guid { id: id.to_string() });
    } else if let Some(id_str) = guid_value.as_str() {
        guids.push(Guid {
            id: id_str.to_string(),
        });
    }
    guids
}

fn parse_movie(item: &Value) -> Option<WatchedMovie> {
    let rating_key = item.get("ratingKey")?.as_str()?.to_string();
    let title = item.get("title")?.as_str()?.to_string();
    let year = item.get("year").and_then(|y| y.as_u64()).map(|y| y as u32);
    let user_rating = item.get("userRating").and_then(|r| r.as_f64());
    let last_viewed_at = parse_timestamp(item.get("lastViewedAt"));
    let guids = parse_guid_array(item.get("Guid"));

    Some(WatchedMovie {
        rating_key,
        title,
        year,
        user_rating,
        last_viewed_at,
        guids,
    })
}
