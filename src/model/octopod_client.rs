//! Octopod REST API client: playlist fetch, engagement reports, user profile

use futures::future::BoxFuture;
use reqwest::RequestBuilder;
use serde::Deserialize;

use super::clip::{Clip, ClipId};
use super::services::{ClipSource, EngagementReporter};
use crate::auth::BearerToken;
use crate::error::ClientError;
use crate::{log_api_request, log_api_result};

#[derive(Debug, Deserialize)]
struct PodcastDto {
    #[serde(default)]
    title: String,
    creator_name: String,
    #[serde(default)]
    cover_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PodclipDto {
    id: String,
    title: String,
    audio_url: String,
    /// Seconds including intro/outro
    duration: f64,
    podcast: PodcastDto,
}

#[derive(Debug, Deserialize)]
struct PlaylistResponse {
    #[serde(default)]
    duration: f64,
    results: Vec<PodclipDto>,
}

/// The signed-in listener
#[derive(Clone, Debug, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
}

impl From<PodclipDto> for Clip {
    fn from(dto: PodclipDto) -> Self {
        let creator_name = if dto.podcast.creator_name.is_empty() {
            dto.podcast.title
        } else {
            dto.podcast.creator_name
        };
        Clip {
            id: ClipId::new(dto.id),
            title: dto.title,
            creator_name,
            audio_url: dto.audio_url,
            cover_image_url: dto.podcast.cover_url.filter(|url| !url.is_empty()),
            duration_seconds: dto.duration.max(0.0),
        }
    }
}

fn parse_playlist(body: &str) -> Result<Vec<Clip>, ClientError> {
    let response: PlaylistResponse =
        serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))?;
    tracing::debug!(
        clips = response.results.len(),
        duration = response.duration,
        "Playlist response decoded"
    );

    Ok(response
        .results
        .into_iter()
        .filter(|dto| {
            let playable = !dto.audio_url.is_empty();
            if !playable {
                tracing::warn!(clip_id = %dto.id, "Dropping clip without audio");
            }
            playable
        })
        .map(Clip::from)
        .collect())
}

/// HTTP client for the Octopod backend
#[derive(Clone)]
pub struct OctopodClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<BearerToken>,
}

impl OctopodClient {
    pub fn new(base_url: impl Into<String>, token: Option<BearerToken>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Shared HTTP client, reused for clip downloads
    pub fn http(&self) -> reqwest::Client {
        self.http.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response)
    }

    pub async fn playlist(&self, seconds: u32) -> Result<Vec<Clip>, ClientError> {
        log_api_request!("playlist", seconds);
        let request = self
            .http
            .get(self.url("/content/playlist"))
            .query(&[("seconds", seconds)]);

        let result = async {
            let body = self.send(request).await?.text().await?;
            parse_playlist(&body)
        }
        .await;
        log_api_result!("playlist", result);
        result
    }

    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        log_api_request!("user_profile", path = "/user/profile");
        let result = async {
            let body = self.send(self.http.get(self.url("/user/profile"))).await?.text().await?;
            serde_json::from_str::<UserProfile>(&body).map_err(|e| ClientError::Decode(e.to_string()))
        }
        .await;
        log_api_result!("user_profile", result);
        result
    }

    async fn post_report(
        &self,
        clip_id: &ClipId,
        kind: &'static str,
        query: &[(&str, f64)],
    ) -> Result<(), ClientError> {
        log_api_request!("report", clip_id = %clip_id, kind);
        let path = format!("/content/podclip/{}/report/{}", clip_id.as_str(), kind);
        let request = self.http.post(self.url(&path)).query(query);
        let result = self.send(request).await.map(|_| ());
        log_api_result!("report", result);
        result
    }
}

impl ClipSource for OctopodClient {
    fn fetch_playlist(&self, session_budget_seconds: u32) -> BoxFuture<'_, Result<Vec<Clip>, ClientError>> {
        Box::pin(self.playlist(session_budget_seconds))
    }
}

impl EngagementReporter for OctopodClient {
    fn report_played<'a>(&'a self, clip_id: &'a ClipId) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move { self.post_report(clip_id, "played", &[]).await })
    }

    fn report_skipped<'a>(
        &'a self,
        clip_id: &'a ClipId,
        at_seconds: f64,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move { self.post_report(clip_id, "skipped", &[("skip_time", at_seconds)]).await })
    }

    fn report_tip<'a>(&'a self, clip_id: &'a ClipId, amount: f64) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move { self.post_report(clip_id, "tipped", &[("amount", amount)]).await })
    }
}
