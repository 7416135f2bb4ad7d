// Reddit API client - implements the QueueSource and RedditActions ports.
//
// Authenticates with the password grant (script app), then talks to
// oauth.reddit.com. Rate limiting is Reddit's side of the contract; the
// core treats each call here as one atomic, fallible operation.

use crate::core::moderation::{ActionError, QueueItem, QueueSource, RedditActions};
use crate::infra::config::RedditConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

impl From<reqwest::Error> for ActionError {
    fn from(err: reqwest::Error) -> Self {
        ActionError::Transport(err.to_string())
    }
}

pub struct RedditClient {
    http: Client,
    token: String,
    user_agent: String,
}

impl RedditClient {
    /// Authenticate with the password grant and verify the session by
    /// fetching the logged-in identity.
    pub async fn login(config: &RedditConfig) -> Result<Self, ActionError> {
        let http = Client::new();

        let params = [
            ("grant_type", "password"),
            ("username", config.username.as_str()),
            ("password", config.password.as_str()),
        ];

        let response = http
            .post(TOKEN_URL)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .header(reqwest::header::USER_AGENT, &config.user_agent)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ActionError::Api { status, message });
        }

        let body: Value = response.json().await?;
        let token = body["access_token"]
            .as_str()
            .ok_or_else(|| {
                ActionError::UnexpectedResponse("token response missing access_token".to_string())
            })?
            .to_string();

        let client = Self {
            http,
            token,
            user_agent: config.user_agent.clone(),
        };

        let me = client.get_json(&format!("{}/api/v1/me", API_BASE)).await?;
        tracing::info!(
            "Authenticated as: {}",
            me["name"].as_str().unwrap_or("unknown")
        );

        Ok(client)
    }

    async fn get_json(&self, url: &str) -> Result<Value, ActionError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ActionError::Api { status, message });
        }

        Ok(response.json().await?)
    }

    async fn post_form(&self, path: &str, params: &[(&str, &str)]) -> Result<(), ActionError> {
        let url = format!("{}{}", API_BASE, path);
        tracing::debug!("POST {} ({} params)", path, params.len());

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .form(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ActionError::Api { status, message });
        }

        Ok(())
    }
}

/// Convert a modqueue listing into typed queue items, resolving each
/// entry's kind once from its `t3`/`t1` tag. Unknown kinds are skipped.
fn parse_modqueue(listing: &Value) -> Vec<QueueItem> {
    let children = listing["data"]["children"].as_array();
    let Some(children) = children else {
        return Vec::new();
    };

    children
        .iter()
        .filter_map(|child| {
            let data = &child["data"];
            let id = data["id"].as_str()?.to_string();
            let author = data["author"]
                .as_str()
                .filter(|name| *name != "[deleted]")
                .map(str::to_string);

            match child["kind"].as_str()? {
                "t3" => Some(QueueItem::Submission {
                    id,
                    author,
                    title: data["title"].as_str().unwrap_or_default().to_string(),
                    body: data["selftext"].as_str().unwrap_or_default().to_string(),
                    url: data["url"].as_str().map(str::to_string),
                }),
                "t1" => Some(QueueItem::Comment {
                    id,
                    author,
                    body: data["body"].as_str().unwrap_or_default().to_string(),
                }),
                other => {
                    tracing::debug!("Skipping modqueue entry of kind {}", other);
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl QueueSource for RedditClient {
    async fn fetch_queue(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<QueueItem>, ActionError> {
        tracing::debug!("Fetching modqueue items from r/{} (limit={})", subreddit, limit);

        let url = format!(
            "{}/r/{}/about/modqueue?limit={}&raw_json=1",
            API_BASE, subreddit, limit
        );
        let listing = self.get_json(&url).await?;
        let items = parse_modqueue(&listing);

        tracing::debug!("Found {} items in modqueue", items.len());
        Ok(items)
    }
}

#[async_trait]
impl RedditActions for RedditClient {
    async fn approve(&self, item: &QueueItem) -> Result<(), ActionError> {
        tracing::debug!("Approving item: {}", item.id());
        self.post_form("/api/approve", &[("id", item.fullname().as_str())])
            .await
    }

    async fn remove(&self, item: &QueueItem) -> Result<(), ActionError> {
        tracing::debug!("Removing item: {}", item.id());
        self.post_form(
            "/api/remove",
            &[("id", item.fullname().as_str()), ("spam", "false")],
        )
        .await
    }

    async fn reply(&self, item: &QueueItem, text: &str) -> Result<(), ActionError> {
        self.post_form(
            "/api/comment",
            &[
                ("thing_id", item.fullname().as_str()),
                ("text", text),
                ("api_type", "json"),
            ],
        )
        .await
    }

    async fn send_removal_message(&self, item: &QueueItem, text: &str) -> Result<(), ActionError> {
        self.post_form(
            "/api/v1/modactions/removal_link_message",
            &[
                ("item_id", item.fullname().as_str()),
                ("message", text),
                ("type", "public"),
            ],
        )
        .await
    }

    async fn send_modmail(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        from_subreddit: &str,
    ) -> Result<(), ActionError> {
        self.post_form(
            "/api/compose",
            &[
                ("to", recipient),
                ("subject", subject),
                ("text", body),
                ("from_sr", from_subreddit),
                ("api_type", "json"),
            ],
        )
        .await
    }
}
