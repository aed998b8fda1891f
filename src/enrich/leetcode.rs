use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::EnrichConfig;
use crate::enrich::SolvedCountSource;
use crate::error::FetchError;

const USER_AGENT: &str = concat!("section-sorter/", env!("CARGO_PKG_VERSION"));
// The per-difficulty rows do not always add up to this one.
const TOTAL_CATEGORY: &str = "All";

const SOLVED_QUERY: &str = "query userProblemsSolved($username: String!) { \
    matchedUser(username: $username) { \
    submitStats { acSubmissionNum { difficulty count } } } }";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchedUser {
    submit_stats: SubmitStats,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitStats {
    ac_submission_num: Vec<CategoryCount>,
}

#[derive(Debug, Deserialize)]
struct CategoryCount {
    difficulty: String,
    count: u32,
}

pub fn parse_solved_count(body: &str) -> Result<u32, FetchError> {
    let response: GraphQlResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    let user = response
        .data
        .and_then(|data| data.matched_user)
        .ok_or_else(|| FetchError::Parse("no matching user".to_string()))?;

    user.submit_stats
        .ac_submission_num
        .iter()
        .find(|category| category.difficulty == TOTAL_CATEGORY)
        .map(|category| category.count)
        .ok_or_else(|| FetchError::Parse(format!("no `{TOTAL_CATEGORY}` category")))
}

pub struct LeetCodeSource {
    http_client: reqwest::Client,
    endpoint: String,
}

impl LeetCodeSource {
    pub fn new(config: &EnrichConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl SolvedCountSource for LeetCodeSource {
    async fn solved_count(&self, handle: &str) -> Result<u32, FetchError> {
        tracing::debug!(handle = %handle, endpoint = %self.endpoint, "Querying LeetCode");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&json!({
                "query": SOLVED_QUERY,
                "variables": { "username": handle },
            }))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        parse_solved_count(&body)
    }
}
