use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DiscoveryError, DiscoveryResult};
use crate::types::RepositoryRecord;

/// GitHub GraphQL endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Repository search with cursor pagination
pub const SEARCH_QUERY: &str = r#"
query ($searchQuery: String!, $reposPerPage: Int!, $cursor: String) {
  search(query: $searchQuery, type: REPOSITORY, first: $reposPerPage, after: $cursor) {
    repositoryCount
    edges {
      node {
        ... on Repository {
          nameWithOwner
          primaryLanguage {
            name
          }
          url
          stargazerCount
          createdAt
          releases {
            totalCount
          }
        }
      }
    }
    pageInfo {
      endCursor
      hasNextPage
    }
  }
}
"#;

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub repositories: Vec<RepositoryRecord>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
    pub repository_count: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Variables<'a> {
    search_query: &'a str,
    repos_per_page: u32,
    cursor: Option<&'a str>,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'static str,
    variables: Variables<'a>,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<SearchData>,
}

#[derive(Deserialize)]
struct SearchData {
    search: SearchConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchConnection {
    #[serde(default)]
    repository_count: u64,
    #[serde(default)]
    edges: Vec<SearchEdge>,
    page_info: PageInfo,
}

#[derive(Deserialize)]
struct SearchEdge {
    node: Option<RepositoryNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    name_with_owner: Option<String>,
    url: Option<String>,
    #[serde(default)]
    stargazer_count: u64,
    created_at: Option<String>,
    releases: Option<TotalCount>,
    primary_language: Option<Language>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    total_count: u64,
}

#[derive(Deserialize)]
struct Language {
    name: String,
}

impl RepositoryNode {
    /// Non-repository search hits come back as empty objects
    fn into_record(self) -> Option<RepositoryRecord> {
        let name = self.name_with_owner?;
        Some(RepositoryRecord {
            url: self
                .url
                .unwrap_or_else(|| format!("https://github.com/{}", name)),
            name,
            stargazers: self.stargazer_count,
            created_at: self.created_at.unwrap_or_default(),
            releases: self.releases.map_or(0, |r| r.total_count),
            primary_language: self.primary_language.map(|l| l.name),
        })
    }
}

/// Decode a GraphQL response body into a page, failing when an `errors`
/// field is present
pub fn parse_search_response(body: &str) -> DiscoveryResult<SearchPage> {
    let value: Value = serde_json::from_str(body).map_err(|e| DiscoveryError::Malformed(e.to_string()))?;

    // any `errors` key fails the page, even a null one
    if let Some(errors) = value.get("errors") {
        return Err(DiscoveryError::Api(errors.to_string()));
    }

    let response: GraphQlResponse =
        serde_json::from_value(value).map_err(|e| DiscoveryError::Malformed(e.to_string()))?;

    let search = response
        .data
        .ok_or_else(|| DiscoveryError::Malformed("missing `data` field".to_string()))?
        .search;

    Ok(SearchPage {
        repositories: search
            .edges
            .into_iter()
            .filter_map(|edge| edge.node.and_then(RepositoryNode::into_record))
            .collect(),
        has_next_page: search.page_info.has_next_page,
        end_cursor: search.page_info.end_cursor,
        repository_count: search.repository_count,
    })
}

/// Client for the GitHub GraphQL search endpoint
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>, endpoint: impl Into<String>) -> DiscoveryResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DiscoveryError::MissingToken);
        }

        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token,
        })
    }

    /// Fetch one page of repositories matching `query`
    pub async fn search_page(
        &self,
        query: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> DiscoveryResult<SearchPage> {
        let request = GraphQlRequest {
            query: SEARCH_QUERY,
            variables: Variables {
                search_query: query,
                repos_per_page: page_size,
                cursor,
            },
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DiscoveryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_search_response(&body)
    }
}
