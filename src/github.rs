use crate::constants::{GITHUB_ACCEPT, MAX_PAGES, PER_PAGE, USER_AGENT};
use crate::debug;
use crate::error::RemoteSourceError;
use crate::history::HistorySource;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// one HTTP response, reduced to what pagination and decoding need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub link: Option<String>,
    pub body: String,
}

/// issues GET requests; implementations must not treat non-2xx as an error
pub trait Transport {
    fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<Page, RemoteSourceError>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<Page, RemoteSourceError> {
        let mut request = self.agent.get(url);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let mut response = request
            .call()
            .map_err(|e| RemoteSourceError(format!("request to {url} failed: {e}")))?;

        let status = response.status().as_u16();
        let link = response
            .headers()
            .get("link")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| RemoteSourceError(format!("failed to read response from {url}: {e}")))?;

        Ok(Page { status, link, body })
    }
}

#[derive(Debug, Deserialize)]
struct CommitRecord {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ChangedFile {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct CompareResponse {
    #[serde(default)]
    files: Vec<ChangedFile>,
}

/// remote history source backed by the GitHub REST API
pub struct GitHubClient<T> {
    transport: T,
    api_url: String,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl<T: Transport> GitHubClient<T> {
    pub fn new(
        transport: T,
        api_url: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            transport,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            owner: owner.into(),
            repo: repo.into(),
            token,
        }
    }

    fn repo_url(&self) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_url,
            encode_component(&self.owner),
            encode_component(&self.repo)
        )
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Accept", GITHUB_ACCEPT.to_string()),
            ("User-Agent", USER_AGENT.to_string()),
        ];
        if let Some(token) = &self.token {
            headers.push(("Authorization", format!("token {token}")));
        }
        headers
    }

    /// fetch `url` and every page linked from it as rel="next"
    fn get_all_pages<R: DeserializeOwned>(
        &self,
        url: String,
        action: &str,
        mut extract: impl FnMut(R) -> Vec<String>,
    ) -> Result<Vec<String>, RemoteSourceError> {
        let headers = self.headers();
        let mut items = Vec::new();
        let mut next_url = Some(url);
        let mut pages = 0;

        while let Some(url) = next_url {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(RemoteSourceError(format!(
                    "github {action} exceeded {MAX_PAGES} pages"
                )));
            }

            debug!("GET {}", url);
            let page = self.transport.get(&url, &headers)?;
            if !(200..300).contains(&page.status) {
                return Err(RemoteSourceError(format!(
                    "github {action} failed: {}",
                    page.status
                )));
            }

            let records: R = serde_json::from_str(&page.body).map_err(|e| {
                RemoteSourceError(format!("error parsing the response body: {e}"))
            })?;
            items.extend(extract(records));

            next_url = page.link.as_deref().and_then(next_page_url);
        }

        Ok(items)
    }
}

impl<T: Transport> HistorySource for GitHubClient<T> {
    type Error = RemoteSourceError;

    fn commit_history(&self, branch: &str) -> Result<Vec<String>, RemoteSourceError> {
        let url = format!(
            "{}/commits?sha={}&per_page={PER_PAGE}&page=1",
            self.repo_url(),
            encode_component(branch)
        );
        self.get_all_pages(url, "commit history", |commits: Vec<CommitRecord>| {
            commits.into_iter().map(|commit| commit.sha).collect()
        })
    }

    fn modified_files(&self, base: &str, tip: &str) -> Result<Vec<String>, RemoteSourceError> {
        let url = format!(
            "{}/compare/{}...{}?per_page={PER_PAGE}",
            self.repo_url(),
            encode_component(base),
            encode_component(tip)
        );
        self.get_all_pages(url, "compare", |compare: CompareResponse| {
            compare.files.into_iter().map(|file| file.filename).collect()
        })
    }
}

/// extract the rel="next" target from a `Link` header
pub fn next_page_url(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let Some((key, value)) = param.split_once('=') else {
                return false;
            };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next"))
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')?
            .strip_suffix('>')
            .map(str::to_string)
    })
}

/// escaped in path segments and query values; slashes stay readable so
/// branch names like `feature/x` survive as-is
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
