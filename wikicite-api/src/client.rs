//! MediaWiki API client: login, throttled requests with retry, article
//! listing and batched content retrieval.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{ApiConfig, Credentials};
use crate::error::{ApiError, Result};

/// Request parameters, in the order they are sent.
pub type Params = Vec<(String, String)>;

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

/// Outcome of a single HTTP attempt.
enum Attempt {
    Done(Value),
    RateLimited(Duration),
    Failed(ApiError),
}

/// Session against one MediaWiki `api.php` endpoint.
///
/// Keeps cookies between calls so a successful [`WikiClient::authenticate`]
/// applies to every later request.
#[derive(Debug, Clone)]
pub struct WikiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl WikiClient {
    /// Build a client session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the HTTP client cannot be initialized.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Log in with bot credentials.
    ///
    /// # Errors
    ///
    /// - [`ApiError::MissingCredentials`] if a user name or password is empty
    /// - [`ApiError::MalformedResponse`] if no login token is returned
    /// - [`ApiError::LoginFailed`] if the API does not answer `Success`
    /// - [`ApiError::Http`] / [`ApiError::Status`] on transport failures
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<()> {
        if !credentials.is_complete() {
            return Err(ApiError::MissingCredentials);
        }
        info!(user = %credentials.username, "Authenticating bot");

        let token_response: Value = self
            .http
            .get(&self.config.api_url)
            .query(&[
                ("action", "query"),
                ("meta", "tokens"),
                ("type", "login"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let token = token_response
            .pointer("/query/tokens/logintoken")
            .and_then(Value::as_str)
            .ok_or(ApiError::MalformedResponse {
                context: "query.tokens.logintoken",
            })?;

        let login_response: Value = self
            .http
            .post(&self.config.api_url)
            .form(&[
                ("action", "login"),
                ("lgname", credentials.username.as_str()),
                ("lgpassword", credentials.password.as_str()),
                ("lgtoken", token),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let result = login_response
            .pointer("/login/result")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if result != "Success" {
            return Err(ApiError::LoginFailed {
                result: result.to_owned(),
            });
        }

        info!("Authentication successful");
        Ok(())
    }

    /// POST an API request, throttled and retried.
    ///
    /// Each attempt waits `request_delay` first. A 429 response waits for the
    /// server's `Retry-After` hint (at most `max_delay`) and resets the
    /// backoff; any other failure waits an exponentially growing delay. A
    /// MediaWiki `error` object is returned immediately as [`ApiError::Api`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] for API-reported errors and
    /// [`ApiError::RetriesExhausted`] once every attempt has failed.
    pub async fn request(&self, params: &[(String, String)]) -> Result<Value> {
        with_retry(&self.config, || self.send_once(params)).await
    }

    async fn send_once(&self, params: &[(String, String)]) -> Attempt {
        let mut form: Vec<(&str, &str)> = params
            .iter()
            .filter(|(k, _)| k != "format")
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        form.push(("format", "json"));

        let response = match self.http.post(&self.config.api_url).form(&form).send().await {
            Ok(r) => r,
            Err(e) => return Attempt::Failed(e.into()),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response.headers().get(RETRY_AFTER).and_then(|v| v.to_str().ok());
            return Attempt::RateLimited(self.config.retry.rate_limit_wait(retry_after));
        }
        if !status.is_success() {
            return Attempt::Failed(ApiError::Status {
                status: status.as_u16(),
            });
        }

        match response.json::<Value>().await {
            Ok(value) => Attempt::Done(value),
            Err(e) => Attempt::Failed(e.into()),
        }
    }

    /// Fetch the current wikitext of up to `batch_size` articles in one request.
    ///
    /// Titles the wiki does not have are omitted. Keys are the titles as the
    /// wiki reports them (normalized, e.g. first letter capitalized).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no `query.pages`.
    pub async fn fetch_articles(&self, titles: &[String]) -> Result<BTreeMap<String, String>> {
        if titles.is_empty() {
            return Ok(BTreeMap::new());
        }

        let joined = titles.join("|");
        let data = self
            .request(&params(&[
                ("action", "query"),
                ("prop", "revisions"),
                ("rvprop", "content"),
                ("rvslots", "main"),
                ("titles", joined.as_str()),
                ("formatversion", "2"),
            ]))
            .await?;

        let pages = parse_pages(&data)?;
        debug!(
            requested = titles.len(),
            found = pages.len(),
            "Fetched article batch"
        );
        Ok(pages)
    }

    /// List up to `limit` articles (namespace 0) that embed `Template:<template>`.
    ///
    /// Follows the API's `continue` object page by page.
    ///
    /// # Errors
    ///
    /// Returns an error if any listing request fails.
    pub async fn find_articles_using_template(
        &self,
        template: &str,
        limit: usize,
    ) -> Result<Vec<String>> {
        let mut articles: Vec<String> = Vec::new();
        if limit == 0 {
            return Ok(articles);
        }

        let eititle = format!("Template:{}", template.replace(' ', "_"));
        let eilimit = self.config.batch_size.max(1).to_string();
        let mut request_params = params(&[
            ("action", "query"),
            ("list", "embeddedin"),
            ("eititle", eititle.as_str()),
            ("eilimit", eilimit.as_str()),
            ("einamespace", "0"),
        ]);

        while articles.len() < limit {
            let data = self.request(&request_params).await?;
            let page = data
                .pointer("/query/embeddedin")
                .and_then(Value::as_array)
                .ok_or(ApiError::MalformedResponse {
                    context: "query.embeddedin",
                })?;
            articles.extend(
                page.iter()
                    .filter_map(|p| p.get("title").and_then(Value::as_str))
                    .map(str::to_owned),
            );
            debug!(listed = articles.len(), limit, "Listed embedding articles");

            let Some(continuation) = data.get("continue").and_then(Value::as_object) else {
                break;
            };
            for (key, value) in continuation {
                let value = value
                    .as_str()
                    .map_or_else(|| value.to_string(), str::to_owned);
                set_param(&mut request_params, key, value);
            }
        }

        articles.truncate(limit);
        Ok(articles)
    }
}

fn set_param(params: &mut Params, key: &str, value: String) {
    if let Some(slot) = params.iter_mut().find(|(k, _)| k == key) {
        slot.1 = value;
    } else {
        params.push((key.to_owned(), value));
    }
}

/// Turn a MediaWiki `error` object into [`ApiError::Api`].
fn check_api_error(value: Value) -> Result<Value> {
    if let Some(error) = value.get("error") {
        let field = |name: &str| {
            error
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        return Err(ApiError::Api {
            code: field("code"),
            info: field("info"),
        });
    }
    Ok(value)
}

/// Extract title → content from a `formatversion=2` revisions response.
fn parse_pages(data: &Value) -> Result<BTreeMap<String, String>> {
    let pages = data
        .pointer("/query/pages")
        .and_then(Value::as_array)
        .ok_or(ApiError::MalformedResponse {
            context: "query.pages",
        })?;

    let mut results = BTreeMap::new();
    for page in pages {
        if page.get("missing").is_some() || page.get("invalid").is_some() {
            continue;
        }
        let title = page.get("title").and_then(Value::as_str);
        let content = page
            .pointer("/revisions/0/slots/main/content")
            .and_then(Value::as_str);
        if let (Some(title), Some(content)) = (title, content) {
            results.insert(title.to_owned(), content.to_owned());
        }
    }
    Ok(results)
}

/// Drive `send` until it produces a response or the retry policy runs out.
///
/// Only failures raise the backoff exponent; a rate-limited attempt sleeps
/// for its own wait and starts the exponent over.
async fn with_retry<F, Fut>(config: &ApiConfig, mut send: F) -> Result<Value>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt>,
{
    let policy = &config.retry;
    let attempts = policy.attempts();
    let mut failures: u32 = 0;
    let mut last = ApiError::RateLimited;

    for attempt in 1..=attempts {
        tokio::time::sleep(config.request_delay).await;

        match send().await {
            Attempt::Done(value) => return check_api_error(value),
            Attempt::RateLimited(wait) => {
                warn!(attempt, wait_secs = wait.as_secs_f64(), "Rate limited, waiting");
                failures = 0;
                last = ApiError::RateLimited;
                tokio::time::sleep(wait).await;
            }
            Attempt::Failed(err) => {
                warn!(attempt, error = %err, "API request failed");
                failures += 1;
                last = err;
                if attempt < attempts {
                    tokio::time::sleep(policy.backoff(failures)).await;
                }
            }
        }
    }

    Err(ApiError::RetriesExhausted {
        attempts,
        last: Box::new(last),
    })
}
