//! Token list sources: remote documents over HTTP and the embedded blocked
//! list.

use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};
use url::Url;

use crate::domain::TokenList;
use crate::error::Result;

const UNSUPPORTED_TOKEN_LIST: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/data/unsupported.tokenlist.json"
));

/// The list of tokens the router refuses to route.
///
/// An unparseable embedded document yields an empty list.
#[must_use]
pub fn unsupported_token_list() -> TokenList {
    serde_json::from_str(UNSUPPORTED_TOKEN_LIST).unwrap_or_else(|e| {
        warn!(error = %e, "Embedded unsupported token list is invalid");
        TokenList::empty("Unsupported Tokens")
    })
}

pub struct TokenListFetcher {
    client: Client,
    timeout: Duration,
}

impl TokenListFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    pub async fn fetch(&self, url: &Url) -> Result<TokenList> {
        info!(url = %url, "Fetching token list");
        let list: TokenList = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        info!(url = %url, count = list.tokens.len(), "Fetched token list");
        Ok(list)
    }

    /// Fetch `url` if given. Any failure yields an empty list named `name`.
    pub async fn fetch_or_empty(&self, url: Option<&Url>, name: &str) -> TokenList {
        let Some(url) = url else {
            return TokenList::empty(name);
        };
        match self.fetch(url).await {
            Ok(list) => list,
            Err(e) => {
                warn!(url = %url, error = %e, "Token list fetch failed, using empty list");
                TokenList::empty(name)
            }
        }
    }
}
