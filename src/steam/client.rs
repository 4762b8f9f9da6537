//! Async HTTP client wrapping reqwest.
//!
//! One client serves all three endpoint families. The session cookie is
//! attached to wishlist requests only; price and list downloads are
//! anonymous.

use std::time::Duration;

use crate::error::Result;

/// Production store web service.
pub const STORE_BASE: &str = "https://store.steampowered.com";

/// Production home of the downloadable app-id lists.
pub const LISTS_BASE: &str = "https://raw.githubusercontent.com/BlueBoxWare/steamdb/main/lists";

/// The storefront serves reduced payloads to unknown agents, so requests
/// go out with a desktop browser User-Agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/118.0.0.0 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the storefront endpoints.
#[derive(Clone)]
pub struct StoreClient {
    client: reqwest::Client,
    cookie: Option<String>,
    /// Base URL of the store web service. Overridable for tests.
    pub store_base: String,
    /// Base URL of the app-id list downloads. Overridable for tests.
    pub lists_base: String,
}

impl StoreClient {
    /// Create a client against the production endpoints. `cookie` is the
    /// `steamLoginSecure` value for a private wishlist, if any.
    pub fn new(cookie: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            cookie,
            store_base: STORE_BASE.to_string(),
            lists_base: LISTS_BASE.to_string(),
        }
    }

    /// Whether a session cookie was configured.
    pub fn has_cookie(&self) -> bool {
        self.cookie.is_some()
    }

    /// GET a URL. `with_cookie` attaches the session cookie when one is
    /// configured.
    pub(crate) async fn get(&self, url: &str, with_cookie: bool) -> Result<reqwest::Response> {
        let mut request = self.client.get(url);
        if with_cookie {
            if let Some(cookie) = &self.cookie {
                request = request.header("Cookie", format!("steamLoginSecure={cookie}"));
            }
        }
        Ok(request.send().await?)
    }
}
