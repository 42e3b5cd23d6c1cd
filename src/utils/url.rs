// src/utils/url.rs

//! URL building for data service actions.

use url::Url;

use crate::error::Result;

/// Build the read URL for an action.
///
/// The action goes into the `action` query parameter, followed by any extra
/// parameters. Values are percent-encoded.
///
/// # Examples
/// ```
/// use masjid_site::utils::url::action_url;
///
/// let url = action_url("https://example.com/exec", "getArticle", &[("id", "a 1")]).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/exec?action=getArticle&id=a+1");
/// ```
pub fn action_url(endpoint: &str, action: &str, params: &[(&str, &str)]) -> Result<Url> {
    let mut url = Url::parse(endpoint)?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("action", action);
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }
    Ok(url)
}

/// Strip the query string, for logging without leaking parameters.
pub fn redacted(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_url_keeps_existing_query() {
        let url = action_url("https://example.com/exec?v=2", "getAll", &[]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/exec?v=2&action=getAll");
    }

    #[test]
    fn test_action_url_encodes_params() {
        let url = action_url(
            "https://example.com/exec",
            "login",
            &[("username", "admin"), ("password", "p&ss=1")],
        )
        .unwrap();
        assert_eq!(
            url.query(),
            Some("action=login&username=admin&password=p%26ss%3D1")
        );
    }

    #[test]
    fn test_action_url_rejects_bad_endpoint() {
        assert!(action_url("not a url", "getAll", &[]).is_err());
    }

    #[test]
    fn test_redacted_drops_query() {
        let url = action_url("https://example.com/exec", "login", &[("password", "x")]).unwrap();
        assert_eq!(redacted(&url), "https://example.com/exec");
    }
}
