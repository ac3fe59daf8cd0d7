use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};
use thiserror::Error;
use url::Url;

mod mapping;
mod record_repo;

/// Table name on the hosted backend.
const RECORDS_TABLE: &str = "exercise_results";

/// Repository backed by a PostgREST-style HTTP API (hosted Postgres).
///
/// All four operations map onto one table: `POST` to insert, `PATCH` filtered
/// by `id=eq.N` to overwrite, `GET` with `created_at` range filters for the
/// dashboard, and a filtered `DELETE` for the administrative wipe.
#[derive(Clone, Debug)]
pub struct RestRepository {
    client: reqwest::Client,
    records_url: Url,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RestInitError {
    #[error("invalid base url: {0}")]
    Url(#[from] url::ParseError),

    #[error("api key is not a valid header value")]
    ApiKey(#[from] InvalidHeaderValue),

    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

impl RestRepository {
    /// Build a client for the backend at `base_url`, authenticating every
    /// request with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns `RestInitError` if the URL does not parse, the key cannot be
    /// carried in a header, or the HTTP client cannot be constructed.
    pub fn connect(base_url: &str, api_key: &str) -> Result<Self, RestInitError> {
        let base = Url::parse(base_url)?;
        let records_url = base.join(&format!("rest/v1/{RECORDS_TABLE}"))?;

        let mut headers = HeaderMap::new();
        let mut key_value = HeaderValue::from_str(api_key)?;
        key_value.set_sensitive(true);
        headers.insert("apikey", key_value);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            records_url,
        })
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub(crate) fn records_url(&self) -> &Url {
        &self.records_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RestRepository>();
    }

    #[test]
    fn connect_builds_table_endpoint() {
        let repo = RestRepository::connect("https://project.example.co/", "anon-key").unwrap();
        assert_eq!(
            repo.records_url().as_str(),
            "https://project.example.co/rest/v1/exercise_results"
        );
    }

    #[test]
    fn connect_rejects_bad_url() {
        let err = RestRepository::connect("not a url", "anon-key").unwrap_err();
        assert!(matches!(err, RestInitError::Url(_)));
    }
}
