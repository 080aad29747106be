//! API-key authentication for the directory endpoints.
//!
//! Clients present the shared key in the `X-API-Key` header. The check
//! is an extractor, so protected handlers opt in by taking a
//! [`RequireApiKey`] argument and unprotected ones (health probes)
//! simply do not.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};

use crate::domain::Error;

/// Header carrying the shared API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Whether and how requests must authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyPolicy {
    /// Accept every request; used for local development.
    Disabled,
    /// Require the `X-API-Key` header to equal the configured key.
    Required {
        /// The shared secret clients must present.
        key: String,
    },
}

impl ApiKeyPolicy {
    /// Policy that accepts every request.
    #[must_use]
    pub fn disabled() -> Self {
        Self::Disabled
    }

    /// Policy that requires the given key.
    #[must_use]
    pub fn required(key: impl Into<String>) -> Self {
        Self::Required { key: key.into() }
    }

    /// Resolve the policy from the `API_KEY_ENABLED` flag and `API_KEY`
    /// value. Enforcement needs both the flag and a non-blank key.
    #[must_use]
    pub fn resolve(enabled: bool, key: Option<String>) -> Self {
        if !enabled {
            return Self::Disabled;
        }
        match key {
            Some(key) if !key.trim().is_empty() => Self::Required { key },
            _ => Self::Disabled,
        }
    }

    fn check(&self, request: &HttpRequest) -> Result<(), Error> {
        let Self::Required { key } = self else {
            return Ok(());
        };
        let presented = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        match presented {
            Some(presented) if presented == key => Ok(()),
            Some(_) => Err(Error::unauthorized("invalid API key")),
            None => Err(Error::unauthorized("missing API key")),
        }
    }
}

/// Extractor that enforces the configured [`ApiKeyPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct RequireApiKey;

impl FromRequest for RequireApiKey {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(request: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // A missing policy means the server was wired without one, which
        // only happens in tests; treat it as disabled.
        let outcome = request
            .app_data::<web::Data<ApiKeyPolicy>>()
            .map_or(Ok(()), |policy| policy.check(request));
        ready(outcome.map(|()| Self))
    }
}
