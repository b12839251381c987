//! `ClientInfo` extractor — request metadata recorded with issued tokens.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use keyfort_entity::token::ClientMeta;

/// Client IP and User-Agent taken from request headers.
///
/// The IP is the head of the `x-forwarded-for` chain, falling back to
/// `x-real-ip`. Audit metadata only; never used for authorization.
#[derive(Debug, Clone)]
pub struct ClientInfo(pub ClientMeta);

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = header_str(parts, "x-forwarded-for")
            .and_then(|chain| chain.split(',').next())
            .map(|ip| ip.trim().to_string())
            .filter(|ip| !ip.is_empty())
            .or_else(|| header_str(parts, "x-real-ip").map(String::from));

        let user_agent = header_str(parts, "user-agent").map(String::from);

        Ok(ClientInfo(ClientMeta { ip, user_agent }))
    }
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}
