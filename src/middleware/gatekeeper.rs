//! Request filter run ahead of every handler.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::{error::AppError, state::AppState, token::AUTH_COOKIE};

const LOGIN_PAGE: &str = "/login";
const DASHBOARD_PAGE: &str = "/dashboard";
const PUBLIC_PREFIXES: [&str; 2] = [LOGIN_PAGE, "/api/auth/login"];
const OPERATIONAL_PREFIXES: [&str; 2] = ["/health", "/docs"];
const STATIC_PREFIXES: [&str; 3] = ["/static", "/assets", "/favicon"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Missing,
    Invalid,
    Valid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Pass,
    Redirect(&'static str),
    Reject(&'static str),
}

pub fn decide(path: &str, session: Session) -> Decision {
    if PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p)) {
        if path == LOGIN_PAGE && session == Session::Valid {
            return Decision::Redirect(DASHBOARD_PAGE);
        }
        return Decision::Pass;
    }

    if OPERATIONAL_PREFIXES.iter().any(|p| path.starts_with(p)) || is_static_asset(path) {
        return Decision::Pass;
    }

    let is_api = path.starts_with("/api/");
    match (session, is_api) {
        (Session::Valid, _) => Decision::Pass,
        (Session::Missing, true) => Decision::Reject("Unauthorized"),
        (Session::Invalid, true) => Decision::Reject("Invalid token"),
        (_, false) => Decision::Redirect(LOGIN_PAGE),
    }
}

fn is_static_asset(path: &str) -> bool {
    STATIC_PREFIXES.iter().any(|p| path.starts_with(p)) || path.contains('.')
}

pub async fn gatekeeper(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let session = match jar.get(AUTH_COOKIE) {
        None => Session::Missing,
        Some(cookie) if state.tokens.verify(cookie.value()).is_some() => Session::Valid,
        Some(_) => Session::Invalid,
    };

    match decide(request.uri().path(), session) {
        Decision::Pass => next.run(request).await,
        Decision::Redirect(to) => Redirect::temporary(to).into_response(),
        Decision::Reject(message) => {
            tracing::debug!(path = %request.uri().path(), "rejected unauthenticated request");
            AppError::Unauthorized(message.into()).into_response()
        }
    }
}
