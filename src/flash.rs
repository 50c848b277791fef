//! One-time flash messages and the "current user" marker, carried in
//! signed cookies.

use axum_extra::extract::cookie::SignedCookieJar;
use cookie::{Cookie, SameSite};

const FLASH_COOKIE: &str = "flash";
const SESSION_COOKIE: &str = "session_user";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Level {
    Success,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
        }
    }

    fn parse(s: &str) -> Self {
        if s == "success" { Level::Success } else { Level::Error }
    }
}

#[derive(Clone, Debug)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: Level::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: Level::Error, message: message.into() }
    }
}

/// Queues a success message for the next rendered page.
pub fn push_success(jar: SignedCookieJar, message: impl Into<String>) -> SignedCookieJar {
    push(jar, Flash::success(message))
}

/// Queues an error message for the next rendered page.
pub fn push_error(jar: SignedCookieJar, message: impl Into<String>) -> SignedCookieJar {
    push(jar, Flash::error(message))
}

fn push(jar: SignedCookieJar, flash: Flash) -> SignedCookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, format!("{}|{}", flash.level.as_str(), flash.message)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Reads and consumes the pending flash message, if any.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = cookie.value().split_once('|').map(|(level, message)| Flash {
        level: Level::parse(level),
        message: message.to_string(),
    });
    (jar.remove(removal(FLASH_COOKIE)), flash)
}

pub fn remember_user(jar: SignedCookieJar, user_id: i32) -> SignedCookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, user_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(30))
        .build();
    jar.add(cookie)
}

pub fn remembered_user(jar: &SignedCookieJar) -> Option<i32> {
    jar.get(SESSION_COOKIE).and_then(|c| c.value().parse().ok())
}

pub fn forget_user(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(removal(SESSION_COOKIE))
}

fn removal(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::from(name);
    cookie.set_path("/");
    cookie
}
