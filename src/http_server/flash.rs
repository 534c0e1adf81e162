//! One-shot messages carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar};

const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    fn as_str(self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        self.level.as_str()
    }

    /// Cookie value: percent-encoded `level:message`.
    fn encode(&self) -> String {
        urlencoding::encode(&format!("{}:{}", self.level.as_str(), self.message)).into_owned()
    }

    fn decode(raw: &str) -> Option<Self> {
        let decoded = urlencoding::decode(raw).ok()?;
        let (level, message) = decoded.split_once(':')?;
        let level = match level {
            "success" => FlashLevel::Success,
            "error" => FlashLevel::Error,
            _ => return None,
        };
        Some(Self {
            level,
            message: message.to_string(),
        })
    }
}

fn cookie(value: String) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .build()
}

/// Queue a message for the next rendered page.
pub fn push(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(cookie(flash.encode()))
}

/// Take the pending message, if any, and clear it.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(flash) = jar
        .get(FLASH_COOKIE)
        .map(|cookie| Flash::decode(cookie.value()))
    else {
        return (jar, None);
    };
    (jar.remove(cookie(String::new())), flash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_then_take() {
        let jar = push(
            CookieJar::new(),
            Flash::success("Venue The Musical Hop was successfully listed!"),
        );

        let (jar, flash) = take(jar);

        assert_eq!(
            flash,
            Some(Flash::success("Venue The Musical Hop was successfully listed!"))
        );
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn test_take_without_cookie() {
        let (_, flash) = take(CookieJar::new());
        assert_eq!(flash, None);
    }

    #[test]
    fn test_message_may_contain_separator() {
        let flash = Flash::error("An error occurred: venue 3 not found");
        assert_eq!(Flash::decode(&flash.encode()), Some(flash));
    }

    #[test]
    fn test_unknown_level_is_dropped() {
        assert_eq!(Flash::decode("warning%3Ahello"), None);
    }
}
