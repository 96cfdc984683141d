//! Guess submission to the remote coordinate checker

use std::{sync::Arc, time::Duration};

use geocheck_types::Point;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::blocking::Client;
use tracing::debug;

use crate::captcha::{CaptchaError, CaptchaTable};

const GUESS_PAGE: &str = "geo_inputchkcoord.php";
const CHECK_PAGE: &str = "geo_chkcoord.php";

const RATE_LIMIT_MARKER: &str = "You have exceeded the limit of 10 attempts in 10 minutes";
const ACCEPTED_MARKER: &str = "your solution is correct";

lazy_static! {
    static ref RE_CAPTCHA_HASH: Regex = Regex::new(r"validateChkCoordsForm\(this,'([0-9a-z]+)'\)")
        .expect("Captcha hash regex is valid");
}

/// What the remote side said about a single guess
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The point is the solution
    Accepted,
    /// The point is not the solution
    Rejected,
    /// No more attempts from this network identity for a while
    RateLimited,
}

/// Failure to get a definite verdict
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Transport failure or timeout
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    /// The guess page answered with a non-success status and that body
    #[error("unexpected status when requesting the guess page: {0}: {1}")]
    UnexpectedStatus(reqwest::StatusCode, String),
    /// No captcha digest on the guess page
    #[error("guess page does not contain a captcha")]
    CaptchaMissing,
    /// The captcha digest cannot be reversed
    #[error(transparent)]
    Captcha(#[from] CaptchaError),
}

/// Anything that can tell whether a point is the solution
pub trait Checker {
    /// Submit a single guess.
    ///
    /// # Errors
    /// The remote side cannot be reached or answers unexpectedly.
    fn check(&mut self, point: &Point) -> Result<Verdict, CheckError>;
}

/// Does the guess page refuse any more attempts?
pub fn is_rate_limited(page: &str) -> bool {
    page.contains(RATE_LIMIT_MARKER)
}

/// The captcha digest passed to the form validation script
pub fn extract_captcha_hash(page: &str) -> Option<&str> {
    RE_CAPTCHA_HASH
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|hash| hash.as_str())
}

/// Does the check page report the correct solution?
pub fn is_accepted(page: &str) -> bool {
    page.contains(ACCEPTED_MARKER)
}

/// The puzzle the guesses are submitted for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    /// Checker's own identifier of the puzzle
    pub gid: String,
    /// Geocache name as the checker shows it
    pub cache_name: String,
    /// Geocache code, e.g. `GC12345`
    pub gc_code: String,
}

impl Puzzle {
    /// The form fields for a guess
    pub fn form(&self, point: &Point, captcha: &str) -> [(&'static str, String); 5] {
        [
            ("gid", self.gid.clone()),
            ("cachename", self.cache_name.clone()),
            ("gccode", self.gc_code.clone()),
            ("coordOneField", point.to_compact()),
            ("usercaptcha", captcha.to_string()),
        ]
    }
}

/// Blocking HTTP client of the checker site.
///
/// Every guess starts a fresh cookie session: the captcha is tied to it.
#[derive(Debug)]
pub struct GeocheckClient {
    base_url: String,
    timeout: Duration,
    user_agent: String,
    puzzle: Puzzle,
    captcha: Arc<CaptchaTable>,
}

impl GeocheckClient {
    /// Client of the checker at `base_url` submitting the guesses for the `puzzle`
    pub fn new(
        base_url: &str,
        timeout: Duration,
        user_agent: &str,
        puzzle: Puzzle,
        captcha: Arc<CaptchaTable>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            user_agent: user_agent.to_string(),
            puzzle,
            captcha,
        }
    }

    fn session(&self) -> Result<Client, CheckError> {
        Ok(Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?)
    }

    fn guess_page(&self, session: &Client) -> Result<String, CheckError> {
        let url = format!("{}/{GUESS_PAGE}", self.base_url);
        let res = session
            .get(url)
            .query(&[("gid", self.puzzle.gid.as_str())])
            .send()?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text()?;
            return Err(CheckError::UnexpectedStatus(status, body));
        }
        Ok(res.text()?)
    }
}

impl Checker for GeocheckClient {
    fn check(&mut self, point: &Point) -> Result<Verdict, CheckError> {
        let session = self.session()?;
        let page = self.guess_page(&session)?;
        if is_rate_limited(&page) {
            return Ok(Verdict::RateLimited);
        }

        let hash = extract_captcha_hash(&page).ok_or(CheckError::CaptchaMissing)?;
        let captcha = self.captcha.resolve(hash)?;
        debug!(hash, captcha, "Captcha resolved");

        let url = format!("{}/{CHECK_PAGE}", self.base_url);
        let answer = session
            .post(url)
            .form(&self.puzzle.form(point, captcha))
            .send()?
            .text()?;

        if is_accepted(&answer) {
            debug!(point = %point, "Check page accepted the guess");
            Ok(Verdict::Accepted)
        } else {
            debug!(point = %point, "Check page rejected the guess");
            Ok(Verdict::Rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUESS_PAGE_HTML: &str = r#"<form name="chkcoords" method="post"
        onsubmit="return validateChkCoordsForm(this,'827ccb0eea8a706c4c34a16891f84e7b')">
        <input type="text" name="usercaptcha"></form>"#;

    #[test]
    fn captcha_hash_from_page() {
        assert_eq!(
            extract_captcha_hash(GUESS_PAGE_HTML),
            Some("827ccb0eea8a706c4c34a16891f84e7b")
        );
    }

    #[test]
    fn page_without_captcha() {
        assert_eq!(extract_captcha_hash("<html></html>"), None);
        assert_eq!(
            extract_captcha_hash("validateChkCoordsForm(this,'')"),
            None
        );
    }

    #[test]
    fn rate_limit_marker() {
        assert!(is_rate_limited(
            "<p>Sorry! You have exceeded the limit of 10 attempts in 10 minutes.</p>"
        ));
        assert!(!is_rate_limited(GUESS_PAGE_HTML));
    }

    #[test]
    fn accepted_marker() {
        assert!(is_accepted("Congratulations, your solution is correct!"));
        assert!(!is_accepted("Sorry, your solution is incorrect."));
    }

    #[test]
    fn resolved_page_captcha() {
        let table = CaptchaTable::build();
        let hash = extract_captcha_hash(GUESS_PAGE_HTML).unwrap();
        assert_eq!(table.resolve(hash), Ok("12345"));
    }

    #[test]
    fn form_fields() {
        let puzzle = Puzzle {
            gid: "abc-123".to_string(),
            cache_name: "Hairpin".to_string(),
            gc_code: "GC12345".to_string(),
        };
        let point: Point = "S41 16.814 E173 14.980".parse().unwrap();
        let form = puzzle.form(&point, "00042");

        assert_eq!(
            form,
            [
                ("gid", "abc-123".to_string()),
                ("cachename", "Hairpin".to_string()),
                ("gccode", "GC12345".to_string()),
                ("coordOneField", "S4116814E17314980".to_string()),
                ("usercaptcha", "00042".to_string()),
            ]
        );
    }

    #[test]
    fn base_url_without_trailing_slash() {
        let client = GeocheckClient::new(
            "https://checker.example/",
            Duration::from_secs(5),
            "test",
            Puzzle {
                gid: String::new(),
                cache_name: String::new(),
                gc_code: String::new(),
            },
            Arc::new(CaptchaTable::build()),
        );
        assert_eq!(client.base_url, "https://checker.example");
    }
}
