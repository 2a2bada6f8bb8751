//! Twilio REST backend.
//!
//! This module provides the [`RestBackend`] implementation for managing
//! applications through the 2010-04-01 Accounts API:
//!
//! | Call   | Request                                                  |
//! |--------|----------------------------------------------------------|
//! | create | `POST   /2010-04-01/Accounts/{Account}/Applications.json`       |
//! | update | `POST   /2010-04-01/Accounts/{Account}/Applications/{Sid}.json` |
//! | remove | `DELETE /2010-04-01/Accounts/{Account}/Applications/{Sid}.json` |

use crate::error::{Error, Result};
use crate::types::{Application, ApplicationParams, Credentials};
use declarative::Provider;
use std::time::Duration;
use ureq::Body;
use ureq::http::Response;

/// Default Twilio API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Path segment for the API version this backend speaks.
const API_VERSION: &str = "2010-04-01";

/// Global timeout for a single request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Twilio REST backend.
///
/// # Example
///
/// ```no_run
/// use declarative::Provider;
/// use twiliokit::{ApplicationParams, Credentials, RestBackend};
///
/// let backend = RestBackend::new(Credentials::from_env().unwrap());
/// let app = backend
///     .create(&ApplicationParams {
///         friendly_name: Some("Support line".to_string()),
///         ..ApplicationParams::default()
///     })
///     .unwrap();
/// println!("Created {}", app.sid);
/// ```
pub struct RestBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Twilio API base URL.
    api_base: String,
    /// Account and auth pair.
    credentials: Credentials,
}

impl RestBackend {
    /// Create a backend against the public Twilio API.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self::with_api_base(credentials, DEFAULT_API_BASE)
    }

    /// Create a backend with a custom API base (for testing or proxies).
    #[must_use]
    pub fn with_api_base(credentials: Credentials, api_base: impl Into<String>) -> Self {
        // Error statuses are decoded from the body instead of surfacing as ureq errors
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self {
            agent,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Get the current API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build the collection URL.
    fn applications_url(&self) -> String {
        format!(
            "{}/{}/Accounts/{}/Applications.json",
            self.api_base,
            API_VERSION,
            self.credentials.account_sid()
        )
    }

    /// Build the URL of one application.
    fn application_url(&self, sid: &str) -> String {
        format!(
            "{}/{}/Accounts/{}/Applications/{}.json",
            self.api_base,
            API_VERSION,
            self.credentials.account_sid(),
            sid
        )
    }

    /// POST the field set and decode the returned application.
    fn post(&self, url: &str, params: &ApplicationParams) -> Result<Application> {
        log::debug!("POST {url}");
        let response = self
            .agent
            .post(url)
            .header("Authorization", self.credentials.basic_auth().as_str())
            .header("Accept", "application/json")
            .send_form(params.form_pairs())?;

        let (status, body) = read_body(response)?;
        if !(200..300).contains(&status) {
            return Err(Error::from_response(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Split a response into status code and body text.
fn read_body(mut response: Response<Body>) -> Result<(u16, String)> {
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string()?;
    Ok((status, body))
}

impl Provider for RestBackend {
    type Fields = ApplicationParams;
    type Resource = Application;
    type Error = Error;

    fn create(&self, fields: &ApplicationParams) -> Result<Application> {
        self.post(&self.applications_url(), fields)
    }

    fn update(&self, id: &str, fields: &ApplicationParams) -> Result<Application> {
        self.post(&self.application_url(id), fields)
    }

    fn remove(&self, id: &str) -> Result<()> {
        let url = self.application_url(id);
        log::debug!("DELETE {url}");
        let response = self
            .agent
            .delete(&url)
            .header("Authorization", self.credentials.basic_auth().as_str())
            .header("Accept", "application/json")
            .call()?;

        let (status, body) = read_body(response)?;
        if !(200..300).contains(&status) {
            return Err(Error::from_response(status, &body));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    fn backend() -> RestBackend {
        RestBackend::with_api_base(Credentials::new("ACaaaa", "token"), "http://localhost:1/")
    }

    #[test]
    fn test_default_api_base() {
        let backend = RestBackend::new(Credentials::new("ACaaaa", "token"));
        assert_eq!(backend.api_base(), "https://api.twilio.com");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(backend().api_base(), "http://localhost:1");
    }

    #[test]
    fn test_applications_url() {
        assert_eq!(
            backend().applications_url(),
            "http://localhost:1/2010-04-01/Accounts/ACaaaa/Applications.json"
        );
    }

    #[test]
    fn test_application_url() {
        assert_eq!(
            backend().application_url("APbbbb"),
            "http://localhost:1/2010-04-01/Accounts/ACaaaa/Applications/APbbbb.json"
        );
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        let err = backend().remove("APbbbb").unwrap_err();
        assert_eq!(err.category(), crate::ErrorCategory::Network);
    }

    /// Answer a single request with `status` and `body`, handing back the raw request
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                let end_of_head = line == "\r\n";
                request.push_str(&line);
                if end_of_head {
                    break;
                }
            }
            let mut form = vec![0; content_length];
            reader.read_exact(&mut form).unwrap();
            request.push_str(&String::from_utf8(form).unwrap());

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });

        (format!("http://{address}"), handle)
    }

    /// Value of a request header, matching the name case-insensitively
    fn header<'a>(request: &'a str, name: &str) -> Option<&'a str> {
        request.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    fn body(request: &str) -> &str {
        request.split_once("\r\n\r\n").map_or("", |(_, b)| b)
    }

    fn stub_backend(base: &str) -> RestBackend {
        RestBackend::with_api_base(Credentials::new("ACaaaa", "token"), base)
    }

    const CREATED: &str = r#"{"sid": "AP1", "account_sid": "ACaaaa", "friendly_name": "hi there", "voice_caller_id_lookup": true, "date_created": "Thu, 01 Jan 2026 00:00:00 +0000"}"#;

    #[test]
    fn test_create_posts_form_with_basic_auth() {
        let (base, server) = serve_once("201 Created", CREATED);
        let params = ApplicationParams {
            friendly_name: Some("hi there".into()),
            voice_caller_id_lookup: Some(true),
            ..ApplicationParams::default()
        };

        let app = stub_backend(&base).create(&params).unwrap();
        let request = server.join().unwrap();

        assert!(request.starts_with("POST /2010-04-01/Accounts/ACaaaa/Applications.json "));
        assert_eq!(header(&request, "authorization"), Some("Basic QUNhYWFhOnRva2Vu"));
        assert_eq!(
            header(&request, "content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(body(&request), "FriendlyName=hi+there&VoiceCallerIdLookup=true");

        assert_eq!(app.sid, "AP1");
        assert_eq!(app.account_sid.as_deref(), Some("ACaaaa"));
        assert_eq!(app.params(), params);
    }

    #[test]
    fn test_update_posts_to_application_url() {
        let (base, server) = serve_once("200 OK", CREATED);
        let params = ApplicationParams {
            friendly_name: Some("hi there".into()),
            ..ApplicationParams::default()
        };

        let app = stub_backend(&base).update("AP1", &params).unwrap();
        let request = server.join().unwrap();

        assert!(request.starts_with("POST /2010-04-01/Accounts/ACaaaa/Applications/AP1.json "));
        assert_eq!(body(&request), "FriendlyName=hi+there");
        assert_eq!(app.sid, "AP1");
    }

    #[test]
    fn test_remove_accepts_empty_no_content() {
        let (base, server) = serve_once("204 No Content", "");

        stub_backend(&base).remove("AP1").unwrap();
        let request = server.join().unwrap();

        assert!(request.starts_with("DELETE /2010-04-01/Accounts/ACaaaa/Applications/AP1.json "));
        assert_eq!(header(&request, "authorization"), Some("Basic QUNhYWFhOnRva2Vu"));
    }

    #[test]
    fn test_error_document_becomes_api_error() {
        let (base, server) = serve_once(
            "404 Not Found",
            r#"{"code": 20404, "message": "The requested resource was not found", "more_info": "https://www.twilio.com/docs/errors/20404", "status": 404}"#,
        );

        let err = stub_backend(&base).remove("AP1").unwrap_err();
        server.join().unwrap();

        match &err {
            Error::Api { status, code, .. } => {
                assert_eq!(*status, 404);
                assert_eq!(*code, Some(20404));
            }
            other => panic!("Expected Error::Api, got {other:?}"),
        }
        assert_eq!(err.category(), crate::ErrorCategory::NotFound);
    }

    #[test]
    fn test_malformed_success_body_is_invalid_response() {
        let (base, server) = serve_once("201 Created", "not json");

        let err = stub_backend(&base)
            .create(&ApplicationParams::default())
            .unwrap_err();
        server.join().unwrap();

        assert_eq!(err.category(), crate::ErrorCategory::Format);
    }
}
