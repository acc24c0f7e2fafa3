use std::fs;
use wiremock::{Match, Request};

/// # Panics
///
/// Will panic if a file can't be read or missing
#[must_use = "This function returns the body of the file as a string"]
pub fn body_from_file(path: &str) -> String {
    fs::read_to_string(path).expect("Failed to read file")
}

pub struct FormParamExactMatcher(String, String);

impl FormParamExactMatcher {
    /// Specify the expected value for a form parameter.
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        let key = key.into();
        let value = value.into();
        Self(key, value)
    }
}

/// Shorthand for [`FormParamExactMatcher::new`].
pub fn form_param<K, V>(key: K, value: V) -> FormParamExactMatcher
where
    K: Into<String>,
    V: Into<String>,
{
    FormParamExactMatcher::new(key, value)
}

impl Match for FormParamExactMatcher {
    fn matches(&self, request: &Request) -> bool {
        form_urlencoded::parse(&request.body)
            .any(|q| q.0 == self.0.as_str() && q.1 == self.1.as_str())
    }
}

/// Matches a text field of a `multipart/form-data` body
pub struct MultipartFieldMatcher(Vec<u8>);

/// Shorthand for a [`MultipartFieldMatcher`] on `key` with `value`.
pub fn multipart_field(key: &str, value: &str) -> MultipartFieldMatcher {
    MultipartFieldMatcher(format!("name=\"{key}\"\r\n\r\n{value}\r\n").into_bytes())
}

/// Matches a file part of a `multipart/form-data` body by file name and content
pub fn multipart_file(key: &str, file_name: &str, content: &str) -> MultipartFieldMatcher {
    MultipartFieldMatcher(
        format!(
            "name=\"{key}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n"
        )
        .into_bytes(),
    )
}

impl Match for MultipartFieldMatcher {
    fn matches(&self, request: &Request) -> bool {
        request
            .body
            .windows(self.0.len())
            .any(|window| window == self.0.as_slice())
    }
}
