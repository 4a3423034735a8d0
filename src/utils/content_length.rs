//! Content length helpers for HTTP responses.

use reqwest::header::CONTENT_RANGE;
use reqwest::Response;

/// Total size of the resource served by `response`, when the server tells us.
///
/// A `Content-Range` total wins over `Content-Length`, since the latter only
/// describes the returned slice on partial responses.
pub fn total_size(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_content_range_total)
        .or_else(|| response.content_length())
}

/// Extracts the total from a `Content-Range` header such as `bytes 0-0/2048`.
pub fn parse_content_range_total(content_range: &str) -> Option<u64> {
    content_range
        .split('/')
        .nth(1)
        .and_then(|size| size.trim().parse::<u64>().ok())
}
