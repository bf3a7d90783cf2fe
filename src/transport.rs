//! HTTP transport abstraction used by `BitcoinService`

use crate::error::ServiceError;
use async_trait::async_trait;

/// Trait for fetching raw response bodies
///
/// Implementations issue a single GET and hand back the body bytes of a
/// successful response. They do no retrying and no caching.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Fetches the body at `url`
    ///
    /// # Returns
    /// The response body, or the transport or HTTP status error
    async fn get(&self, url: &str) -> Result<Vec<u8>, ServiceError>;

    /// Returns the name of this transport
    fn transport_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Canned reply for a URL
    #[derive(Debug, Clone)]
    pub enum MockReply {
        Body(Vec<u8>),
        Status(u16),
        Timeout,
    }

    /// Mock transport for testing
    #[derive(Default)]
    pub struct MockTransport {
        replies: Arc<Mutex<HashMap<String, MockReply>>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_body(&self, url: &str, body: &[u8]) {
            self.set_reply(url, MockReply::Body(body.to_vec()));
        }

        pub fn set_reply(&self, url: &str, reply: MockReply) {
            self.replies.lock().unwrap().insert(url.to_string(), reply);
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls_to(&self, url: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn get(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
            self.calls.lock().unwrap().push(url.to_string());
            let reply = self.replies.lock().unwrap().get(url).cloned();
            match reply {
                Some(MockReply::Body(body)) => Ok(body),
                Some(MockReply::Status(429)) => Err(ServiceError::RateLimitExceeded),
                Some(MockReply::Status(code)) => {
                    Err(ServiceError::ApiError(format!("HTTP {code}")))
                }
                Some(MockReply::Timeout) => Err(ServiceError::Timeout),
                None => Err(ServiceError::ApiError(format!("HTTP 404: {url}"))),
            }
        }

        fn transport_name(&self) -> &'static str {
            "mock"
        }
    }
}
