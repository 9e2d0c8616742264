pub mod client;
pub mod json;
pub mod prompts;

pub use client::*;

#[cfg(test)]
pub mod testing {
    use super::client::{GatewayError, TextGenerator};

    /// Scripted gateway for tests: each entry pairs a substring of the system
    /// prompt with the canned response to return.
    pub struct StubGateway {
        scripted: Vec<(&'static str, String)>,
    }

    impl StubGateway {
        pub fn new(scripted: Vec<(&'static str, &str)>) -> Self {
            Self {
                scripted: scripted
                    .into_iter()
                    .map(|(key, response)| (key, response.to_string()))
                    .collect(),
            }
        }

        /// A gateway that answers every call with the same text.
        pub fn fixed(response: &str) -> Self {
            Self::new(vec![("", response)])
        }
    }

    impl TextGenerator for StubGateway {
        async fn generate(&self, system: &str, _user: &str) -> Result<String, GatewayError> {
            self.scripted
                .iter()
                .find(|(key, _)| system.contains(key))
                .map(|(_, response)| response.clone())
                .ok_or(GatewayError::EmptyResponse { provider: "stub" })
        }
    }
}
