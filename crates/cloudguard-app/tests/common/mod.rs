//! Shared fixtures for app integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use cloudguard_analysis::{AnalysisClient, ModelTransport, ModelTransportError};
use cloudguard_auth::{AuthContext, UserProfile};
use cloudguard_ingest::{StagedUpload, stage_upload};

/// Canned transport behavior for one scripted round trip.
#[allow(dead_code)]
pub enum ScriptedReply {
    /// Return this text as the raw model reply.
    Text(String),
    /// Fail with a transport timeout.
    Timeout,
    /// Fail with this HTTP status.
    Status(u16),
}

/// Transport that counts calls and replays a scripted outcome.
pub struct ScriptedTransport {
    pub calls: AtomicU32,
    pub reply: ScriptedReply,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            reply: ScriptedReply::Text(text.to_string()),
        })
    }

    pub fn timing_out() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            reply: ScriptedReply::Timeout,
        })
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ModelTransport for ScriptedTransport {
    fn complete(&self, _endpoint: &str, _instruction: &str) -> Result<String, ModelTransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            ScriptedReply::Text(text) => Ok(text.clone()),
            ScriptedReply::Timeout => Err(ModelTransportError::Timeout),
            ScriptedReply::Status(code) => Err(ModelTransportError::Status(*code)),
        }
    }
}

/// Builds a client over the scripted transport.
#[allow(dead_code)]
pub fn fixture_client(transport: Arc<ScriptedTransport>) -> AnalysisClient {
    AnalysisClient::new("https://model.cloudguard.test/v1/generate", transport)
        .expect("fixture client should build")
}

/// Creates a deterministic staged CSV upload.
#[allow(dead_code)]
pub fn fixture_upload() -> StagedUpload {
    stage_upload(
        "access.csv",
        "text/csv",
        b"2024-01-01 ERROR failed login from 10.0.0.5 x12".to_vec(),
    )
    .expect("upload fixture should stage")
}

/// Creates a signed-in context for `uid-test`.
#[allow(dead_code)]
pub fn fixture_context() -> AuthContext {
    AuthContext {
        user: UserProfile {
            uid: "uid-test".to_string(),
            email: "analyst@cloudguard.test".to_string(),
            display_name: Some("Analyst".to_string()),
            avatar_url: None,
        },
    }
}
