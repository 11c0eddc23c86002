use std::sync::Arc;

use elysia_auth::TokenService;
use elysia_cache::VerificationCodeStore;
use elysia_config::{CorsConfig, SmsConfig, VerificationConfig};

use crate::sms::SmsSender;
use crate::stores::{
    AdminStore, ApprovalStore, ClassStore, ProblemStore, Store, StudentStore, SubjectStore,
    TeacherStore,
};

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub students: Arc<dyn StudentStore>,
    pub teachers: Arc<dyn TeacherStore>,
    pub approvals: Arc<dyn ApprovalStore>,
    pub admins: Arc<dyn AdminStore>,
    pub classes: Arc<dyn ClassStore>,
    pub subjects: Arc<dyn SubjectStore>,
    pub problems: Arc<dyn ProblemStore>,
    pub codes: Arc<dyn VerificationCodeStore>,
    pub sms: Arc<dyn SmsSender>,
    pub tokens: TokenService,
    pub sms_config: SmsConfig,
    pub verification_config: VerificationConfig,
    pub cors_config: CorsConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tokens", &self.tokens)
            .field("sms_config", &self.sms_config)
            .field("verification_config", &self.verification_config)
            .field("cors_config", &self.cors_config)
            .finish_non_exhaustive()
    }
}

pub struct AppStateBuilder {
    pub codes: Arc<dyn VerificationCodeStore>,
    pub sms: Arc<dyn SmsSender>,
    pub tokens: TokenService,
    pub sms_config: SmsConfig,
    pub verification_config: VerificationConfig,
    pub cors_config: CorsConfig,
}

impl AppStateBuilder {
    /// Wires every store handle to the same backend.
    pub fn build<S: Store>(self, store: Arc<S>) -> AppState {
        AppState {
            students: store.clone(),
            teachers: store.clone(),
            approvals: store.clone(),
            admins: store.clone(),
            classes: store.clone(),
            subjects: store.clone(),
            problems: store,
            codes: self.codes,
            sms: self.sms,
            tokens: self.tokens,
            sms_config: self.sms_config,
            verification_config: self.verification_config,
            cors_config: self.cors_config,
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl AppState {
    /// State backed entirely by in-process stores, for tests.
    pub fn in_memory(
        jwt_config: elysia_config::JwtConfig,
        sms_config: SmsConfig,
        sms: Arc<dyn SmsSender>,
    ) -> Self {
        use elysia_auth::MemoryDenylist;
        use elysia_cache::MemoryVerificationCodeStore;

        use crate::stores::memory::MemoryStore;

        AppStateBuilder {
            codes: Arc::new(MemoryVerificationCodeStore::new()),
            sms,
            tokens: TokenService::new(jwt_config, Arc::new(MemoryDenylist::new())),
            sms_config,
            verification_config: VerificationConfig::default(),
            cors_config: CorsConfig::from_list("http://localhost:3000"),
        }
        .build(Arc::new(MemoryStore::new()))
    }
}
