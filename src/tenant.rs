//! 테넌트(사용자) 컨텍스트
//!
//! 모든 소유 데이터는 인증된 사용자 ID로 격리됩니다. 사용자 ID는 요청마다 한 번
//! `IdentityProvider`에서 해석되어 `TenantContext`로 명시적으로 전달되며,
//! 요청 페이로드에서 받은 값으로는 만들 수 없습니다.

use std::fmt;

use async_trait::async_trait;

use crate::utils::{AppError, CancelToken};

/// 인증 정보 제공자 (외부 구성요소)
///
/// 로그인 세션/토큰에서 현재 사용자 ID를 꺼내 줍니다. 코어는 이 값을 그대로 신뢰합니다.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user_id(&self) -> Option<String>;
}

/// 검증된 테넌트 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    /// 제공자가 준 값을 그대로 사용합니다. 공백뿐인 값만 거부하며 정규화하지 않습니다.
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 요청 단위 컨텍스트 (테넌트 ID + 취소 신호)
#[derive(Debug, Clone)]
pub struct TenantContext {
    tenant_id: TenantId,
    cancel: CancelToken,
}

impl TenantContext {
    /// 인증 정보에서 테넌트를 해석합니다.
    pub async fn resolve<P>(provider: &P) -> Result<Self, AppError>
    where
        P: IdentityProvider + ?Sized,
    {
        let user_id = provider
            .current_user_id()
            .await
            .ok_or_else(|| AppError::unauthorized("로그인이 필요합니다."))?;

        let tenant_id = TenantId::parse(&user_id)
            .ok_or_else(|| AppError::unauthorized("유효하지 않은 사용자 ID입니다."))?;

        Ok(Self {
            tenant_id,
            cancel: CancelToken::never(),
        })
    }

    /// 취소 신호 연결
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn cancel(&self) -> &CancelToken {
        &self.cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedIdentity(Option<&'static str>);

    #[async_trait]
    impl IdentityProvider for FixedIdentity {
        async fn current_user_id(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[tokio::test]
    async fn should_resolve_authenticated_user() {
        let ctx = TenantContext::resolve(&FixedIdentity(Some("user-1")))
            .await
            .unwrap();

        assert_eq!(ctx.tenant_id().as_str(), "user-1");
        assert!(!ctx.cancel().is_cancelled());
    }

    #[tokio::test]
    async fn should_keep_user_id_verbatim() {
        let padded = TenantContext::resolve(&FixedIdentity(Some(" user-1")))
            .await
            .unwrap();
        let plain = TenantContext::resolve(&FixedIdentity(Some("user-1")))
            .await
            .unwrap();

        assert_eq!(padded.tenant_id().as_str(), " user-1");
        assert_ne!(padded.tenant_id(), plain.tenant_id());
    }

    #[tokio::test]
    async fn should_reject_anonymous_caller() {
        let result = TenantContext::resolve(&FixedIdentity(None)).await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn should_reject_blank_user_id() {
        let result = TenantContext::resolve(&FixedIdentity(Some("   "))).await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn with_cancel_should_replace_token() {
        let (handle, token) = CancelToken::pair();
        let ctx = TenantContext::resolve(&FixedIdentity(Some("user-1")))
            .await
            .unwrap()
            .with_cancel(token);

        handle.cancel();

        assert!(ctx.cancel().is_cancelled());
    }
}
