//! 요청 단위 취소 신호
//!
//! 호출 측은 `CancelHandle::cancel()`로 진행 중인 DB 작업을 중단시킬 수 있습니다.
//! 쓰기 작업이 취소되면 트랜잭션은 롤백됩니다.

use tokio::sync::watch;

/// 취소를 요청하는 쪽
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        // 수신자가 모두 사라졌으면 취소할 대상도 없음
        let _ = self.tx.send(true);
    }
}

/// 작업에 전달되는 취소 신호
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// 연결된 핸들/토큰 쌍 생성
    pub fn pair() -> (CancelHandle, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelToken { rx })
    }

    /// 절대 취소되지 않는 토큰
    pub fn never() -> Self {
        let (_, token) = Self::pair();
        token
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// 취소될 때까지 대기합니다. 핸들이 취소 없이 사라지면 영원히 대기합니다.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn never_token_should_not_complete() {
        let token = CancelToken::never();

        let result = timeout(Duration::from_millis(10), token.cancelled()).await;

        assert!(result.is_err(), "never token must keep waiting");
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn cancel_should_wake_waiter() {
        let (handle, token) = CancelToken::pair();
        let waiter = tokio::spawn({
            let token = token.clone();
            async move { token.cancelled().await }
        });

        handle.cancel();

        timeout(Duration::from_millis(100), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
        assert!(token.is_cancelled());
    }

    #[test]
    fn already_cancelled_token_should_return_immediately() {
        let (handle, token) = CancelToken::pair();
        handle.cancel();

        tokio_test::block_on(token.cancelled());
        assert!(token.is_cancelled());
    }
}
