//! 请求上下文：链路追踪ID + 截止时间

use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

/// 每个服务调用携带的上下文
///
/// 截止时间到达时，存储操作的 future 被丢弃，未提交的事务随之回滚
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub trace_id: String,
    pub deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            deadline: None,
        }
    }

    /// 后台任务/测试用：生成新的 trace_id
    pub fn background() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// 取上下文截止时间与服务默认超时中较早的一个
    pub fn effective_deadline(&self, default_timeout: Duration) -> Instant {
        let fallback = Instant::now() + default_timeout;
        match self.deadline {
            Some(deadline) => deadline.min(fallback),
            None => fallback,
        }
    }
}
