use std::time::Duration;
use tokio::time::Instant;

/// 固定窗口限流器
///
/// 窗口从第一次检查开始计时，距窗口起点满 `window` 后计数清零并重新开窗。
/// 时间取自 `tokio::time`，测试中可以用暂停的时钟模拟。
#[derive(Debug)]
pub struct RateLimiter {
    window_start: Instant,
    count: u32,
    window: Duration,
    max_actions: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_actions: u32) -> Self {
        RateLimiter {
            window_start: Instant::now(),
            count: 0,
            window,
            max_actions,
        }
    }

    /// 尝试占用一个名额
    pub fn check(&mut self) -> bool {
        self.check_at(Instant::now())
    }

    pub fn check_at(&mut self, now: Instant) -> bool {
        if now.duration_since(self.window_start) >= self.window {
            self.count = 0;
            self.window_start = now;
        }

        if self.count >= self.max_actions {
            false
        } else {
            self.count += 1;
            true
        }
    }

    /// 当前窗口已用名额
    pub fn used(&self) -> u32 {
        self.count
    }

    /// 当前窗口剩余时间
    pub fn time_until_reset(&self) -> Duration {
        self.window
            .saturating_sub(Instant::now().duration_since(self.window_start))
    }
}
