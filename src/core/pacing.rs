use crate::domain::ports::Pacer;
use async_trait::async_trait;
use std::time::Duration;

/// 每次固定等待，避免觸發上游限流
#[derive(Debug, Clone, Copy)]
pub struct FixedPacer {
    interval: Duration,
}

impl FixedPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedPacer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl Pacer for FixedPacer {
    async fn pause(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

/// 不等待
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacer;

#[async_trait]
impl Pacer for NoPacer {
    async fn pause(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_pacer_sleeps_for_interval() {
        let pacer = FixedPacer::default();
        let start = tokio::time::Instant::now();
        pacer.pause().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_zero_interval_returns_immediately() {
        let pacer = FixedPacer::new(Duration::ZERO);
        let start = Instant::now();
        pacer.pause().await;
        NoPacer.pause().await;
        assert!(start.elapsed() < Duration::from_millis(500));
    }
}
