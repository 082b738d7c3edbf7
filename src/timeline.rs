use std::collections::BTreeMap;
use std::time::Duration;

/// 固定延迟、不可取消的延后任务队列
///
/// 不读取系统时钟，时间只随 `advance` 前进。同一时刻到期的任务按登记顺序执行。
#[derive(Debug, Clone)]
pub struct Timeline<E> {
    now: Duration,
    seq: u64,
    pending: BTreeMap<(Duration, u64), E>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            pending: BTreeMap::new(),
        }
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, effect: E) {
        let due = self.now + delay;
        self.pending.insert((due, self.seq), effect);
        self.seq += 1;
    }

    /// 取出 `until` 之前最早到期的任务，并把当前时间推进到它的到期时刻
    pub fn pop_due(&mut self, until: Duration) -> Option<E> {
        let key = *self.pending.keys().next()?;
        if key.0 > until {
            return None;
        }
        let effect = self.pending.remove(&key)?;
        self.now = self.now.max(key.0);
        Some(effect)
    }

    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_in_due_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(Duration::from_millis(300), "late");
        timeline.schedule(Duration::from_millis(10), "early");
        timeline.schedule(Duration::from_millis(10), "early-second");

        let until = Duration::from_millis(100);
        assert_eq!(timeline.pop_due(until), Some("early"));
        assert_eq!(timeline.pop_due(until), Some("early-second"));
        assert_eq!(timeline.now(), Duration::from_millis(10));
        assert_eq!(timeline.pop_due(until), None);
        assert_eq!(timeline.pending(), 1);
    }

    #[test]
    fn test_schedule_relative_to_current_time() {
        let mut timeline = Timeline::new();
        timeline.set_now(Duration::from_millis(50));
        timeline.schedule(Duration::from_millis(10), 1);
        assert_eq!(timeline.pop_due(Duration::from_millis(59)), None);
        assert_eq!(timeline.pop_due(Duration::from_millis(60)), Some(1));
    }

    #[test]
    fn test_time_never_goes_backwards() {
        let mut timeline: Timeline<()> = Timeline::new();
        timeline.set_now(Duration::from_millis(100));
        timeline.set_now(Duration::from_millis(20));
        assert_eq!(timeline.now(), Duration::from_millis(100));
    }
}
