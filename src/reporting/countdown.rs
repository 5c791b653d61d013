//! 倒计时推导
//!
//! `tick` 是纯函数；`CountdownTask` 是绑定到调用方生命周期的周期任务，
//! 创建时立即计算一次，之后每 1000ms 重算，drop 时取消。

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// 重算周期
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;

/// 剩余时间拆分，所有字段非负
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownState {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl CountdownState {
    pub fn is_finished(&self) -> bool {
        *self == CountdownState::default()
    }

    pub fn label(&self) -> String {
        format!(
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// 根据目标时间和当前时间计算剩余时间，目标已过时全部为 0
pub fn tick(target: DateTime<Utc>, now: DateTime<Utc>) -> CountdownState {
    let diff = (target - now).num_milliseconds();
    if diff <= 0 {
        return CountdownState::default();
    }
    CountdownState {
        days: (diff / MS_PER_DAY) as u64,
        hours: ((diff % MS_PER_DAY) / MS_PER_HOUR) as u64,
        minutes: ((diff % MS_PER_HOUR) / MS_PER_MINUTE) as u64,
        seconds: ((diff % MS_PER_MINUTE) / MS_PER_SECOND) as u64,
    }
}

/// 时钟来源，测试中可替换
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// 可取消、可重新设定目标的倒计时任务
pub struct CountdownTask {
    target_tx: watch::Sender<DateTime<Utc>>,
    state_rx: watch::Receiver<CountdownState>,
    handle: JoinHandle<()>,
}

impl CountdownTask {
    pub fn spawn(target: DateTime<Utc>) -> Self {
        Self::spawn_with_clock(target, system_clock())
    }

    pub fn spawn_with_clock(target: DateTime<Utc>, clock: Clock) -> Self {
        // 立即计算一次，订阅者不会看到空状态
        let initial = tick(target, clock());
        let (target_tx, target_rx) = watch::channel(target);
        let (state_tx, state_rx) = watch::channel(initial);
        let handle = tokio::spawn(run(target_rx, state_tx, clock));

        Self {
            target_tx,
            state_rx,
            handle,
        }
    }

    /// 更换目标时间：旧的计时被丢弃，以同样的周期重新开始
    pub fn retarget(&self, target: DateTime<Utc>) {
        let _ = self.target_tx.send(target);
    }

    pub fn current(&self) -> CountdownState {
        *self.state_rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state_rx.clone()
    }

    pub fn cancel(self) {
        // Drop 负责中止任务
    }
}

impl Drop for CountdownTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(
    mut target_rx: watch::Receiver<DateTime<Utc>>,
    state_tx: watch::Sender<CountdownState>,
    clock: Clock,
) {
    loop {
        let target = *target_rx.borrow_and_update();
        let mut state = tick(target, clock());
        state_tx.send_replace(state);

        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if state.is_finished() {
                // 已到终点，只等待新的目标
                if target_rx.changed().await.is_err() {
                    return;
                }
                break;
            }

            tokio::select! {
                _ = interval.tick() => {
                    state = tick(target, clock());
                    state_tx.send_replace(state);
                }
                changed = target_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    break;
                }
            }
        }
    }
}
