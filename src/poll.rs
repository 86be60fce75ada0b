//! Sleep-and-retry wait loops.
//!
//! Both loops poll at most `max_retry_attempts` times, pausing `sleep_time`
//! between polls. Errors while polling are logged and retried.

use std::{fmt, future::Future};

use tokio::time::{Instant, sleep};
use tracing::{info, warn};

use crate::{config::HarnessConfig, prelude::*};

/// Poll `fetch` until it yields `goal`.
///
/// Returns [`Error::StateTransitionFailure`] as soon as `failed` is observed
/// and [`Error::MaxAttemptsReached`] when the attempts run out.
pub async fn wait_for_state<S, F, Fut>(
    subject: &str,
    goal: S,
    failed: S,
    config: &HarnessConfig,
    mut fetch: F,
) -> Result<S>
where
    S: Copy + PartialEq + fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S>>,
{
    let start = Instant::now();
    let mut attempts = 0;
    let mut state: Option<S> = None;
    info!("{} waiting for state {}", subject, goal);

    while attempts < config.max_retry_attempts {
        match fetch().await {
            Ok(new_state) => {
                if state != Some(new_state) {
                    info!("{} transitioned to state {}", subject, new_state);
                }
                state = Some(new_state);
                if new_state == goal {
                    info!(
                        "{} state transition took {:?}",
                        subject,
                        start.elapsed()
                    );
                    return Ok(new_state);
                }
                if new_state == failed {
                    info!(
                        "goal_state:{} current_state:{} attempts: {}",
                        goal, new_state, attempts
                    );
                    return Err(Error::StateTransitionFailure {
                        subject: subject.to_string(),
                        goal: goal.to_string(),
                        current: new_state.to_string(),
                        attempts,
                    });
                }
            }
            Err(e) => warn!("{} failed to fetch state: {}", subject, e),
        }
        sleep(config.sleep_time).await;
        attempts += 1;
    }

    let current = state.map(|state| state.to_string()).unwrap_or_default();
    info!("{} max attempts reached to wait for goal state", subject);
    info!("goal_state:{} current_state:{}", goal, current);
    Err(Error::MaxAttemptsReached {
        subject: subject.to_string(),
        goal: goal.to_string(),
        current,
        attempts,
    })
}

/// Poll `condition` until it returns `true`.
pub async fn wait_for_condition<F, Fut>(
    message: &str,
    config: &HarnessConfig,
    mut condition: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();
    let mut attempts = 0;
    info!("waiting for condition {}", message);

    while attempts < config.max_retry_attempts {
        match condition().await {
            Ok(true) => {
                info!("{} condition took {:?}", message, start.elapsed());
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => warn!("{} condition check failed: {}", message, e),
        }
        sleep(config.sleep_time).await;
        attempts += 1;
    }

    info!("max attempts reached to wait for condition {}", message);
    Err(Error::ConditionNotMet {
        message: message.to_string(),
        attempts,
    })
}
