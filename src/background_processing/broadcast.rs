use crate::utils::constants::{DELIVERY_SLOT_MILLIS, MAX_DELIVERIES_IN_FLIGHT};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Sends `text` to every recipient, a few at a time, and returns how many
/// deliveries succeeded. A failed delivery is logged and skipped.
pub(crate) async fn broadcast(bot: Bot, recipients: Vec<ChatId>, text: String) -> usize {
    let announcement = format!("📢 Announcement:\n{text}");
    deliver_all(recipients, MAX_DELIVERIES_IN_FLIGHT, move |chat_id| {
        let bot = bot.clone();
        let announcement = announcement.clone();
        async move {
            let sent = bot.send_message(chat_id, announcement).await.map(|_| ());
            // Keeps the slot busy so the overall rate stays under the limit.
            tokio::time::sleep(Duration::from_millis(DELIVERY_SLOT_MILLIS)).await;
            sent
        }
    })
    .await
}

/// At most `limit` deliveries run at the same time.
pub(crate) async fn deliver_all<F, Fut, E>(recipients: Vec<ChatId>, limit: usize, send: F) -> usize
where
    F: Fn(ChatId) -> Fut,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let permits = Arc::new(Semaphore::new(limit.max(1)));
    let mut set: JoinSet<(ChatId, Result<(), E>)> = JoinSet::new();
    for chat_id in recipients {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let delivery = send(chat_id);
        set.spawn(async move {
            let result = delivery.await;
            drop(permit);
            (chat_id, result)
        });
    }

    let mut delivered = 0;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((_, Ok(()))) => delivered += 1,
            Ok((chat_id, Err(err))) => {
                log::warn!("Broadcast to chat id = {} failed: {}", chat_id.0, err)
            }
            Err(err) => log::error!("Broadcast delivery task failed: {err}"),
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[tokio::test]
    async fn counts_only_successful_deliveries() {
        let attempted = Arc::new(Mutex::new(Vec::new()));
        let recipients: Vec<ChatId> = (1..=5).map(ChatId).collect();

        let delivered = {
            let attempted = attempted.clone();
            deliver_all(recipients, 2, move |chat_id| {
                attempted.lock().unwrap().push(chat_id.0);
                async move {
                    if chat_id.0 % 2 == 0 {
                        Err(format!("chat {} blocked the bot", chat_id.0))
                    } else {
                        Ok(())
                    }
                }
            })
            .await
        };

        assert_eq!(delivered, 3);
        let mut attempted = attempted.lock().unwrap().clone();
        attempted.sort_unstable();
        assert_eq!(attempted, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn no_recipients_delivers_nothing() {
        let delivered =
            deliver_all(Vec::new(), 4, |_| async { Ok::<(), String>(()) }).await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn deliveries_in_flight_never_exceed_the_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let recipients: Vec<ChatId> = (1..=200).map(ChatId).collect();

        let delivered = {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            deliver_all(recipients, 8, move |_| {
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(2)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<(), String>(())
                }
            })
            .await
        };

        assert_eq!(delivered, 200);
        let peak = peak.load(Ordering::SeqCst);
        assert!(peak <= 8, "peak in flight was {peak}");
        assert!(peak > 1, "deliveries did not overlap at all");
    }

    #[tokio::test]
    async fn zero_limit_still_delivers_one_at_a_time() {
        let recipients: Vec<ChatId> = (1..=3).map(ChatId).collect();
        let delivered = deliver_all(recipients, 0, |_| async { Ok::<(), String>(()) }).await;
        assert_eq!(delivered, 3);
    }
}
