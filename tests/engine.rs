mod common;

#[cfg(test)]
mod tests {
    use super::common::{at, config_with_limit, MemoryStore, RecordingSink};
    use std::time::Duration;
    use worklog::libs::clock::ManualClock;
    use worklog::libs::engine;
    use worklog::libs::event::Signal;
    use worklog::libs::tracker::{Tracker, TrackerState};

    const FAST_TICK: Duration = Duration::from_millis(10);

    fn new_tracker(limit: u64, clock: &ManualClock) -> Tracker<MemoryStore, ManualClock, RecordingSink> {
        Tracker::new(config_with_limit(limit), MemoryStore::default(), clock.clone(), RecordingSink::default())
    }

    #[tokio::test]
    async fn test_queued_events_apply_in_order() {
        let clock = ManualClock::new(at(2024, 5, 6, 9, 0, 0));
        let (handle, queue) = engine::queue();

        assert!(handle.start());
        assert!(handle.signal(Signal::IdlePauseRequested));
        assert!(handle.signal(Signal::LockPauseRequested));
        assert!(handle.signal(Signal::IdleResumeRequested));
        assert!(handle.signal(Signal::LockResumeRequested));
        assert!(handle.shutdown());

        let tracker = queue.run(new_tracker(8 * 3600, &clock), FAST_TICK).await;

        assert_eq!(tracker.state(), TrackerState::Stopped);
        // One session closed by the idle pause, one by the shutdown
        assert_eq!(tracker.store().sessions.len(), 2);
        assert!(tracker.pause_reasons().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_persists_running_session() {
        let clock = ManualClock::new(at(2024, 5, 6, 9, 0, 0));
        let (handle, queue) = engine::queue();
        let run = tokio::spawn(queue.run(new_tracker(8 * 3600, &clock), FAST_TICK));

        handle.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        clock.advance(30);
        handle.shutdown();

        let tracker = tokio::time::timeout(Duration::from_secs(5), run).await.unwrap().unwrap();
        assert_eq!(tracker.store().sessions.len(), 1);
        assert_eq!(tracker.store().sessions[0].duration_seconds, 30);
    }

    #[tokio::test]
    async fn test_dropping_every_handle_shuts_down() {
        let clock = ManualClock::new(at(2024, 5, 6, 9, 0, 0));
        let (handle, queue) = engine::queue();

        handle.start();
        drop(handle);

        let tracker = tokio::time::timeout(Duration::from_secs(5), queue.run(new_tracker(8 * 3600, &clock), FAST_TICK))
            .await
            .unwrap();
        assert_eq!(tracker.state(), TrackerState::Stopped);
        assert_eq!(tracker.store().sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_ticks_drive_the_budget() {
        let clock = ManualClock::new(at(2024, 5, 6, 9, 0, 0));
        let (handle, queue) = engine::queue();
        let run = tokio::spawn(queue.run(new_tracker(5, &clock), FAST_TICK));

        handle.start();
        tokio::time::sleep(Duration::from_millis(30)).await;
        clock.advance(5);
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.shutdown();

        let tracker = tokio::time::timeout(Duration::from_secs(5), run).await.unwrap().unwrap();
        assert_eq!(tracker.sink().thresholds(), vec![(0, 0)]);
        assert_eq!(tracker.budget().map(|b| b.limit_seconds), Some(1805));
    }

    #[tokio::test]
    async fn test_handle_reports_closed_loop() {
        let clock = ManualClock::new(at(2024, 5, 6, 9, 0, 0));
        let (handle, queue) = engine::queue();

        handle.shutdown();
        queue.run(new_tracker(8 * 3600, &clock), FAST_TICK).await;

        assert!(!handle.start());
        assert!(!handle.stop());
    }
}
