use crate::error::RecorderError;
use crate::features::FeatureLayer;
use crate::sample::{Sample, Waypoint};
use anyhow::Result;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// How a replay ended, with the number of waypoints visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    Completed(usize),
    Cancelled(usize),
}

/// Walks a feature through a recorded log, one waypoint per tick.
pub struct Replay {
    waypoints: Vec<Waypoint>,
    interval: Duration,
}

impl Replay {
    /// Fails on the first sample whose fields are not finite numbers.
    pub fn from_log(samples: &[Sample], interval: Duration) -> Result<Self, RecorderError> {
        let waypoints = samples
            .iter()
            .map(Waypoint::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            waypoints,
            interval,
        })
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Move `feature` to each waypoint in turn.
    ///
    /// Setting `cancel` to `true` (or dropping its sender) stops the replay
    /// before the next tick.
    pub async fn run(
        self,
        feature: &str,
        layer: &mut FeatureLayer,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<ReplayOutcome, RecorderError> {
        if layer.get(feature).is_none() {
            return Err(RecorderError::UnknownFeature(feature.to_string()));
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut visited = 0;
        for waypoint in self.waypoints {
            if *cancel.borrow() {
                return Ok(ReplayOutcome::Cancelled(visited));
            }

            loop {
                tokio::select! {
                    _ = ticker.tick() => break,
                    changed = cancel.changed() => {
                        // A dropped sender counts as a cancel too.
                        if changed.is_err() || *cancel.borrow() {
                            tracing::info!("{} replay cancelled after {} steps", feature, visited);
                            return Ok(ReplayOutcome::Cancelled(visited));
                        }
                    }
                }
            }

            layer.set_coordinates(feature, waypoint.lon, waypoint.lat);
            visited += 1;
            tracing::debug!(
                "{} moved to lon={} lat={}",
                feature,
                waypoint.lon,
                waypoint.lat
            );
        }

        tracing::info!("{} is done walking.", feature);
        Ok(ReplayOutcome::Completed(visited))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Sample> {
        vec![
            Sample::new("121.05", "14.65"),
            Sample::new("121.06", "14.66"),
            Sample::new("121.07", "14.67"),
        ]
    }

    fn layer() -> FeatureLayer {
        let mut layer = FeatureLayer::new();
        layer.add("marker", 0.0, 0.0);
        layer
    }

    #[tokio::test]
    async fn test_replay_visits_all_waypoints() {
        let replay = Replay::from_log(&samples(), Duration::from_millis(1)).unwrap();
        assert_eq!(replay.len(), 3);

        let mut layer = layer();
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        let outcome = replay.run("marker", &mut layer, cancel_rx).await.unwrap();

        assert_eq!(outcome, ReplayOutcome::Completed(3));
        assert_eq!(layer.position("marker"), Some((121.07, 14.67)));
    }

    #[tokio::test]
    async fn test_cancel_before_first_tick() {
        let replay = Replay::from_log(&samples(), Duration::from_millis(1)).unwrap();
        let mut layer = layer();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        cancel_tx.send(true).unwrap();

        let outcome = replay.run("marker", &mut layer, cancel_rx).await.unwrap();

        assert_eq!(outcome, ReplayOutcome::Cancelled(0));
        assert_eq!(layer.position("marker"), Some((0.0, 0.0)));
    }

    #[tokio::test]
    async fn test_cancel_mid_replay() {
        let many: Vec<Sample> = (0..1000)
            .map(|i| Sample::new(format!("{i}"), "0"))
            .collect();
        let replay = Replay::from_log(&many, Duration::from_millis(5)).unwrap();
        let mut layer = layer();
        let (cancel_tx, cancel_rx) = watch::channel(false);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            let _ = cancel_tx.send(true);
        });

        match replay.run("marker", &mut layer, cancel_rx).await.unwrap() {
            ReplayOutcome::Cancelled(n) => assert!(n < 1000),
            other => panic!("expected cancellation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancel_after_unrelated_update() {
        // Second waypoint waits a full minute, so only a prompt cancel ends the run.
        let replay = Replay::from_log(&samples(), Duration::from_secs(60)).unwrap();
        let mut layer = layer();
        let (cancel_tx, cancel_rx) = watch::channel(false);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = cancel_tx.send(false);
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = cancel_tx.send(true);
            // Hold the sender so only the explicit cancel can end the replay.
            tokio::time::sleep(Duration::from_secs(120)).await;
        });

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            replay.run("marker", &mut layer, cancel_rx),
        )
        .await
        .expect("replay should stop as soon as cancel is set")
        .unwrap();

        assert_eq!(outcome, ReplayOutcome::Cancelled(1));
        assert_eq!(layer.position("marker"), Some((121.05, 14.65)));
    }

    #[tokio::test]
    async fn test_unknown_feature() {
        let replay = Replay::from_log(&samples(), Duration::from_millis(1)).unwrap();
        let mut layer = FeatureLayer::new();
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        assert_eq!(
            replay.run("marker", &mut layer, cancel_rx).await,
            Err(RecorderError::UnknownFeature("marker".to_string()))
        );
    }

    #[test]
    fn test_from_log_rejects_bad_sample() {
        let mut bad = samples();
        bad.push(Sample::new("121.08", "north"));

        assert!(matches!(
            Replay::from_log(&bad, Duration::from_millis(1)),
            Err(RecorderError::InvalidCoordinate(_))
        ));
    }
}
