//! Control loop — sample sensors, decide actuator states, publish telemetry.
//!
//! One cycle runs to completion before the next begins:
//!
//! `Idle → Sampling → Deciding → Publishing → Advancing → Idle`
//!
//! The loop is the sole owner (and writer) of the [`ActuatorBank`] and the
//! [`Tick`] counter. A failed publish is logged and never stops the loop;
//! only a tick overflow or an inconsistent sensor set is fatal.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use gardenhub_domain::actuator::{ActuatorBank, ActuatorDecision};
use gardenhub_domain::error::{GardenHubError, ValidationError};
use gardenhub_domain::rules::ControlRules;
use gardenhub_domain::sensor::{ReadingSet, ReadingSetBuilder, SensorKind};
use gardenhub_domain::telemetry::{DeviceName, TelemetryPayload, Topic};
use gardenhub_domain::tick::{Tick, Timestamp, now};

use crate::ports::{Sensor, TelemetryPublisher};

/// Pause between two cycles unless configured otherwise.
pub const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_secs(5);

/// Everything the loop needs besides its sensors and publisher.
#[derive(Debug, Clone)]
pub struct ControlLoopConfig {
    pub device: DeviceName,
    pub topic: Topic,
    pub cycle_interval: Duration,
    pub rules: ControlRules,
    pub start_tick: Tick,
}

impl ControlLoopConfig {
    /// Configuration with the default interval, rules and a tick of zero.
    #[must_use]
    pub fn new(device: DeviceName, topic: Topic) -> Self {
        Self {
            device,
            topic,
            cycle_interval: DEFAULT_CYCLE_INTERVAL,
            rules: ControlRules::default(),
            start_tick: Tick::ZERO,
        }
    }

    #[must_use]
    pub fn with_cycle_interval(mut self, interval: Duration) -> Self {
        self.cycle_interval = interval;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: ControlRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_start_tick(mut self, tick: Tick) -> Self {
        self.start_tick = tick;
        self
    }
}

/// Where the loop currently is inside a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CyclePhase {
    #[default]
    Idle,
    Sampling,
    Deciding,
    Publishing,
    Advancing,
}

/// Outcome of one completed cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// The tick the cycle ran at (before advancing).
    pub tick: Tick,
    pub readings: ReadingSet,
    pub actuators: ActuatorDecision,
    /// Whether the publisher accepted the payload.
    pub published: bool,
    pub completed_at: Timestamp,
}

/// The device's single thread of control.
pub struct ControlLoop<P> {
    config: ControlLoopConfig,
    sensors: Vec<Box<dyn Sensor>>,
    actuators: ActuatorBank,
    tick: Tick,
    phase: CyclePhase,
    publisher: P,
}

impl<P: TelemetryPublisher> ControlLoop<P> {
    /// Build a loop with all actuators off.
    ///
    /// # Errors
    ///
    /// Returns [`GardenHubError::Validation`] when the interval is zero or
    /// `sensors` does not hold exactly one sensor per [`SensorKind`].
    pub fn new(
        config: ControlLoopConfig,
        sensors: Vec<Box<dyn Sensor>>,
        publisher: P,
    ) -> Result<Self, GardenHubError> {
        if config.cycle_interval.is_zero() {
            return Err(ValidationError::ZeroInterval.into());
        }
        check_sensor_coverage(&sensors)?;

        Ok(Self {
            tick: config.start_tick,
            config,
            sensors,
            actuators: ActuatorBank::default(),
            phase: CyclePhase::Idle,
            publisher,
        })
    }

    /// The tick the next cycle will run at.
    #[must_use]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    #[must_use]
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    #[must_use]
    pub fn actuators(&self) -> &ActuatorBank {
        &self.actuators
    }

    /// Run one full cycle: sample, decide, publish, advance.
    ///
    /// Publishing failures are logged and reported through
    /// [`CycleReport::published`]; the tick advances regardless.
    ///
    /// # Errors
    ///
    /// Returns [`GardenHubError::Validation`] if the sensors did not yield
    /// exactly one reading per kind (the cycle stops before deciding), or
    /// [`GardenHubError::TickOverflow`] when the tick cannot advance.
    #[tracing::instrument(skip(self), fields(tick = %self.tick, device_id = %self.config.device))]
    pub async fn run_cycle(&mut self) -> Result<CycleReport, GardenHubError> {
        let tick = self.tick;

        self.enter(CyclePhase::Sampling);
        let readings = match self.sample(tick) {
            Ok(readings) => readings,
            Err(err) => {
                self.enter(CyclePhase::Idle);
                return Err(err);
            }
        };

        self.enter(CyclePhase::Deciding);
        let decision = self.config.rules.decide(&readings, tick);
        self.actuators.apply(&decision);
        tracing::debug!(
            daytime = tick.is_daytime(),
            fan = decision.fan,
            humidifier = decision.humidifier,
            led_light = decision.led_light,
            sprinkler = decision.sprinkler,
            "actuators updated"
        );

        self.enter(CyclePhase::Publishing);
        let payload = TelemetryPayload::new(&self.config.device, &readings, &self.actuators);
        let published = match payload.to_json_bytes() {
            Ok(bytes) => deliver(&self.publisher, &self.config.topic, bytes).await,
            Err(err) => {
                tracing::error!(%err, "failed to encode telemetry payload");
                false
            }
        };

        self.enter(CyclePhase::Advancing);
        let advanced = tick.next();
        self.enter(CyclePhase::Idle);
        self.tick = advanced?;

        Ok(CycleReport {
            tick,
            readings,
            actuators: decision,
            published,
            completed_at: now(),
        })
    }

    /// Run cycles every `cycle_interval` until `shutdown` flips to `true`
    /// or its sender is dropped.
    ///
    /// The first cycle starts immediately. A cycle in progress always
    /// completes before the stop signal is observed.
    ///
    /// # Errors
    ///
    /// Propagates the fatal errors of [`run_cycle`](Self::run_cycle).
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), GardenHubError> {
        if *shutdown.borrow_and_update() {
            return Ok(());
        }

        let mut ticker = tokio::time::interval(self.config.cycle_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            device_id = %self.config.device,
            topic = %self.config.topic,
            interval = ?self.config.cycle_interval,
            start_tick = %self.tick,
            "control loop started"
        );

        loop {
            // A stop signal that arrived during a cycle wins over an overdue tick.
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow_and_update() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.run_cycle().await?;
                }
            }
        }

        tracing::info!(tick = %self.tick, "control loop stopped");
        Ok(())
    }

    fn sample(&mut self, tick: Tick) -> Result<ReadingSet, GardenHubError> {
        self.sensors
            .iter_mut()
            .map(|sensor| sensor.read(tick))
            .fold(ReadingSet::builder(), ReadingSetBuilder::reading)
            .build()
    }

    fn enter(&mut self, phase: CyclePhase) {
        tracing::trace!(from = ?self.phase, to = ?phase, "cycle phase");
        self.phase = phase;
    }
}

/// Hand `payload` to the publisher, logging instead of failing.
async fn deliver<P: TelemetryPublisher>(publisher: &P, topic: &Topic, payload: Vec<u8>) -> bool {
    match publisher.publish(topic, payload).await {
        Ok(()) => {
            tracing::debug!(%topic, "telemetry published");
            true
        }
        Err(err) => {
            tracing::warn!(%err, %topic, "telemetry publish failed, continuing");
            false
        }
    }
}

fn check_sensor_coverage(sensors: &[Box<dyn Sensor>]) -> Result<(), ValidationError> {
    for kind in SensorKind::ALL {
        match sensors.iter().filter(|sensor| sensor.kind() == kind).count() {
            0 => return Err(ValidationError::MissingSensor(kind)),
            1 => {}
            _ => return Err(ValidationError::DuplicateSensor(kind)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gardenhub_domain::actuator::ActuatorKind;
    use gardenhub_domain::rules::LedPolicy;
    use gardenhub_domain::sensor::{SensorReading, SensorValue};
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // ── Fakes ──────────────────────────────────────────────────────

    /// Replays one value per tick; the last value repeats forever.
    struct ScriptedSensor {
        kind: SensorKind,
        script: Vec<SensorValue>,
    }

    impl Sensor for ScriptedSensor {
        fn kind(&self) -> SensorKind {
            self.kind
        }

        fn read(&mut self, tick: Tick) -> SensorReading {
            let index = usize::try_from(tick.value())
                .unwrap_or(usize::MAX)
                .min(self.script.len() - 1);
            SensorReading::new(self.kind, self.script[index])
        }
    }

    /// Claims one kind but reports another.
    struct MislabelledSensor;

    impl Sensor for MislabelledSensor {
        fn kind(&self) -> SensorKind {
            SensorKind::Moisture
        }

        fn read(&mut self, _tick: Tick) -> SensorReading {
            SensorReading::new(SensorKind::Light, 10_i64)
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        sent: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl RecordingPublisher {
        fn payloads(&self) -> Vec<serde_json::Value> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|(_, p)| p.clone())
                .collect()
        }
    }

    impl TelemetryPublisher for RecordingPublisher {
        fn publish(
            &self,
            topic: &Topic,
            payload: Vec<u8>,
        ) -> impl Future<Output = Result<(), GardenHubError>> + Send {
            let value = serde_json::from_slice(&payload).unwrap();
            self.sent.lock().unwrap().push((topic.to_string(), value));
            async { Ok(()) }
        }
    }

    /// Counts calls, then takes `delay` to accept each payload.
    struct SlowPublisher {
        calls: AtomicUsize,
        delay: Duration,
    }

    impl TelemetryPublisher for SlowPublisher {
        fn publish(
            &self,
            _topic: &Topic,
            _payload: Vec<u8>,
        ) -> impl Future<Output = Result<(), GardenHubError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.delay;
            async move {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }

    struct FailingPublisher;

    impl TelemetryPublisher for FailingPublisher {
        fn publish(
            &self,
            _topic: &Topic,
            _payload: Vec<u8>,
        ) -> impl Future<Output = Result<(), GardenHubError>> + Send {
            async { Err(GardenHubError::Transport("connection refused".into())) }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn config() -> ControlLoopConfig {
        ControlLoopConfig::new(
            DeviceName::new("test-garden").unwrap(),
            Topic::new("iot/garden").unwrap(),
        )
    }

    fn scripted(
        temperature: &[f64],
        humidity: &[f64],
        light: &[i64],
        moisture: &[i64],
    ) -> Vec<Box<dyn Sensor>> {
        vec![
            Box::new(ScriptedSensor {
                kind: SensorKind::Temperature,
                script: temperature.iter().copied().map(SensorValue::from).collect(),
            }),
            Box::new(ScriptedSensor {
                kind: SensorKind::Humidity,
                script: humidity.iter().copied().map(SensorValue::from).collect(),
            }),
            Box::new(ScriptedSensor {
                kind: SensorKind::Light,
                script: light.iter().copied().map(SensorValue::from).collect(),
            }),
            Box::new(ScriptedSensor {
                kind: SensorKind::Moisture,
                script: moisture.iter().copied().map(SensorValue::from).collect(),
            }),
        ]
    }

    fn fixed(temperature: f64, humidity: f64, light: i64, moisture: i64) -> Vec<Box<dyn Sensor>> {
        scripted(&[temperature], &[humidity], &[light], &[moisture])
    }

    // ── Construction ───────────────────────────────────────────────

    #[test]
    fn should_reject_missing_sensor() {
        let mut sensors = fixed(22.0, 50.0, 10, 70);
        sensors.pop();
        let result = ControlLoop::new(config(), sensors, RecordingPublisher::default());
        assert!(matches!(
            result,
            Err(GardenHubError::Validation(ValidationError::MissingSensor(
                SensorKind::Moisture
            )))
        ));
    }

    #[test]
    fn should_reject_duplicate_sensor() {
        let mut sensors = fixed(22.0, 50.0, 10, 70);
        sensors.push(Box::new(ScriptedSensor {
            kind: SensorKind::Humidity,
            script: vec![SensorValue::Float(45.0)],
        }));
        let result = ControlLoop::new(config(), sensors, RecordingPublisher::default());
        assert!(matches!(
            result,
            Err(GardenHubError::Validation(ValidationError::DuplicateSensor(
                SensorKind::Humidity
            )))
        ));
    }

    #[test]
    fn should_reject_zero_interval() {
        let result = ControlLoop::new(
            config().with_cycle_interval(Duration::ZERO),
            fixed(22.0, 50.0, 10, 70),
            RecordingPublisher::default(),
        );
        assert!(matches!(
            result,
            Err(GardenHubError::Validation(ValidationError::ZeroInterval))
        ));
    }

    #[test]
    fn should_start_idle_with_everything_off() {
        let control = ControlLoop::new(
            config(),
            fixed(22.0, 50.0, 10, 70),
            RecordingPublisher::default(),
        )
        .unwrap();
        assert_eq!(control.tick(), Tick::ZERO);
        assert_eq!(control.phase(), CyclePhase::Idle);
        assert_eq!(control.actuators().snapshot(), ActuatorDecision::default());
    }

    // ── Cycles ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_turn_everything_on_for_daytime_scenario() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mut control = ControlLoop::new(
            config().with_start_tick(Tick::new(10)),
            fixed(32.0, 35.0, 40, 15),
            Arc::clone(&publisher),
        )
        .unwrap();

        let report = control.run_cycle().await.unwrap();

        assert_eq!(report.tick, Tick::new(10));
        assert!(report.published);
        for kind in ActuatorKind::ALL {
            assert!(control.actuators().is_on(kind), "{kind} should be on");
        }
        let payloads = publisher.payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0]["device_id"], "test-garden");
        assert_eq!(payloads[0]["actuators"]["fan"]["fan_state"], true);
        assert_eq!(payloads[0]["actuators"]["LED_light"]["led_light_state"], true);
        assert_eq!(payloads[0]["sensors"]["light_sensor"]["light_condition"], 40);
    }

    #[tokio::test]
    async fn should_turn_everything_off_for_nighttime_scenario() {
        let mut control = ControlLoop::new(
            config().with_start_tick(Tick::new(20)),
            fixed(22.0, 50.0, 10, 70),
            RecordingPublisher::default(),
        )
        .unwrap();

        let report = control.run_cycle().await.unwrap();

        assert_eq!(report.actuators, ActuatorDecision::default());
        assert_eq!(control.actuators().snapshot(), ActuatorDecision::default());
    }

    #[tokio::test]
    async fn should_combine_fan_conditions() {
        let cases = [
            (32.0, 35.0, true),
            (32.0, 50.0, true),
            (25.0, 35.0, true),
            (25.0, 50.0, false),
        ];
        for (temperature, humidity, expected) in cases {
            let mut control = ControlLoop::new(
                config(),
                fixed(temperature, humidity, 60, 70),
                RecordingPublisher::default(),
            )
            .unwrap();
            control.run_cycle().await.unwrap();
            assert_eq!(
                control.actuators().is_on(ActuatorKind::Fan),
                expected,
                "temperature={temperature} humidity={humidity}"
            );
        }
    }

    #[tokio::test]
    async fn should_publish_current_cycle_decisions_not_previous_ones() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mut control = ControlLoop::new(
            config().with_start_tick(Tick::ZERO),
            scripted(&[32.0, 22.0], &[35.0, 50.0], &[60], &[15, 70]),
            Arc::clone(&publisher),
        )
        .unwrap();

        control.run_cycle().await.unwrap();
        control.run_cycle().await.unwrap();

        let payloads = publisher.payloads();
        assert_eq!(payloads[0]["actuators"]["fan"]["fan_state"], true);
        assert_eq!(payloads[0]["actuators"]["sprinkler"]["sprinkler_state"], true);
        assert_eq!(payloads[1]["actuators"]["fan"]["fan_state"], false);
        assert_eq!(payloads[1]["actuators"]["sprinkler"]["sprinkler_state"], false);
        assert_eq!(
            payloads[1]["actuators"]["humidifier"]["humidifier_state"],
            false
        );
    }

    #[tokio::test]
    async fn should_advance_tick_even_when_publish_fails() {
        let mut control =
            ControlLoop::new(config(), fixed(22.0, 50.0, 10, 70), FailingPublisher).unwrap();

        let report = control.run_cycle().await.unwrap();
        assert!(!report.published);
        assert_eq!(control.tick(), Tick::new(1));

        control.run_cycle().await.unwrap();
        assert_eq!(control.tick(), Tick::new(2));
        assert_eq!(control.phase(), CyclePhase::Idle);
    }

    #[tokio::test]
    async fn should_fail_when_tick_overflows() {
        let mut control = ControlLoop::new(
            config().with_start_tick(Tick::new(u64::MAX)),
            fixed(22.0, 50.0, 10, 70),
            RecordingPublisher::default(),
        )
        .unwrap();

        let result = control.run_cycle().await;
        assert!(matches!(result, Err(GardenHubError::TickOverflow)));
        assert_eq!(control.tick(), Tick::new(u64::MAX));
    }

    #[tokio::test]
    async fn should_not_publish_when_sampling_is_incomplete() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mut sensors = fixed(22.0, 50.0, 10, 70);
        sensors.pop();
        sensors.push(Box::new(MislabelledSensor));
        let mut control = ControlLoop::new(config(), sensors, Arc::clone(&publisher)).unwrap();

        let result = control.run_cycle().await;

        assert!(matches!(
            result,
            Err(GardenHubError::Validation(ValidationError::DuplicateReading(
                SensorKind::Light
            )))
        ));
        assert!(publisher.payloads().is_empty());
        assert_eq!(control.tick(), Tick::ZERO);
        assert_eq!(control.phase(), CyclePhase::Idle);
    }

    #[tokio::test]
    async fn should_light_led_at_night_with_any_time_policy() {
        let mut control = ControlLoop::new(
            config()
                .with_start_tick(Tick::new(20))
                .with_rules(ControlRules::new(LedPolicy::AnyTime)),
            fixed(22.0, 50.0, 10, 70),
            RecordingPublisher::default(),
        )
        .unwrap();

        control.run_cycle().await.unwrap();
        assert!(control.actuators().is_on(ActuatorKind::LedLight));
    }

    // ── Periodic driver ────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn should_run_one_cycle_per_interval_until_stopped() {
        let publisher = Arc::new(RecordingPublisher::default());
        let control = ControlLoop::new(
            config(),
            fixed(22.0, 50.0, 10, 70),
            Arc::clone(&publisher),
        )
        .unwrap();
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(control.run(stop_rx));
        // Cycles fire at t=0s, 5s and 10s.
        tokio::time::sleep(Duration::from_secs(11)).await;
        stop_tx.send(true).unwrap();

        handle.await.unwrap().unwrap();
        assert_eq!(publisher.payloads().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_start_another_cycle_after_stop_during_slow_cycle() {
        let publisher = Arc::new(SlowPublisher {
            calls: AtomicUsize::new(0),
            delay: Duration::from_secs(6),
        });
        let control = ControlLoop::new(
            config(),
            fixed(22.0, 50.0, 10, 70),
            Arc::clone(&publisher),
        )
        .unwrap();
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(control.run(stop_rx));
        // The first cycle is still publishing at t=3s and ends at t=6s, when
        // the next tick is already overdue.
        tokio::time::sleep(Duration::from_secs(3)).await;
        stop_tx.send(true).unwrap();

        handle.await.unwrap().unwrap();
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_run_when_already_stopped() {
        let publisher = Arc::new(RecordingPublisher::default());
        let control = ControlLoop::new(
            config(),
            fixed(22.0, 50.0, 10, 70),
            Arc::clone(&publisher),
        )
        .unwrap();
        let (_stop_tx, stop_rx) = watch::channel(true);

        control.run(stop_rx).await.unwrap();
        assert!(publisher.payloads().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_when_signal_sender_is_dropped() {
        let control = ControlLoop::new(
            config(),
            fixed(22.0, 50.0, 10, 70),
            RecordingPublisher::default(),
        )
        .unwrap();
        let (stop_tx, stop_rx) = watch::channel(false);
        drop(stop_tx);

        assert!(control.run(stop_rx).await.is_ok());
    }
}
