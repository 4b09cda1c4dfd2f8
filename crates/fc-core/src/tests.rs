//! Unit tests for fc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CarId, CycleId};

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(CarId::INVALID.0, u32::MAX);
        assert_eq!(CycleId::INVALID.0, u64::MAX);
        assert!(!CarId::default().is_valid());
        assert!(CarId(1).is_valid());
    }

    #[test]
    fn try_from_usize() {
        assert_eq!(CarId::try_from(7usize).unwrap(), CarId(7));
        assert!(CarId::try_from(u64::MAX as usize).is_err());
    }

    #[test]
    fn cycle_next() {
        assert_eq!(CycleId::FIRST.next(), CycleId(2));
    }

    #[test]
    fn display() {
        assert_eq!(CarId(3).to_string(), "3");
        assert_eq!(CycleId(12).to_string(), "C12");
    }
}

#[cfg(test)]
mod time {
    use std::time::Duration;

    use crate::SimClock;

    #[test]
    fn clock_is_monotonic() {
        let clock = SimClock::start();
        let a = clock.now_secs();
        std::thread::sleep(Duration::from_millis(5));
        let b = clock.now_secs();
        assert!(b > a, "{b} should exceed {a}");
        assert!(b >= 0.005);
    }

    #[test]
    fn reached_and_remaining() {
        let clock = SimClock::start();
        assert!(clock.reached(Duration::ZERO));
        assert!(!clock.reached(Duration::from_secs(3600)));
        assert_eq!(clock.remaining(Duration::ZERO), Duration::ZERO);
        assert!(clock.remaining(Duration::from_secs(3600)) > Duration::from_secs(3599));
    }

    #[test]
    fn copies_share_origin() {
        let clock = SimClock::start();
        let copy = clock;
        std::thread::sleep(Duration::from_millis(2));
        let (a, b) = (clock.now_secs(), copy.now_secs());
        assert!((a - b).abs() < 0.001, "{a} vs {b}");
    }
}

#[cfg(test)]
mod config {
    use std::time::Duration;

    use crate::{DelayRange, FerryConfig, FerryError};

    #[test]
    fn defaults_match_reference_constants() {
        let c = FerryConfig::default();
        assert_eq!(c.capacity, 5);
        assert_eq!(c.car_count, 5);
        assert_eq!(c.run_duration(), Duration::from_secs(60));
        assert_eq!(c.crossing(), Duration::from_secs(3));
        assert_eq!(c.board_delay_ms, DelayRange::new(10, 50));
        assert_eq!(c.away_delay_ms, DelayRange::new(500, 1_500));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        let c = FerryConfig { capacity: 0, ..FerryConfig::default() };
        assert!(matches!(c.validate(), Err(FerryError::Config(_))));
    }

    #[test]
    fn zero_cars_rejected() {
        let c = FerryConfig { car_count: 0, ..FerryConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn inverted_range_rejected() {
        let c = FerryConfig {
            away_delay_ms: DelayRange::new(10, 5),
            ..FerryConfig::default()
        };
        let err = c.validate().unwrap_err().to_string();
        assert!(err.contains("away_delay_ms"), "{err}");
    }

    #[test]
    fn underpopulated_is_valid() {
        let c = FerryConfig { car_count: 2, ..FerryConfig::default() };
        assert!(c.validate().is_ok());
        assert!(c.is_underpopulated());
    }
}

#[cfg(test)]
mod rng {
    use std::time::Duration;

    use crate::{CarId, CarRng, DelayRange, SimRng};

    #[test]
    fn car_rng_deterministic() {
        let range = DelayRange::new(0, 1_000_000);
        let mut a = CarRng::new(42, CarId(1));
        let mut b = CarRng::new(42, CarId(1));
        for _ in 0..16 {
            assert_eq!(a.delay(range), b.delay(range));
        }
    }

    #[test]
    fn different_cars_differ() {
        let range = DelayRange::new(0, 1_000_000);
        let mut a = CarRng::new(42, CarId(1));
        let mut b = CarRng::new(42, CarId(2));
        let xs: Vec<_> = (0..8).map(|_| a.delay(range)).collect();
        let ys: Vec<_> = (0..8).map(|_| b.delay(range)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn delay_within_bounds() {
        let range = DelayRange::new(10, 50);
        let mut rng = CarRng::new(7, CarId(3));
        for _ in 0..1_000 {
            let d = rng.delay(range);
            assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(50), "{d:?}");
        }
    }

    #[test]
    fn fixed_range_is_exact() {
        let mut rng = SimRng::new(1);
        assert_eq!(rng.delay(DelayRange::fixed(25)), Duration::from_millis(25));
        assert_eq!(rng.delay(DelayRange::ZERO), Duration::ZERO);
    }

    #[test]
    fn sim_rng_child_deterministic() {
        let range = DelayRange::new(0, u64::MAX / 2);
        let mut root_a = SimRng::new(9);
        let mut root_b = SimRng::new(9);
        let mut a = root_a.child(3);
        let mut b = root_b.child(3);
        assert_eq!(a.delay(range), b.delay(range));
    }
}

#[cfg(test)]
mod event {
    use crate::{CarId, CycleId, Event, EventKind, Role};

    #[test]
    fn console_format() {
        let e = Event {
            at:    12.345_67,
            role:  Role::Car(CarId(3)),
            kind:  EventKind::CarEntered,
            cycle: CycleId(2),
        };
        assert_eq!(e.to_string(), "[Clock : 12.3457] Car 3 entered the ferry");

        let f = Event { role: Role::Ferry, kind: EventKind::FerryDeparted, ..e };
        assert_eq!(f.to_string(), "[Clock : 12.3457] Ferry leaves the dock");
    }

    #[test]
    fn role_car_id() {
        assert_eq!(Role::Ferry.car_id(), None);
        assert_eq!(Role::Car(CarId(4)).car_id(), Some(CarId(4)));
        assert_eq!(Role::Car(CarId(4)).as_str(), "car");
    }

    #[test]
    fn kind_tags_are_distinct() {
        let kinds = [
            EventKind::FerryArrived,
            EventKind::FerryDeparted,
            EventKind::CarEntered,
            EventKind::CarLeft,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }
}
