//! Menstrual cycle phase calculator.
//!
//! Phases are bucketed over a fixed 28-day cycle counted from the last period:
//! - day 0–5 → menstrual
//! - day 6–13 → follicular
//! - day 14–16 → ovulation
//! - day 17–27 → luteal
//!
//! The calculator is total: a last-period date in the future yields a negative
//! elapsed count, which is normalized into `[0, 28)` before bucketing.

use crate::CyclePhase;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

pub const CYCLE_LENGTH_DAYS: i64 = 28;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Phase at `reference`, given the first day of the last period (UTC midnight)
pub fn phase(last_period: NaiveDate, reference: DateTime<Utc>) -> CyclePhase {
    let start = last_period.and_time(NaiveTime::MIN).and_utc();
    let elapsed_days = (reference - start)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY);
    phase_for_cycle_day(elapsed_days.rem_euclid(CYCLE_LENGTH_DAYS))
}

/// Phase on a calendar day
pub fn phase_on(last_period: NaiveDate, day: NaiveDate) -> CyclePhase {
    phase(last_period, day.and_time(NaiveTime::MIN).and_utc())
}

/// Phase right now
pub fn current_phase(last_period: NaiveDate) -> CyclePhase {
    phase(last_period, Utc::now())
}

fn phase_for_cycle_day(day: i64) -> CyclePhase {
    match day {
        0..=5 => CyclePhase::Menstrual,
        6..=13 => CyclePhase::Follicular,
        14..=16 => CyclePhase::Ovulation,
        _ => CyclePhase::Luteal,
    }
}

/// Static copy shown alongside a phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub workout_tips: &'static str,
}

pub fn phase_info(phase: CyclePhase) -> PhaseInfo {
    match phase {
        CyclePhase::Menstrual => PhaseInfo {
            name: "Menstruação",
            description: "Seu corpo está em um período de renovação. É normal sentir mais cansaço.",
            workout_tips: "Treinos leves como alongamento, yoga ou caminhada são perfeitos agora.",
        },
        CyclePhase::Follicular => PhaseInfo {
            name: "Fase Folicular",
            description: "Sua energia está aumentando! Aproveite esse momento.",
            workout_tips: "Ótimo período para treinos mais intensos e desafiadores.",
        },
        CyclePhase::Ovulation => PhaseInfo {
            name: "Ovulação",
            description: "Você está no pico de energia! Aproveite ao máximo.",
            workout_tips: "Momento ideal para treinos de alta intensidade e novos desafios.",
        },
        CyclePhase::Luteal => PhaseInfo {
            name: "Fase Lútea",
            description: "Seu corpo está se preparando para o próximo ciclo.",
            workout_tips: "Mantenha treinos moderados e ouça seu corpo com carinho.",
        },
    }
}

/// Daily reminder text for a phase
pub fn notification_message(phase: CyclePhase) -> &'static str {
    match phase {
        CyclePhase::Menstrual => "Que tal um alongamento suave hoje? Seu corpo vai agradecer 💜",
        CyclePhase::Follicular => "Você está radiante! Hora de um treino energizante ✨",
        CyclePhase::Ovulation => "Sua energia está no máximo! Vamos aproveitar? 🔥",
        CyclePhase::Luteal => "Um treino equilibrado te espera hoje. Vamos juntas? 🌸",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ten_days_after_period_is_follicular() {
        let last = date(2026, 5, 1);
        let reference = Utc.with_ymd_and_hms(2026, 5, 11, 15, 30, 0).unwrap();
        assert_eq!(phase(last, reference), CyclePhase::Follicular);
    }

    #[test]
    fn test_bucket_boundaries() {
        let last = date(2026, 1, 1);
        let expected = [
            (0, CyclePhase::Menstrual),
            (5, CyclePhase::Menstrual),
            (6, CyclePhase::Follicular),
            (13, CyclePhase::Follicular),
            (14, CyclePhase::Ovulation),
            (16, CyclePhase::Ovulation),
            (17, CyclePhase::Luteal),
            (27, CyclePhase::Luteal),
            (28, CyclePhase::Menstrual),
        ];
        for (offset, want) in expected {
            let day = last + Duration::days(offset);
            assert_eq!(phase_on(last, day), want, "day {}", offset);
        }
    }

    #[test]
    fn test_partial_days_floor() {
        let last = date(2026, 1, 1);
        // 5 days and 23 hours is still day 5
        let reference = Utc.with_ymd_and_hms(2026, 1, 6, 23, 59, 59).unwrap();
        assert_eq!(phase(last, reference), CyclePhase::Menstrual);
    }

    #[test]
    fn test_future_last_period_normalizes() {
        let last = date(2026, 1, 10);
        // one day before: elapsed -1 → cycle day 27
        assert_eq!(phase_on(last, date(2026, 1, 9)), CyclePhase::Luteal);
        // twelve hours before still floors to -1
        let reference = Utc.with_ymd_and_hms(2026, 1, 9, 12, 0, 0).unwrap();
        assert_eq!(phase(last, reference), CyclePhase::Luteal);
        // 14 days before: -14 → cycle day 14
        assert_eq!(phase_on(last, date(2025, 12, 27)), CyclePhase::Ovulation);
    }

    #[test]
    fn test_phase_tables_cover_every_phase() {
        for p in CyclePhase::ALL {
            let info = phase_info(p);
            assert!(!info.name.is_empty());
            assert!(!info.workout_tips.is_empty());
            assert!(!notification_message(p).is_empty());
        }
        assert_eq!(phase_info(CyclePhase::Luteal).name, "Fase Lútea");
    }

    proptest! {
        #[test]
        fn phase_is_periodic_over_28_days(
            last_offset in -20_000i64..20_000,
            ref_offset_secs in -2_000_000_000i64..2_000_000_000,
        ) {
            let last = date(2000, 1, 1) + Duration::days(last_offset);
            let reference = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
                + Duration::seconds(ref_offset_secs);

            let p = phase(last, reference);
            prop_assert!(CyclePhase::ALL.contains(&p));
            prop_assert_eq!(p, phase(last, reference + Duration::days(28)));
        }
    }
}
