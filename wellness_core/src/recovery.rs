//! Recovery report: sleep, post-workout recovery and relaxation feedback.
//!
//! Three independent threshold checks, each contributing one line of
//! feedback. Lines always appear in the order sleep, recovery, relaxation.

use crate::{RecoveryData, RecoveryInput, RecoveryReport, SleepBand, Sufficiency};

const SLEEP_MIN_HOURS: f64 = 7.0;
const SLEEP_MAX_HOURS: f64 = 9.0;
const RECOVERY_MIN_MINUTES: f64 = 30.0;
const RELAXATION_MIN_MINUTES: f64 = 30.0;

pub fn classify_sleep(hours: f64) -> SleepBand {
    if hours < SLEEP_MIN_HOURS {
        SleepBand::Short
    } else if hours > SLEEP_MAX_HOURS {
        SleepBand::Long
    } else {
        SleepBand::Ideal
    }
}

fn sufficiency(minutes: f64, threshold: f64) -> Sufficiency {
    if minutes < threshold {
        Sufficiency::Insufficient
    } else {
        Sufficiency::Sufficient
    }
}

pub fn classify_workout_recovery(minutes: f64) -> Sufficiency {
    sufficiency(minutes, RECOVERY_MIN_MINUTES)
}

pub fn classify_relaxation(minutes: f64) -> Sufficiency {
    sufficiency(minutes, RELAXATION_MIN_MINUTES)
}

fn sleep_feedback(band: SleepBand) -> &'static str {
    match band {
        SleepBand::Short => {
            "You should try to sleep more. Aim for at least 7-8 hours of sleep per night."
        }
        SleepBand::Long => {
            "You are sleeping a lot! Make sure that long sleep doesn\u{2019}t leave you feeling sluggish."
        }
        SleepBand::Ideal => {
            "Your sleep duration is perfect. Keep maintaining 7-9 hours of sleep per night."
        }
    }
}

fn workout_recovery_feedback(level: Sufficiency) -> &'static str {
    match level {
        Sufficiency::Insufficient => {
            "Consider spending more time on workout recovery. 30-60 minutes of post-workout recovery is ideal."
        }
        Sufficiency::Sufficient => "You are spending enough time on workout recovery. Great job!",
    }
}

fn relaxation_feedback(level: Sufficiency) -> &'static str {
    match level {
        Sufficiency::Insufficient => {
            "Try to spend at least 30 minutes a day on relaxation or meditation to reduce stress."
        }
        Sufficiency::Sufficient => {
            "Your relaxation time is sufficient. Keep it up to maintain good mental health!"
        }
    }
}

/// Feedback lines joined in fixed order, each newline-terminated
pub fn personalized_feedback(input: &RecoveryInput) -> String {
    let lines = [
        sleep_feedback(classify_sleep(input.sleep_hours)),
        workout_recovery_feedback(classify_workout_recovery(input.workout_recovery_minutes)),
        relaxation_feedback(classify_relaxation(input.relaxation_minutes)),
    ];

    let mut feedback = String::new();
    for line in lines {
        feedback.push_str(line);
        feedback.push('\n');
    }
    feedback
}

pub fn recovery_report(input: &RecoveryInput) -> RecoveryReport {
    RecoveryReport {
        message: "Your Recovery Report".into(),
        data: RecoveryData {
            sleep: format!("You slept for {} hours.", input.sleep_hours),
            workout_recovery: format!(
                "You spent {} minutes on workout recovery.",
                input.workout_recovery_minutes
            ),
            relaxation: format!(
                "You had {} minutes of relaxation/meditation.",
                input.relaxation_minutes
            ),
            personalized_feedback: personalized_feedback(input),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(sleep_hours: f64, workout_recovery_minutes: f64, relaxation_minutes: f64) -> RecoveryInput {
        RecoveryInput {
            sleep_hours,
            workout_recovery_minutes,
            relaxation_minutes,
        }
    }

    #[test]
    fn test_all_advisories_in_order() {
        let feedback = personalized_feedback(&input(6.0, 20.0, 10.0));

        let sleep = feedback.find("You should try to sleep more").unwrap();
        let recovery = feedback.find("Consider spending more time").unwrap();
        let relaxation = feedback.find("Try to spend at least 30 minutes").unwrap();
        assert!(sleep < recovery && recovery < relaxation);
        assert_eq!(feedback.lines().count(), 3);
        assert!(feedback.ends_with('\n'));
    }

    #[test]
    fn test_sleep_bands() {
        assert_eq!(classify_sleep(6.9), SleepBand::Short);
        assert_eq!(classify_sleep(7.0), SleepBand::Ideal);
        assert_eq!(classify_sleep(9.0), SleepBand::Ideal);
        assert_eq!(classify_sleep(9.5), SleepBand::Long);
    }

    #[test]
    fn test_thirty_minutes_is_sufficient() {
        assert_eq!(classify_workout_recovery(30.0), Sufficiency::Sufficient);
        assert_eq!(classify_relaxation(29.0), Sufficiency::Insufficient);
    }

    #[test]
    fn test_report_data() {
        let report = recovery_report(&input(7.5, 45.0, 30.0));
        assert_eq!(report.message, "Your Recovery Report");
        assert_eq!(report.data.sleep, "You slept for 7.5 hours.");
        assert_eq!(
            report.data.workout_recovery,
            "You spent 45 minutes on workout recovery."
        );
        assert!(report
            .data
            .personalized_feedback
            .starts_with("Your sleep duration is perfect."));
    }
}
