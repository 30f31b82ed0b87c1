use crate::scoring::Score;

/// Performance tier shown on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Badge {
    #[strum(to_string = "Ace Achiever")]
    AceAchiever,
    #[strum(to_string = "Brainiac")]
    Brainiac,
    #[strum(to_string = "Bright Spark")]
    BrightSpark,
    #[strum(to_string = "Rising Star")]
    RisingStar,
    #[strum(to_string = "Beginner")]
    Beginner,
}

impl Badge {
    /// Thresholds checked top-down; the first match wins.
    pub fn for_percent(percent: u8) -> Self {
        match percent {
            100..=u8::MAX => Badge::AceAchiever,
            90..=99 => Badge::Brainiac,
            75..=89 => Badge::BrightSpark,
            50..=74 => Badge::RisingStar,
            _ => Badge::Beginner,
        }
    }

    /// Same thresholds applied to the exact ratio, so 89.5% stays a Bright Spark.
    pub fn for_score(correct: usize, total: usize) -> Self {
        if total == 0 {
            return Badge::Beginner;
        }
        let scaled = correct * 100;
        if scaled >= total * 100 {
            Badge::AceAchiever
        } else if scaled >= total * 90 {
            Badge::Brainiac
        } else if scaled >= total * 75 {
            Badge::BrightSpark
        } else if scaled >= total * 50 {
            Badge::RisingStar
        } else {
            Badge::Beginner
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }

    pub fn blurb(&self) -> &'static str {
        match self {
            Badge::AceAchiever => "Perfect score. Nothing left to prove here.",
            Badge::Brainiac => "Almost flawless.",
            Badge::BrightSpark => "Strong result, a little review will get you there.",
            Badge::RisingStar => "Solid foundation. Another pass will help.",
            Badge::Beginner => "Worth revisiting the lessons before the next try.",
        }
    }
}

/// How a session reached its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString)]
pub enum Ending {
    #[strum(to_string = "submitted")]
    Submitted,
    #[strum(to_string = "time_expired")]
    TimeExpired,
}

/// Frozen outcome of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    pub total: usize,
    pub percent: u8,
    pub badge: Badge,
    pub ending: Ending,
}

impl QuizResult {
    pub fn from_score(score: Score, ending: Ending) -> Self {
        Self {
            correct: score.correct,
            incorrect: score.incorrect,
            unanswered: score.unanswered,
            total: score.total,
            percent: score.percent,
            badge: Badge::for_score(score.correct, score.total),
            ending,
        }
    }

    pub fn headline(&self) -> String {
        format!(
            "You scored {}/{} ({}%)",
            self.correct, self.total, self.percent
        )
    }

    pub fn is_perfect(&self) -> bool {
        self.badge == Badge::AceAchiever
    }
}

/// Exits offered by the results screen. Both discard the finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    Reattempt,
    GoToCourse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_thresholds() {
        assert_eq!(Badge::for_percent(100), Badge::AceAchiever);
        assert_eq!(Badge::for_percent(90), Badge::Brainiac);
        assert_eq!(Badge::for_percent(89), Badge::BrightSpark);
        assert_eq!(Badge::for_percent(75), Badge::BrightSpark);
        assert_eq!(Badge::for_percent(74), Badge::RisingStar);
        assert_eq!(Badge::for_percent(50), Badge::RisingStar);
        assert_eq!(Badge::for_percent(49), Badge::Beginner);
        assert_eq!(Badge::for_percent(0), Badge::Beginner);
    }

    #[test]
    fn badge_labels() {
        assert_eq!(Badge::AceAchiever.label(), "Ace Achiever");
        assert_eq!(Badge::Brainiac.label(), "Brainiac");
        assert_eq!(Badge::BrightSpark.label(), "Bright Spark");
        assert_eq!(Badge::RisingStar.label(), "Rising Star");
        assert_eq!(Badge::Beginner.label(), "Beginner");
    }

    #[test]
    fn exact_ratio_does_not_round_into_next_tier() {
        // 179/200 = 89.5%, displayed as 90 but still below the Brainiac line
        assert_eq!(Badge::for_score(179, 200), Badge::BrightSpark);
        assert_eq!(Badge::for_score(9, 10), Badge::Brainiac);
        assert_eq!(Badge::for_score(3, 3), Badge::AceAchiever);
        assert_eq!(Badge::for_score(1, 3), Badge::Beginner);
        assert_eq!(Badge::for_score(0, 0), Badge::Beginner);
    }

    #[test]
    fn badge_tiers_from_counts() {
        assert_eq!(Badge::for_score(100, 100), Badge::AceAchiever);
        assert_eq!(Badge::for_score(90, 100), Badge::Brainiac);
        assert_eq!(Badge::for_score(89, 100), Badge::BrightSpark);
        assert_eq!(Badge::for_score(50, 100), Badge::RisingStar);
        assert_eq!(Badge::for_score(1, 2), Badge::RisingStar);
        assert_eq!(Badge::for_score(49, 100), Badge::Beginner);
    }

    #[test]
    fn result_badge_follows_tier_table() {
        for (correct, badge) in [
            (100, Badge::AceAchiever),
            (90, Badge::Brainiac),
            (89, Badge::BrightSpark),
            (50, Badge::RisingStar),
            (49, Badge::Beginner),
        ] {
            let score = Score {
                correct,
                incorrect: 100 - correct,
                unanswered: 0,
                total: 100,
                percent: crate::scoring::percent(correct, 100),
            };
            assert_eq!(QuizResult::from_score(score, Ending::Submitted).badge, badge);
        }
    }

    #[test]
    fn result_from_score() {
        let score = Score {
            correct: 1,
            incorrect: 1,
            unanswered: 1,
            total: 3,
            percent: 33,
        };
        let result = QuizResult::from_score(score, Ending::TimeExpired);
        assert_eq!(result.badge, Badge::Beginner);
        assert_eq!(result.headline(), "You scored 1/3 (33%)");
        assert!(!result.is_perfect());
    }

    #[test]
    fn ending_round_trips_through_its_label() {
        for ending in [Ending::Submitted, Ending::TimeExpired] {
            assert_eq!(ending.to_string().parse::<Ending>(), Ok(ending));
        }
        assert!("abandoned".parse::<Ending>().is_err());
    }
}
