use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("a quiz must contain at least one question")]
    EmptyQuiz,

    #[error("score ({score}) exceeds the number of questions ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

/// Final result of a completed quiz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSummary {
    score: u32,
    total: u32,
    percentage: f64,
}

impl ScoreSummary {
    /// # Errors
    ///
    /// Returns `ScoreError::EmptyQuiz` when `total` is zero and
    /// `ScoreError::ScoreExceedsTotal` when `score > total`.
    pub fn new(score: u32, total: u32) -> Result<Self, ScoreError> {
        if total == 0 {
            return Err(ScoreError::EmptyQuiz);
        }
        if score > total {
            return Err(ScoreError::ScoreExceedsTotal { score, total });
        }
        Ok(Self {
            score,
            total,
            percentage: 100.0 * f64::from(score) / f64::from(total),
        })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_percentage(self.percentage)
    }
}

/// Qualitative feedback band for a quiz percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsPractice,
}

impl ScoreBand {
    /// Lower bounds are inclusive: 80 and above is excellent, 60 up to 80 is good.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            ScoreBand::Excellent
        } else if percentage >= 60.0 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsPractice
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::NeedsPractice => "needs practice",
        }
    }

    #[must_use]
    pub fn feedback(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent work!",
            ScoreBand::Good => "Good job!",
            ScoreBand::NeedsPractice => "Keep practicing!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_single_question_is_excellent() {
        let summary = ScoreSummary::new(1, 1).unwrap();
        assert_eq!((summary.score(), summary.total()), (1, 1));
        assert!((summary.percentage() - 100.0).abs() < f64::EPSILON);
        assert_eq!(summary.band(), ScoreBand::Excellent);
    }

    #[test]
    fn sixty_percent_is_good() {
        let summary = ScoreSummary::new(6, 10).unwrap();
        assert!((summary.percentage() - 60.0).abs() < f64::EPSILON);
        assert_eq!(summary.band(), ScoreBand::Good);
        assert_eq!(summary.band().label(), "good");
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(ScoreBand::from_percentage(80.0), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_percentage(79.99), ScoreBand::Good);
        assert_eq!(ScoreBand::from_percentage(60.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_percentage(59.99), ScoreBand::NeedsPractice);
        assert_eq!(ScoreBand::from_percentage(0.0), ScoreBand::NeedsPractice);
    }

    #[test]
    fn percentage_uses_true_division() {
        let summary = ScoreSummary::new(2, 3).unwrap();
        assert!((summary.percentage() - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.band(), ScoreBand::Good);
    }

    #[test]
    fn rejects_impossible_scores() {
        assert_eq!(ScoreSummary::new(0, 0).unwrap_err(), ScoreError::EmptyQuiz);
        assert_eq!(
            ScoreSummary::new(4, 3).unwrap_err(),
            ScoreError::ScoreExceedsTotal { score: 4, total: 3 }
        );
    }

    #[test]
    fn feedback_messages() {
        assert_eq!(ScoreBand::Excellent.feedback(), "Excellent work!");
        assert_eq!(ScoreBand::Good.feedback(), "Good job!");
        assert_eq!(ScoreBand::NeedsPractice.feedback(), "Keep practicing!");
    }
}
