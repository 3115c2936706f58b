#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Perfect,
    Great,
    Average,
    TryAgain,
}

impl Verdict {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            100.. => Verdict::Perfect,
            70..=99 => Verdict::Great,
            50..=69 => Verdict::Average,
            _ => Verdict::TryAgain,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Verdict::Perfect => "Perfect! You're a master.",
            Verdict::Great => "Great job!",
            Verdict::Average => "Average. Keep practicing.",
            Verdict::TryAgain => "Shall we try again?",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizResult {
    pub score: u32,
    pub total: usize,
    pub percentage: u32,
    pub verdict: Verdict,
}

impl QuizResult {
    pub fn new(score: u32, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (score as f64 / total as f64 * 100.0).round() as u32
        };
        Self {
            score,
            total,
            percentage,
            verdict: Verdict::from_percentage(percentage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(QuizResult::new(6, 9).percentage, 67);
        assert_eq!(QuizResult::new(1, 3).percentage, 33);
        assert_eq!(QuizResult::new(0, 0).percentage, 0);
    }

    #[test]
    fn verdict_tiers() {
        assert_eq!(QuizResult::new(9, 9).verdict, Verdict::Perfect);
        assert_eq!(QuizResult::new(7, 10).verdict, Verdict::Great);
        assert_eq!(QuizResult::new(6, 9).verdict, Verdict::Average);
        assert_eq!(QuizResult::new(4, 9).verdict, Verdict::TryAgain);
    }
}
