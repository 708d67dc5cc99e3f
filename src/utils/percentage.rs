use std::{fmt::Display, ops::Deref};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Percentage {
    pub fn new_opt(value: f64) -> Option<Percentage> {
        if value < 0. {
            None
        } else {
            Some(Percentage(value))
        }
    }

    pub fn zero() -> Percentage {
        Percentage(0.)
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Share of completed blocks rounded to a whole percent. An empty catalog counts as 0%.
pub fn completion_percentage(completed: u32, total: u32) -> Percentage {
    if total == 0 {
        return Percentage::zero();
    }
    Percentage::new_opt((completed as f64 / total as f64 * 100.).round())
        .unwrap_or_else(Percentage::zero)
}

#[cfg(test)]
mod tests {
    use super::completion_percentage;

    #[test]
    fn test_completion_percentage_rounds() {
        assert_eq!(*completion_percentage(3, 14), 21.);
        assert_eq!(*completion_percentage(6, 6), 100.);
        assert_eq!(completion_percentage(1, 3).to_string(), "33%");
    }

    #[test]
    fn test_completion_percentage_empty_total() {
        assert_eq!(*completion_percentage(5, 0), 0.);
    }
}
