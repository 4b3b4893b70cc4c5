use std::fmt;
use std::str::FromStr;

use super::error::StrategyError;
use super::parallel::DEFAULT_CONCURRENCY;

/// How invocations for consecutive items are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// One item at a time, outcomes in input order - DEFAULT
    /// Good for: queue processing, validations with ordered side effects
    #[default]
    Sequential,

    /// Only the newest item; in-flight work is cancelled on arrival
    /// Good for: interactive input where stale results are useless
    Latest,

    /// Up to `concurrency` items at once, outcomes in completion order
    /// Good for: batches with slow remote checks
    Parallel { concurrency: usize },
}

impl Strategy {
    /// Parallel strategy with [`DEFAULT_CONCURRENCY`] slots
    pub fn parallel() -> Self {
        Strategy::Parallel {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sequential => f.write_str("sequential"),
            Strategy::Latest => f.write_str("latest"),
            Strategy::Parallel { concurrency } => write!(f, "parallel:{}", concurrency),
        }
    }
}

impl FromStr for Strategy {
    type Err = StrategyError;

    /// Parse `sequential`, `latest`, `parallel` or `parallel:<n>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();

        match lower.split_once(':') {
            None => match lower.as_str() {
                "sequential" => Ok(Strategy::Sequential),
                "latest" => Ok(Strategy::Latest),
                "parallel" => Ok(Strategy::parallel()),
                _ => Err(StrategyError::Unknown(s.to_string())),
            },
            Some(("parallel", n)) => {
                let concurrency: usize = n
                    .trim()
                    .parse()
                    .map_err(|_| StrategyError::InvalidConcurrency(n.to_string()))?;
                if concurrency == 0 {
                    return Err(StrategyError::InvalidConcurrency(n.to_string()));
                }
                Ok(Strategy::Parallel { concurrency })
            }
            Some(_) => Err(StrategyError::Unknown(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sequential() {
        assert_eq!(Strategy::default(), Strategy::Sequential);
    }

    #[test]
    fn parses_plain_names() {
        assert_eq!("sequential".parse(), Ok(Strategy::Sequential));
        assert_eq!("Latest".parse(), Ok(Strategy::Latest));
        assert_eq!(
            " parallel ".parse(),
            Ok(Strategy::Parallel {
                concurrency: DEFAULT_CONCURRENCY
            })
        );
    }

    #[test]
    fn parses_parallel_with_concurrency() {
        assert_eq!(
            "parallel:3".parse(),
            Ok(Strategy::Parallel { concurrency: 3 })
        );
    }

    #[test]
    fn rejects_unknown_and_bad_concurrency() {
        assert_eq!(
            "fastest".parse::<Strategy>(),
            Err(StrategyError::Unknown("fastest".to_string()))
        );
        assert_eq!(
            "latest:2".parse::<Strategy>(),
            Err(StrategyError::Unknown("latest:2".to_string()))
        );
        assert_eq!(
            "parallel:0".parse::<Strategy>(),
            Err(StrategyError::InvalidConcurrency("0".to_string()))
        );
        assert_eq!(
            "parallel:many".parse::<Strategy>(),
            Err(StrategyError::InvalidConcurrency("many".to_string()))
        );
    }

    #[test]
    fn display_round_trips() {
        for strategy in [
            Strategy::Sequential,
            Strategy::Latest,
            Strategy::Parallel { concurrency: 7 },
        ] {
            assert_eq!(strategy.to_string().parse(), Ok(strategy));
        }
    }
}
