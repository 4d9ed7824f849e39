use std::fmt::{self, Display, Formatter};

use super::MatchResult;

const NAME_WIDTH: usize = 20;

/// Plain text rendering of a ranking.
#[derive(Debug, Clone, Copy)]
pub enum Report<'a> {
    /// Nothing was requested, so every pizza will do.
    AnyPizza(&'a [MatchResult]),
    Matches(&'a [MatchResult]),
}

impl<'a> Report<'a> {
    pub const fn new(results: &'a [MatchResult], toppings_requested: bool) -> Self {
        if toppings_requested {
            Self::Matches(results)
        } else {
            Self::AnyPizza(results)
        }
    }
}

fn write_names<'a>(
    f: &mut Formatter<'_>,
    results: impl Iterator<Item = &'a MatchResult>,
) -> fmt::Result {
    for (i, result) in results.enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        write!(f, "  {}", result.name)?;
    }
    Ok(())
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnyPizza(results) => {
                writeln!(f, "Any pizza works for you!")?;
                write_names(f, results.iter())
            }
            Self::Matches(results) => {
                let mut perfect = results.iter().filter(|r| r.missing.is_empty()).peekable();
                if perfect.peek().is_some() {
                    writeln!(f, "Perfect matches:")?;
                    write_names(f, perfect)?;
                    write!(f, "\n\n")?;
                }
                write!(f, "Partial matches:")?;
                // zero fitness pizzas are listed too
                for result in results.iter().filter(|r| !r.missing.is_empty()) {
                    write!(
                        f,
                        "\n  {:<width$}     missing: {}",
                        result.name,
                        result.missing.join(", "),
                        width = NAME_WIDTH
                    )?;
                }
                Ok(())
            }
        }
    }
}
