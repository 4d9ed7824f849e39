use super::{rank, MatchResult, Report};
use crate::error::Result;
use crate::parse::Catalog;

pub const DEFAULT_CATEGORY: &str = "italy";

/// The current selection: one category and the toppings picked so far, in the order they were
/// picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuQuery {
    category: String,
    toppings: Vec<String>,
}

impl Default for MenuQuery {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY)
    }
}

impl MenuQuery {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            toppings: Vec::new(),
        }
    }

    pub fn select_category(&mut self, label: impl Into<String>) {
        self.category = label.into();
    }

    /// Selecting an already selected topping, or deselecting one that is not selected, does
    /// nothing.
    pub fn set_topping(&mut self, topping: &str, selected: bool) {
        let position = self.toppings.iter().position(|t| t == topping);
        match (selected, position) {
            (true, None) => self.toppings.push(topping.to_owned()),
            (false, Some(i)) => {
                self.toppings.remove(i);
            }
            _ => {}
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn toppings(&self) -> &[String] {
        &self.toppings
    }

    pub fn rank(&self, catalog: &Catalog) -> Result<Vec<MatchResult>> {
        rank(catalog, &self.category, &self.toppings)
    }

    /// Ranks and renders the plain text report in one go.
    pub fn report(&self, catalog: &Catalog) -> Result<String> {
        let results = self.rank(catalog)?;
        Ok(Report::new(&results, !self.toppings.is_empty()).to_string())
    }
}

impl<S: AsRef<str>> FromIterator<S> for MenuQuery {
    /// Collects selected toppings into a query for the default category.
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut query = Self::default();
        for topping in iter {
            query.set_topping(topping.as_ref(), true);
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::filter::tests::italy_catalog;

    #[test]
    fn test_defaults_to_italy() {
        let query = MenuQuery::default();
        assert_eq!(query.category(), "italy");
        assert!(query.toppings().is_empty());
    }

    #[test]
    fn test_toggle_toppings() {
        let mut query = MenuQuery::default();
        query.set_topping("chili", true);
        query.set_topping("tomato", true);
        query.set_topping("chili", true);
        assert_eq!(query.toppings(), ["chili", "tomato"]);
        query.set_topping("chili", false);
        query.set_topping("salami", false);
        assert_eq!(query.toppings(), ["tomato"]);
    }

    #[test]
    fn test_requery_after_change() {
        let catalog = italy_catalog();
        let mut query: MenuQuery = ["tomato", "chili"].into_iter().collect();
        let results = query.rank(&catalog).unwrap();
        assert_eq!(results[0].name, "Diavola");
        assert_eq!(results[0].fitness, 2);

        query.select_category("classic");
        let results = query.rank(&catalog).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.fitness <= 1));

        query.select_category("mexican");
        assert!(matches!(query.rank(&catalog), Err(Error::UnknownCategory(_))));
    }

    #[test]
    fn test_report() {
        let catalog = italy_catalog();
        let query: MenuQuery = ["tomato", "chili"].into_iter().collect();
        assert_eq!(
            query.report(&catalog).unwrap(),
            "Perfect matches:\n  Diavola\n\nPartial matches:\n  Margherita               missing: chili"
        );
    }
}
