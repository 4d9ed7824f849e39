mod query;
mod report;

pub use query::MenuQuery;
pub use report::Report;

use juniper::graphql_object;

use crate::error::{Error, Result};
use crate::parse::{Catalog, Pizza};

/// How well one pizza covers the requested toppings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub name: String,
    /// number of requested toppings on the pizza
    pub fitness: usize,
    /// requested toppings absent from the pizza, in request order
    pub missing: Vec<String>,
}

impl MatchResult {
    fn score(pizza: &Pizza, requested: &[&str]) -> Self {
        let (present, missing): (Vec<&str>, Vec<&str>) =
            requested.iter().copied().partition(|t| pizza.has_topping(t));
        Self {
            name: pizza.name().to_owned(),
            fitness: present.len(),
            missing: missing.into_iter().map(ToOwned::to_owned).collect(),
        }
    }
}

#[graphql_object]
impl MatchResult {
    #[graphql(name = "name")]
    fn graphql_name(&self) -> &str {
        &self.name
    }
    #[graphql(name = "fitness")]
    fn graphql_fitness(&self) -> i32 {
        i32::try_from(self.fitness).unwrap_or(i32::MAX)
    }
    #[graphql(name = "missing")]
    fn graphql_missing(&self) -> Vec<&str> {
        self.missing.iter().map(String::as_str).collect()
    }
}

/// Ranks every pizza of the category `label` by how many of the `requested` toppings it has.
///
/// Results are ordered by fitness, highest first, and by name among equal fitness. Repeated
/// toppings in `requested` only count once.
pub fn rank<S: AsRef<str>>(
    catalog: &Catalog,
    label: &str,
    requested: &[S],
) -> Result<Vec<MatchResult>> {
    let category = catalog
        .category(label)
        .ok_or_else(|| Error::UnknownCategory(label.to_owned()))?;

    let mut unique: Vec<&str> = Vec::with_capacity(requested.len());
    for topping in requested.iter().map(AsRef::as_ref) {
        if !unique.contains(&topping) {
            unique.push(topping);
        }
    }

    let mut results: Vec<MatchResult> = category
        .pizzas()
        .iter()
        .map(|pizza| MatchResult::score(pizza, &unique))
        .collect();
    results.sort_by(|a, b| b.fitness.cmp(&a.fitness).then_with(|| a.name.cmp(&b.name)));
    log::debug!(
        "Ranked {} `{label}` pizzas against {} toppings",
        results.len(),
        unique.len()
    );
    Ok(results)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::parse::Category;

    pub(crate) fn italy_catalog() -> Catalog {
        let mut italy = Category::new("italy");
        italy.insert(Pizza::new("Margherita", ["tomato", "mozzarella"]));
        italy.insert(Pizza::new(
            "Diavola",
            ["tomato", "mozzarella", "salami", "chili"],
        ));
        let mut classic = Category::new("classic");
        classic.insert(Pizza::new("Songoku", ["tomato", "ham", "corn"]));
        classic.insert(Pizza::new("Hawaii", ["tomato", "ham", "pineapple"]));
        classic.insert(Pizza::new("Bacon", ["sour cream", "bacon"]));
        vec![italy, classic].into()
    }

    fn names(results: &[MatchResult]) -> Vec<&str> {
        results.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_rank_example() {
        let catalog = italy_catalog();
        let results = rank(&catalog, "italy", &["tomato", "chili"]).unwrap();
        assert_eq!(
            results,
            vec![
                MatchResult {
                    name: "Diavola".into(),
                    fitness: 2,
                    missing: vec![],
                },
                MatchResult {
                    name: "Margherita".into(),
                    fitness: 1,
                    missing: vec!["chili".into()],
                },
            ]
        );
    }

    #[test]
    fn test_rank_without_toppings() {
        let catalog = italy_catalog();
        let results = rank::<&str>(&catalog, "italy", &[]).unwrap();
        assert_eq!(names(&results), ["Diavola", "Margherita"]);
        assert!(results.iter().all(|r| r.fitness == 0 && r.missing.is_empty()));
    }

    #[test]
    fn test_unknown_category() {
        let catalog = italy_catalog();
        let err = rank(&catalog, "mexican", &["tomato"]).unwrap_err();
        assert!(matches!(err, Error::UnknownCategory(label) if label == "mexican"));
    }

    #[test]
    fn test_ties_sorted_by_name() {
        let catalog = italy_catalog();
        // storage order is Songoku, Hawaii, Bacon
        let results = rank(&catalog, "classic", &["ham", "bacon"]).unwrap();
        assert_eq!(names(&results), ["Bacon", "Hawaii", "Songoku"]);
        assert!(results.iter().all(|r| r.fitness == 1));
    }

    #[test]
    fn test_zero_fitness_is_kept() {
        let catalog = italy_catalog();
        let results = rank(&catalog, "classic", &["pineapple"]).unwrap();
        assert_eq!(names(&results), ["Hawaii", "Bacon", "Songoku"]);
        assert_eq!(results[2].fitness, 0);
        assert_eq!(results[2].missing, ["pineapple"]);
    }

    #[test]
    fn test_missing_keeps_request_order() {
        let catalog = italy_catalog();
        let requested = ["salami", "corn", "tomato", "anchovy", "corn"];
        let results = rank(&catalog, "italy", &requested).unwrap();
        let margherita = results.iter().find(|r| r.name == "Margherita").unwrap();
        assert_eq!(margherita.missing, ["salami", "corn", "anchovy"]);
        assert_eq!(margherita.fitness, 1);
        for result in &results {
            assert_eq!(result.fitness + result.missing.len(), 4);
            assert!(result.fitness <= 4);
        }
    }

    #[test]
    fn test_rank_is_idempotent() {
        let catalog = italy_catalog();
        let first = rank(&catalog, "classic", &["tomato", "corn"]).unwrap();
        let second = rank(&catalog, "classic", &["tomato", "corn"]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_case_sensitive() {
        let catalog = italy_catalog();
        let results = rank(&catalog, "italy", &["Tomato"]).unwrap();
        assert!(results.iter().all(|r| r.fitness == 0));
    }
}
