use std::collections::BTreeSet;
use std::sync::OnceLock;

use juniper::graphql_object;
use regex::Regex;
use scraper::Html;

use super::extractor::HtmlExtractor;
use super::Error;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Pizza {
    name: String,
    toppings: BTreeSet<String>,
}

impl Pizza {
    pub fn new(
        name: impl Into<String>,
        toppings: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            toppings: toppings.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_topping(&self, topping: &str) -> bool {
        self.toppings.contains(topping)
    }

    pub fn toppings(&self) -> impl Iterator<Item = &str> {
        self.toppings.iter().map(String::as_str)
    }
}

#[graphql_object]
impl Pizza {
    pub fn name(&self) -> &str {
        &self.name
    }

    #[graphql(name = "toppings")]
    pub fn topping_list(&self) -> Vec<&str> {
        self.toppings().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Category {
    label: String,
    pizzas: Vec<Pizza>,
}

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pizzas: Vec::new(),
        }
    }

    /// Adds a pizza, replacing any earlier pizza with the same name.
    pub fn insert(&mut self, pizza: Pizza) {
        match self.pizzas.iter_mut().find(|p| p.name == pizza.name) {
            Some(existing) => *existing = pizza,
            None => self.pizzas.push(pizza),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pizzas(&self) -> &[Pizza] {
        &self.pizzas
    }

    pub fn is_empty(&self) -> bool {
        self.pizzas.is_empty()
    }
}

/// Parses every entry of the category `label`.
///
/// Entries that do not have the expected shape are skipped and returned next to the category,
/// so one broken entry never takes the rest of the menu down with it.
pub fn parse_category(
    document: &Html,
    label: &str,
    extractor: &impl HtmlExtractor,
) -> Result<(Category, Vec<Error>), Error> {
    let selector = extractor.entry_selector(label)?;
    let mut category = Category::new(label);
    let mut skipped = vec![];
    for entry in document.select(&selector) {
        match extractor.extract(entry) {
            Ok(pizza) => category.insert(pizza),
            Err(e) => {
                log::warn!("Skipping malformed `{label}` entry: {e}");
                skipped.push(e);
            }
        }
    }
    Ok((category, skipped))
}

/// Every distinct topping of every category, sorted.
///
/// Tokens containing a digit are left out since on the scraped page they are sizes and prices
/// that leaked into the topping text.
pub fn build_topping_universe(categories: &[Category]) -> BTreeSet<String> {
    static DIGIT: OnceLock<Regex> = OnceLock::new();
    let digit = DIGIT.get_or_init(|| Regex::new(r"\d").expect("regex should be valid"));
    categories
        .iter()
        .flat_map(Category::pizzas)
        .flat_map(Pizza::toppings)
        .map(str::trim)
        .filter(|t| !t.is_empty() && !digit.is_match(t))
        .map(ToOwned::to_owned)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<Category>", into = "Vec<Category>")]
pub struct Catalog {
    categories: Vec<Category>,
    toppings: BTreeSet<String>,
}

impl From<Vec<Category>> for Catalog {
    fn from(categories: Vec<Category>) -> Self {
        let toppings = build_topping_universe(&categories);
        Self {
            categories,
            toppings,
        }
    }
}

impl From<Catalog> for Vec<Category> {
    fn from(catalog: Catalog) -> Self {
        catalog.categories
    }
}

impl Catalog {
    /// Parses the categories `labels` out of a menu page.
    ///
    /// Fails if not a single entry of any category could be parsed, which means the page is not
    /// in the expected format at all.
    pub fn from_html(
        html: &str,
        labels: &[String],
        extractor: &impl HtmlExtractor,
    ) -> Result<Self, Error> {
        let document = Html::parse_document(html);
        let mut categories = Vec::with_capacity(labels.len());
        let mut skipped = 0;
        for label in labels {
            let (category, errors) = parse_category(&document, label, extractor)?;
            log::info!(
                "Parsed {} `{label}` pizzas, skipped {}",
                category.pizzas().len(),
                errors.len()
            );
            skipped += errors.len();
            categories.push(category);
        }
        if categories.iter().all(Category::is_empty) {
            return Err(Error::HtmlParse(format!(
                "No menu entry could be parsed ({skipped} malformed), the page format is not recognised."
            )));
        }
        Ok(categories.into())
    }

    pub fn category(&self, label: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.label == label)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub const fn toppings(&self) -> &BTreeSet<String> {
        &self.toppings
    }

    pub fn pizza_count(&self) -> usize {
        self.categories.iter().map(|c| c.pizzas.len()).sum()
    }
}
