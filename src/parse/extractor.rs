use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use super::catalog::Pizza;
use super::selector::category_cell_selector;
use super::text::{first_text_from_selection, leading_text, normalize_whitespace};
use super::Error;
use crate::static_selector;

/// Knows how one site marks up its menu entries.
pub trait HtmlExtractor {
    /// Selects every entry element that belongs to the category `label`.
    fn entry_selector(&self, label: &str) -> Result<Selector, Error>;

    /// Turns a single entry element into a pizza.
    fn extract(&self, entry: ElementRef<'_>) -> Result<Pizza, Error>;
}

/// Markup used by pizzaforte.hu:
///
/// ```html
/// <td class="italy_pizza">
///   <h3>Diavola</h3>
///   <p>(paradicsomszósz, mozzarella, szalámi, chili)<br>32 cm 2890 Ft</p>
/// </td>
/// ```
///
/// The parentheses are optional; everything up to the first parenthesis or nested tag is the
/// comma separated topping list.
#[derive(Debug, Default, Clone, Copy)]
pub struct PizzaForteExtractor;

impl HtmlExtractor for PizzaForteExtractor {
    fn entry_selector(&self, label: &str) -> Result<Selector, Error> {
        category_cell_selector(label)
    }

    fn extract(&self, entry: ElementRef<'_>) -> Result<Pizza, Error> {
        static_selector!(NAME_SELECTOR <- "h3");
        static_selector!(DESCRIPTION_SELECTOR <- "p");

        let name = first_text_from_selection(&NAME_SELECTOR, entry, "pizza", "name")?;
        let name = normalize_whitespace(name);

        let description = entry.select(&DESCRIPTION_SELECTOR).next().ok_or_else(|| {
            Error::HtmlParse(format!("Pizza `{name}` should have a description paragraph."))
        })?;
        let description = leading_text(description, "description")?;
        let toppings = split_toppings(description).ok_or_else(|| {
            Error::TextNodeParse(format!("Pizza `{name}` has no topping list."))
        })?;

        Ok(Pizza::new(name, toppings))
    }
}

/// Picks the topping list out of a description and splits it on commas.
/// Returns `None` if no topping could be found.
pub fn split_toppings(description: &str) -> Option<Vec<String>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\s*\(?\s*([^()]+)").expect("regex should be valid"));

    let list = re.captures(description)?.get(1)?.as_str();
    let toppings: Vec<String> = list
        .split(',')
        .map(|t| normalize_whitespace(t).into_owned())
        .filter(|t| !t.is_empty())
        .collect();
    (!toppings.is_empty()).then_some(toppings)
}
