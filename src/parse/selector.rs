use std::sync::OnceLock;

use scraper::Selector;

use super::Error;

/// A css selector that is compiled the first time it is dereferenced.
#[derive(Debug)]
pub(super) struct LazySelector {
    cell: OnceLock<Selector>,
    source: &'static str,
}

impl LazySelector {
    pub(super) const fn new(source: &'static str) -> Self {
        Self {
            cell: OnceLock::new(),
            source,
        }
    }
}

impl core::ops::Deref for LazySelector {
    type Target = Selector;

    fn deref(&self) -> &Self::Target {
        self.cell.get_or_init(|| match Selector::parse(self.source) {
            Ok(sel) => sel,
            Err(e) => panic!("Error parsing static selector {}: {:?}", self.source, e),
        })
    }
}

#[macro_export]
macro_rules! static_selector {
    ($x: ident <- $sel: literal) => {
        static $x: $crate::parse::selector::LazySelector =
            $crate::parse::selector::LazySelector::new($sel);
    };
}

/// Builds the selector for the table cells of one menu category, ex. `td.italy_pizza`.
pub fn category_cell_selector(label: &str) -> Result<Selector, Error> {
    let is_class_name = !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !is_class_name {
        return Err(Error::Selector(format!(
            "Category label `{label}` is not a valid class name."
        )));
    }
    let source = format!("td.{label}_pizza");
    Selector::parse(&source).map_err(|e| Error::Selector(format!("{source}: {e:?}")))
}
