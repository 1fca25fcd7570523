//! Terminal stand-in for the invitation's countdown block.

use std::rc::Rc;

use invitation_core::{Element, Field, MemoryElement, MemoryPage};

/// A page holding only the four countdown fields.
pub struct CountdownBlock {
    pub page: Rc<MemoryPage>,
    fields: Vec<(Field, Rc<MemoryElement>)>,
    marker_class: String,
}

impl CountdownBlock {
    pub fn new(marker_class: &str) -> Self {
        let page = Rc::new(MemoryPage::new(0.0, 0.0));
        let fields = Field::ALL
            .iter()
            .map(|&f| {
                let el = page.add(MemoryElement::new().with_attribute("data-countdown", f.key()));
                (f, el)
            })
            .collect();
        Self {
            page,
            fields,
            marker_class: marker_class.to_string(),
        }
    }

    /// One status line, e.g. `06 days  17h 52m *52s`. Fields still
    /// animating a change are starred.
    pub fn line(&self) -> String {
        self.fields
            .iter()
            .map(|(field, el)| {
                let mark = if el.has_class(&self.marker_class) { "*" } else { "" };
                let unit = match field {
                    Field::Days => " days ",
                    Field::Hours => "h",
                    Field::Minutes => "m",
                    Field::Seconds => "s",
                };
                format!("{mark}{}{unit}", el.text())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_shows_all_fields() {
        let block = CountdownBlock::new("ticking");
        for (_, el) in &block.fields {
            el.set_text("05");
        }
        block.fields[3].1.add_class("ticking");
        assert_eq!(block.line(), "05 days  05h 05m *05s");
    }
}
