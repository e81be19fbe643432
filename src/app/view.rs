//! Listing markup.
//!
//! The listing is rendered as an HTML fragment and always replaced as a
//! whole. The console reads it back with an HTML parser, so what it prints
//! is exactly what was rendered.

use crate::models::Property;
use anyhow::{Context, Result};
use askama::Template;
use scraper::{Html, Selector};

pub const NO_DESCRIPTION: &str = "No description";

/// Action bound to a listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingAction {
    Edit(i64),
    Delete(i64),
}

impl ListingAction {
    pub fn id(self) -> i64 {
        match self {
            ListingAction::Edit(id) | ListingAction::Delete(id) => id,
        }
    }
}

/// One rendered block, read back as text
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEntry {
    pub lines: Vec<String>,
    pub actions: Vec<ListingAction>,
}

struct ListingBlock<'a> {
    id: i64,
    address: &'a str,
    price: f64,
    size: f64,
    description: &'a str,
}

#[derive(Template)]
#[template(path = "listing.html")]
struct ListingTemplate<'a> {
    blocks: Vec<ListingBlock<'a>>,
}

/// Render one block per property, in the given order
pub fn render_listing(properties: &[Property]) -> Result<String> {
    let blocks = properties
        .iter()
        .map(|property| ListingBlock {
            id: property.id,
            address: &property.address,
            price: property.price,
            size: property.size,
            description: match property.description_or_empty() {
                "" => NO_DESCRIPTION,
                text => text,
            },
        })
        .collect();

    ListingTemplate { blocks }
        .render()
        .context("Failed to render property listing")
}

/// Parse rendered listing markup back into text lines and bound actions
pub fn listing_entries(markup: &str) -> Vec<ListingEntry> {
    let fragment = Html::parse_fragment(markup);
    let (Ok(block), Ok(text), Ok(button)) = (
        Selector::parse("div.property"),
        Selector::parse("h3, p"),
        Selector::parse("button[data-action]"),
    ) else {
        return Vec::new();
    };

    fragment
        .select(&block)
        .map(|element| {
            let lines = element
                .select(&text)
                .map(|node| node.text().collect::<String>().trim().to_string())
                .collect();

            let actions = element
                .select(&button)
                .filter_map(|node| {
                    let id = node.value().attr("data-id")?.parse().ok()?;
                    match node.value().attr("data-action")? {
                        "edit" => Some(ListingAction::Edit(id)),
                        "delete" => Some(ListingAction::Delete(id)),
                        _ => None,
                    }
                })
                .collect();

            ListingEntry { lines, actions }
        })
        .collect()
}
