//! Barcode labels: one label per unit of stock requested, printed through a browser window

pub mod code128;
pub mod print;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub use code128::Code128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BarcodeError {
    #[error("nothing to encode")]
    Empty,
    #[error("'{0}' cannot be encoded in Code 128")]
    UnsupportedChar(char),
    #[error("unknown paper size '{0}' (expected A4, A5, Letter or Legal)")]
    UnknownPaper(String),
    #[error("no labels requested")]
    NoLabels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PaperSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
}

impl PaperSize {
    pub const ALL: [PaperSize; 4] = [PaperSize::A4, PaperSize::A5, PaperSize::Letter, PaperSize::Legal];

    /// Value for the CSS `@page { size: ... }` rule
    pub fn css_size(&self) -> &'static str {
        match self {
            PaperSize::A4 => "A4",
            PaperSize::A5 => "A5",
            PaperSize::Letter => "letter",
            PaperSize::Legal => "legal",
        }
    }

    /// Labels per row on this sheet
    pub fn columns(&self) -> usize {
        match self {
            PaperSize::A5 => 2,
            PaperSize::A4 | PaperSize::Letter | PaperSize::Legal => 3,
        }
    }

    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaperSize::A4 => "A4",
            PaperSize::A5 => "A5",
            PaperSize::Letter => "Letter",
            PaperSize::Legal => "Legal",
        };
        f.write_str(name)
    }
}

impl FromStr for PaperSize {
    type Err = BarcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BarcodeError::UnknownPaper(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for PaperSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// How many labels to print for one product
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRequest {
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: String,
    pub price: f64,
    pub barcode: Code128,
}

/// One label per requested unit, in request order
pub fn expand_labels(requests: &[LabelRequest]) -> Result<Vec<Label>, BarcodeError> {
    let mut labels = Vec::new();
    for request in requests.iter().filter(|r| r.quantity > 0) {
        let barcode = Code128::encode(&request.sku)?;
        for _ in 0..request.quantity {
            labels.push(Label {
                name: request.name.clone(),
                price: request.price,
                barcode: barcode.clone(),
            });
        }
    }
    Ok(labels)
}
