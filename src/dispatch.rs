//! Attribute schema dispatch: turns a feature's attributes into popup lines.
//!
//! The three datasets carry unrelated keys. Every rule is checked against
//! every feature, so one table serves all of them and a feature may produce
//! lines from several rules.

use std::fmt;

use crate::model::{AttrValue, Feature};

pub const POPUP_TITLE: &str = "Informasi Lokasi";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Plain,
    Positive,
    Negative,
}

pub type Formatter = fn(&AttrValue) -> (String, Tone);

#[derive(Clone, Copy)]
pub struct AttributeRule {
    pub key: &'static str,
    pub label: &'static str,
    pub format: Formatter,
}

impl AttributeRule {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            format: plain,
        }
    }

    pub const fn with_format(key: &'static str, label: &'static str, format: Formatter) -> Self {
        Self { key, label, format }
    }

    /// The line this rule contributes, if the key is present and truthy.
    pub fn apply(&self, feature: &Feature) -> Option<PopupLine> {
        let value = feature.get(self.key).filter(|v| v.is_truthy())?;
        let (text, tone) = (self.format)(value);
        Some(PopupLine {
            label: self.label,
            value: text,
            tone,
        })
    }
}

impl fmt::Debug for AttributeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeRule")
            .field("key", &self.key)
            .field("label", &self.label)
            .finish()
    }
}

pub fn plain(value: &AttrValue) -> (String, Tone) {
    (value.to_string(), Tone::Plain)
}

/// "Aktif" reads as good news, any other status as bad.
pub fn status(value: &AttrValue) -> (String, Tone) {
    let tone = if value.as_text() == Some("Aktif") {
        Tone::Positive
    } else {
        Tone::Negative
    };
    (value.to_string(), tone)
}

/// Flood points, then boundary polygons, then RT/RW and waste points.
pub const DEFAULT_RULES: [AttributeRule; 9] = [
    AttributeRule::new("Nama_Pemetaan", "Nama Daerah"),
    AttributeRule::new("Jumlah_Korban", "Jumlah Korban"),
    AttributeRule::new("DESA", "Desa"),
    AttributeRule::new("OBJECTID", "ID"),
    AttributeRule::new("kelurahan", "Kelurahan"),
    AttributeRule::new("rt", "RT"),
    AttributeRule::new("rw", "RW"),
    AttributeRule::new("type", "Tipe"),
    AttributeRule::with_format("status", "Status", status),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopupLine {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

impl fmt::Display for PopupLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PopupContent {
    pub lines: Vec<PopupLine>,
}

impl PopupContent {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Lines joined by newlines, each `label: value`.
impl fmt::Display for PopupContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct DispatchTable {
    rules: Vec<AttributeRule>,
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl DispatchTable {
    pub fn new(rules: Vec<AttributeRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    pub fn render(&self, feature: &Feature) -> PopupContent {
        PopupContent {
            lines: self.rules.iter().filter_map(|r| r.apply(feature)).collect(),
        }
    }
}
