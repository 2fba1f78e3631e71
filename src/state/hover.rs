use crate::model::Feature;

/// Keys tried in order for the badge text: area, sub-area, point label.
pub const BADGE_KEYS: [&str; 3] = ["DESA", "kelurahan", "Nama_Pemetaan"];

pub const BADGE_PROMPT: &str = "Hover pada fitur";

/// One-line readout of whatever is under the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverBadge {
    pub visible: bool,
    pub text: String,
}

impl HoverBadge {
    pub fn from_pick(picked: Option<&Feature>) -> Self {
        match picked {
            Some(feature) => {
                let text = BADGE_KEYS
                    .iter()
                    .filter_map(|k| feature.get(k))
                    .find(|v| v.is_truthy())
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| BADGE_PROMPT.to_string());
                Self { visible: true, text }
            }
            None => Self::default(),
        }
    }
}
