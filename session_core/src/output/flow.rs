//! Flow documents - the `__flow__.json` files that tell the app how to walk a
//! directory of sessions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowMode {
    /// The user picks one entry.
    Select,
    /// Entries are served in order.
    Sequential,
}

/// A flow document. Unset options are left out of the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub mode: FlowMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_case: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Display label to directory name, in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selections: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl Flow {
    fn with_mode(mode: FlowMode) -> Self {
        Self {
            mode,
            title_case: None,
            column_count: None,
            text: None,
            title: None,
            selections: None,
            last_item: None,
            take: None,
            repeat: None,
            size: None,
        }
    }

    /// A selection screen showing `text`.
    pub fn select(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::with_mode(FlowMode::Select)
        }
    }

    pub fn sequential() -> Self {
        Self::with_mode(FlowMode::Sequential)
    }

    pub fn with_title_case(mut self) -> Self {
        self.title_case = Some(true);
        self
    }

    pub fn with_columns(mut self, count: u32) -> Self {
        self.column_count = Some(count);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Explicit selections as `(label, directory)` pairs, order preserved.
    pub fn with_selections<I, L, D>(mut self, selections: I) -> Self
    where
        I: IntoIterator<Item = (L, D)>,
        L: Into<String>,
        D: Into<String>,
    {
        self.selections = Some(
            selections
                .into_iter()
                .map(|(label, dir)| (label.into(), Value::String(dir.into())))
                .collect(),
        );
        self
    }

    pub fn with_last_item(mut self, item: impl Into<String>) -> Self {
        self.last_item = Some(item.into());
        self
    }

    pub fn with_take(mut self, take: u32) -> Self {
        self.take = Some(take);
        self
    }

    pub fn with_repeat(mut self) -> Self {
        self.repeat = Some(true);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sequential_flow() {
        let flow = Flow::sequential().with_take(1).with_repeat();
        assert_eq!(
            serde_json::to_value(&flow).unwrap(),
            json!({"mode": "sequential", "take": 1, "repeat": true})
        );
    }

    #[test]
    fn test_selections_keep_order() {
        let flow = Flow::select("Pick one")
            .with_title_case()
            .with_columns(2)
            .with_selections([("Zeta", "z"), ("Alpha", "a")]);

        let value = serde_json::to_value(&flow).unwrap();
        let labels: Vec<&String> = value["selections"].as_object().unwrap().keys().collect();
        assert_eq!(labels, vec!["Zeta", "Alpha"]);
        assert_eq!(value["column_count"], 2);
        assert_eq!(value["mode"], "select");
    }
}
