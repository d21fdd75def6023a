use serde::Deserialize;

// jqGrid envelope: {"page":1,"total":..,"records":..,"rows":[{"id":..,"cell":[..]}]}
#[derive(Deserialize)]
pub(crate) struct GridEnvelope {
    #[serde(default)]
    pub(crate) rows: Option<Vec<GridRow>>,
}

#[derive(Deserialize)]
pub(crate) struct GridRow {
    #[serde(default)]
    pub(crate) cell: Option<Vec<serde_json::Value>>,
}

pub(crate) fn cell_text(v: serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
