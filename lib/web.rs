use wasm_bindgen::prelude::*;

use crate::{catalog, Bridge, BridgeError};

thread_local! {
    static BRIDGE: Result<Bridge, BridgeError> = Bridge::new();
}

fn js_error(err: &BridgeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Runs `prog_text` and returns the formatted result. Failures surface as a
/// thrown JS error carrying the diagnostic.
#[wasm_bindgen(js_name = runWandaProg)]
pub fn run_wanda_prog(prog_text: &str) -> Result<String, JsValue> {
    BRIDGE.with(|bridge| match bridge {
        Ok(bridge) => bridge.execute(prog_text).map_err(|err| js_error(&err)),
        Err(err) => Err(js_error(err)),
    })
}

#[wasm_bindgen(js_name = exampleLabels)]
pub fn example_labels() -> Vec<JsValue> {
    catalog::list_examples()
        .iter()
        .map(|entry| JsValue::from_str(entry.label))
        .collect()
}

#[wasm_bindgen(js_name = exampleSource)]
pub fn example_source(label: &str) -> Option<String> {
    catalog::find(label).map(|entry| entry.source.to_string())
}

#[wasm_bindgen(js_name = defaultExample)]
pub fn default_example() -> String {
    catalog::DEFAULT_EXAMPLE.to_string()
}
