use js_sys::Function;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use onview_api_core::ElementPath;
use onview_page_core::{
    Config, IdentityResolver, PageController, PageInputs, PageSpec, ScrollSample, TargetResolver,
    UiCommand,
};

#[wasm_bindgen]
pub struct OnviewPage {
    ctrl: PageController,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// JS resolver callback: `resolver(path: string) -> string | number | null`.
/// Returning null/undefined marks the element as absent; the corresponding
/// role is skipped and the page otherwise behaves normally.
struct JsResolver {
    f: Function,
}

impl TargetResolver for JsResolver {
    fn resolve(&mut self, path: &ElementPath) -> Option<String> {
        let arg = JsValue::from_str(&path.to_string());
        match self.f.call1(&JsValue::UNDEFINED, &arg) {
            Ok(val) => {
                if val.is_undefined() || val.is_null() {
                    return None;
                }
                if let Some(s) = val.as_string() {
                    return Some(s);
                }
                if let Some(n) = val.as_f64() {
                    return Some(if n.fract() == 0.0 {
                        format!("{}", n as i64)
                    } else {
                        format!("{}", n)
                    });
                }
                swb::from_value::<String>(val).ok()
            }
            Err(_) => None,
        }
    }
}

#[wasm_bindgen]
impl OnviewPage {
    /// Create a page controller from a PageSpec JS object, with optional
    /// engine config and an optional path resolver callback.
    /// Example:
    ///   new OnviewPage(spec, { settle_frames: 2 }, path => document.querySelector(...) && path)
    #[wasm_bindgen(constructor)]
    pub fn new(
        spec: JsValue,
        config: JsValue,
        resolver: Option<Function>,
    ) -> Result<OnviewPage, JsError> {
        console_error_panic_hook::set_once();

        let spec: PageSpec = swb::from_value(spec)
            .map_err(|e| JsError::new(&format!("page spec error: {e}")))?;
        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        let ctrl = match resolver {
            Some(f) => {
                let mut js_resolver = JsResolver { f };
                PageController::build_with(&spec, cfg, &mut js_resolver)
            }
            None => PageController::build_with(&spec, cfg, &mut IdentityResolver),
        }
        .map_err(|e| JsError::new(&format!("page build error: {e}")))?;

        Ok(OnviewPage { ctrl })
    }

    /// Parse a PageSpec from JSON text instead of a JS object.
    #[wasm_bindgen(js_name = from_json)]
    pub fn from_json(spec_json: String, config: JsValue) -> Result<OnviewPage, JsError> {
        console_error_panic_hook::set_once();
        let spec = PageSpec::from_json(&spec_json)
            .map_err(|e| JsError::new(&format!("page spec error: {e}")))?;
        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let ctrl = PageController::build(&spec, cfg)
            .map_err(|e| JsError::new(&format!("page build error: {e}")))?;
        Ok(OnviewPage { ctrl })
    }

    /// Step the page by dt (milliseconds) with inputs JSON matching
    /// PageInputs. Returns PageOutputs JSON: `{ writes, events }`.
    #[wasm_bindgen]
    pub fn update(&mut self, dt_ms: f64, inputs_json: JsValue) -> Result<JsValue, JsError> {
        let inputs: PageInputs = if jsvalue_is_undefined_or_null(&inputs_json) {
            PageInputs::default()
        } else {
            swb::from_value(inputs_json)
                .map_err(|e| JsError::new(&format!("inputs error: {e}")))?
        };
        let out = self.ctrl.update(dt_ms, inputs);
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Convenience: step with a single visibility sample, as delivered by
    /// an IntersectionObserver entry.
    #[wasm_bindgen(js_name = report_visibility)]
    pub fn report_visibility(
        &mut self,
        dt_ms: f64,
        target: String,
        fraction: f32,
    ) -> Result<JsValue, JsError> {
        let out = self.ctrl.update(dt_ms, PageInputs::visible(&target, fraction));
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Convenience: a tab button click.
    #[wasm_bindgen(js_name = select_tab)]
    pub fn select_tab(
        &mut self,
        dt_ms: f64,
        group: String,
        panel: usize,
    ) -> Result<JsValue, JsError> {
        let out = self
            .ctrl
            .update(dt_ms, PageInputs::command(UiCommand::SelectTab { group, panel }));
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Convenience: a nav link click; the returned events contain the
    /// scroll request for the host to execute with smooth behavior.
    #[wasm_bindgen(js_name = click_nav)]
    pub fn click_nav(&mut self, dt_ms: f64, section: String) -> Result<JsValue, JsError> {
        let out = self
            .ctrl
            .update(dt_ms, PageInputs::command(UiCommand::NavClick { section }));
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Convenience: a scroll event.
    #[wasm_bindgen(js_name = set_scroll)]
    pub fn set_scroll(
        &mut self,
        dt_ms: f64,
        scroll_y: f32,
        viewport_h: f32,
        doc_h: f32,
    ) -> Result<JsValue, JsError> {
        let inputs = PageInputs {
            scroll: Some(ScrollSample {
                scroll_y,
                viewport_h,
                doc_h,
            }),
            ..PageInputs::default()
        };
        let out = self.ctrl.update(dt_ms, inputs);
        swb::to_value(out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Replace cached section offsets after a layout change. Accepts an
    /// array of `[sectionId, topPx]` pairs.
    #[wasm_bindgen(js_name = set_section_offsets)]
    pub fn set_section_offsets(&mut self, offsets: JsValue) -> Result<(), JsError> {
        let offsets: Vec<(String, f32)> = swb::from_value(offsets)
            .map_err(|e| JsError::new(&format!("offsets error: {e}")))?;
        self.ctrl.set_section_offsets(&offsets);
        Ok(())
    }

    /// Begin a fresh page lifetime (single-page-app re-navigation). Within
    /// one lifetime, one-shots never replay.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.ctrl.reset();
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
