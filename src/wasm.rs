//! WebAssembly bindings.
//!
//! This module provides JavaScript-friendly wrappers around [`BigFixedInt`].

use wasm_bindgen::prelude::*;
use crate::{BigFixedError, BigFixedInt};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_error(e: BigFixedError) -> JsError {
    JsError::new(&e.to_string())
}

/// WebAssembly-friendly wrapper owning one value.
#[wasm_bindgen]
pub struct WasmBigFixed {
    value: BigFixedInt,
}

#[wasm_bindgen]
impl WasmBigFixed {
    /// Create a zero value in `radix`.
    #[wasm_bindgen(constructor)]
    pub fn new(radix: u64) -> Result<WasmBigFixed, JsError> {
        let value = BigFixedInt::new(radix).map_err(js_error)?;
        Ok(Self { value })
    }

    /// Restore a value from the JSON produced by [`WasmBigFixed::to_json`].
    #[wasm_bindgen]
    pub fn from_json(json: &str) -> Result<WasmBigFixed, JsError> {
        let value = serde_json::from_str(json)
            .map_err(|e| JsError::new(&format!("{}", e)))?;
        Ok(Self { value })
    }

    #[wasm_bindgen]
    pub fn add_u64(&mut self, value: u64) -> Result<(), JsError> {
        self.value.add_u64(value).map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn add(&mut self, other: &WasmBigFixed) -> Result<(), JsError> {
        crate::add_into(&mut self.value, &other.value).map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn subtract(&mut self, other: &WasmBigFixed) -> Result<(), JsError> {
        crate::subtract_into(&mut self.value, &other.value).map_err(js_error)
    }

    /// Replace this value with the integer quotient.
    #[wasm_bindgen]
    pub fn divide(&mut self, other: &WasmBigFixed) -> Result<(), JsError> {
        crate::divide_into(&mut self.value, &other.value).map_err(js_error)
    }

    /// -1, 0 or +1.
    #[wasm_bindgen]
    pub fn compare(&self, other: &WasmBigFixed) -> Result<i8, JsError> {
        crate::compare(&self.value, &other.value).map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn clone_value(&self) -> Result<WasmBigFixed, JsError> {
        let value = self.value.try_clone().map_err(js_error)?;
        Ok(Self { value })
    }

    #[wasm_bindgen]
    pub fn radix(&self) -> u64 {
        self.value.radix()
    }

    #[wasm_bindgen]
    pub fn capacity(&self) -> usize {
        self.value.capacity()
    }

    #[wasm_bindgen]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Integer part, if it fits in 64 bits.
    #[wasm_bindgen]
    pub fn to_u64(&self) -> Option<u64> {
        self.value.to_u64()
    }

    /// Digit at a logical position (0 = units).
    #[wasm_bindgen]
    pub fn digit_at(&self, position: isize) -> u64 {
        self.value.digit_at(position)
    }

    /// Get the value as a JSON snapshot.
    #[wasm_bindgen]
    pub fn to_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.value)
            .map_err(|e| JsError::new(&format!("{}", e)))
    }
}
