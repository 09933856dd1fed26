//! WebAssembly entry points for browser front ends.
//!
//! Buffers cross the boundary by value: the caller hands over the encoded
//! image and coefficients, and receives owned JPEG bytes back. Failures
//! surface in JavaScript as thrown `Error`s carrying the message.

use wasm_bindgen::prelude::*;

fn run(
    image_data: &[u8],
    width: u32,
    height: u32,
    coefficients: &[f64],
) -> holowarp::Result<Vec<u8>> {
    holowarp::transform(image_data, width, height, coefficients)
}

/// Warp an encoded image through the polynomial whose `(re, im)`
/// coefficient pairs are flattened into `coefficients`.
///
/// Returns JPEG bytes for a `width x height` canvas.
#[wasm_bindgen]
pub fn transform_image(
    image_data: Vec<u8>,
    width: u32,
    height: u32,
    coefficients: Vec<f64>,
) -> Result<Vec<u8>, JsError> {
    Ok(run(&image_data, width, height, &coefficients)?)
}

/// Get the library version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
