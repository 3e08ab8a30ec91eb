// PyO3 bindings for broid_core
use once_cell::sync::Lazy;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyModule};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use broid_core as core;
use core::{BrowserId, BrowserIdBuilder, RequestParts};

// Parallel iterators for batch building
use rayon::prelude::*;

// -------- Builder state (bindings) --------
static BUILDER: Lazy<RwLock<BrowserIdBuilder>> =
    Lazy::new(|| RwLock::new(BrowserIdBuilder::default()));

fn read_builder() -> PyResult<RwLockReadGuard<'static, BrowserIdBuilder>> {
    BUILDER.read().map_err(|_| PyRuntimeError::new_err("builder lock poisoned"))
}

fn write_builder() -> PyResult<RwLockWriteGuard<'static, BrowserIdBuilder>> {
    BUILDER.write().map_err(|_| PyRuntimeError::new_err("builder lock poisoned"))
}

fn parse(id: &str) -> PyResult<BrowserId> {
    id.parse::<BrowserId>().map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Fletcher-style checksum of a string, reduced to one byte.
#[pyfunction]
#[pyo3(text_signature = "(value)")]
fn fletcher8(value: &str) -> u8 {
    core::fletcher8(value)
}

/// Parse a hex BrowserID into its field bytes.
/// Raises ValueError on odd length or non-hex digits.
#[pyfunction]
#[pyo3(text_signature = "(id)")]
fn parse_id(id: &str) -> PyResult<Vec<u8>> {
    Ok(parse(id)?.into_bytes())
}

/// Render field bytes as a lowercase hex BrowserID.
#[pyfunction]
#[pyo3(text_signature = "(fields)")]
fn format_id(fields: Vec<u8>) -> String {
    BrowserId::from(fields).to_string()
}

/// Encode an unsigned 64-bit integer as a BrowserID without leading zero bytes.
#[pyfunction]
#[pyo3(text_signature = "(n)")]
fn id_from_u64(n: u64) -> String {
    BrowserId::from_u64(n).to_string()
}

/// Decode a hex BrowserID into an unsigned 64-bit integer (last 8 bytes only).
#[pyfunction]
#[pyo3(text_signature = "(id)")]
fn id_to_u64(id: &str) -> PyResult<u64> {
    Ok(parse(id)?.to_u64())
}

/// Number of differing fields between two hex BrowserIDs.
#[pyfunction]
#[pyo3(text_signature = "(a, b)")]
fn compare_ids(a: &str, b: &str) -> PyResult<usize> {
    Ok(parse(a)?.compare(&parse(b)?))
}

/// Replace the active builder from a JSON config string. Returns True on success.
#[pyfunction]
#[pyo3(text_signature = "(config_json)")]
fn set_builder_json(config_json: &str) -> PyResult<bool> {
    let b = core::builder_from_json(config_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
    *write_builder()? = b;
    Ok(true)
}

/// Replace the active builder from a JSON config file. Returns True on success.
#[pyfunction]
#[pyo3(text_signature = "(config_path)")]
fn load_builder(config_path: &str) -> PyResult<bool> {
    let b = core::load_builder(config_path).map_err(|e| PyValueError::new_err(e.to_string()))?;
    *write_builder()? = b;
    Ok(true)
}

/// Restore the default header-based builder.
#[pyfunction]
#[pyo3(text_signature = "()")]
fn reset_builder() -> PyResult<bool> {
    *write_builder()? = BrowserIdBuilder::default();
    Ok(true)
}

/// Return the active builder's field count.
#[pyfunction]
#[pyo3(text_signature = "()")]
fn get_builder_status(py: Python) -> PyResult<Py<PyDict>> {
    let b = read_builder()?;
    let d = PyDict::new(py);
    d.set_item("fields", b.len())?;
    Ok(d.unbind())
}

/// Build a BrowserID from a dict of request headers.
/// Cookies are read from the "Cookie" header.
#[pyfunction]
#[pyo3(text_signature = "(headers)")]
fn build_id(headers: HashMap<String, String>) -> PyResult<String> {
    let b = read_builder()?;
    let req: RequestParts = headers.into_iter().collect();
    Ok(b.build(&req).to_string())
}

/// Build BrowserIDs for a batch of header dicts in parallel.
#[pyfunction]
#[pyo3(text_signature = "(requests)")]
fn build_id_batch(requests: Vec<HashMap<String, String>>) -> PyResult<Vec<String>> {
    let b = read_builder()?;
    let builder: &BrowserIdBuilder = &b;
    let ids = requests
        .into_par_iter()
        .map(|headers| {
            let req: RequestParts = headers.into_iter().collect();
            builder.build(&req).to_string()
        })
        .collect();
    Ok(ids)
}

#[pymodule]
#[pyo3(module = "broid_rs")]
fn broid_rs(_py: Python, m: &Bound<PyModule>) -> PyResult<()> {
    m.add(
        "__doc__",
        "Compact request fingerprints (BrowserIDs) from headers and cookies.\n\n\
        Quick start:\n\
        >>> import broid_rs as br\n\
        >>> a = br.build_id({'User-Agent': 'Mozilla/5.0', 'Accept': 'text/html'})\n\
        >>> b = br.build_id({'User-Agent': 'curl/8.0'})\n\
        >>> br.compare_ids(a, b)",
    )?;

    // Id helpers
    m.add_function(wrap_pyfunction!(fletcher8, m)?)?;
    m.add_function(wrap_pyfunction!(parse_id, m)?)?;
    m.add_function(wrap_pyfunction!(format_id, m)?)?;
    m.add_function(wrap_pyfunction!(id_from_u64, m)?)?;
    m.add_function(wrap_pyfunction!(id_to_u64, m)?)?;
    m.add_function(wrap_pyfunction!(compare_ids, m)?)?;

    // Builder APIs
    m.add_function(wrap_pyfunction!(set_builder_json, m)?)?;
    m.add_function(wrap_pyfunction!(load_builder, m)?)?;
    m.add_function(wrap_pyfunction!(reset_builder, m)?)?;
    m.add_function(wrap_pyfunction!(get_builder_status, m)?)?;
    m.add_function(wrap_pyfunction!(build_id, m)?)?;
    m.add_function(wrap_pyfunction!(build_id_batch, m)?)?;

    // Optional: preload a builder config from env var
    if let Ok(path) = std::env::var("BROID_BUILDER_CONFIG") {
        if let Ok(b) = core::load_builder(&path) {
            *write_builder()? = b;
        }
    }

    Ok(())
}
