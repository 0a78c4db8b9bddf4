//! JSON-lines request handling
//!
//! Each request is `{"id": .., "method": .., "params": {..}}`; each
//! response echoes the id with either `result` or `error`.

use std::cmp::Ordering;
use convey_units::{find_path, parse_quantities, parse_quantity, ConversionRegistry, UnitError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use crate::error::ErrorReport;

#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

impl Response {
    pub fn ok(id: Option<JsonValue>, result: JsonValue) -> Self {
        Response { id, result: Some(result), error: None }
    }

    pub fn err(id: Option<JsonValue>, error: ErrorReport) -> Self {
        Response { id, result: None, error: Some(error) }
    }
}

#[derive(Debug, Deserialize)]
struct ConvertParams {
    quantity: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct PairParams {
    left: String,
    right: String,
}

#[derive(Debug, Deserialize)]
struct PathParams {
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct TextParams {
    text: String,
}

/// Dispatch one request against the registry
pub fn handle_request(registry: &ConversionRegistry, request: &Request) -> Response {
    let result = match request.method.as_str() {
        "convert" => params(request).and_then(|p| handle_convert(registry, p)),
        "add" => params(request).and_then(|p| handle_arith(registry, p, Arith::Add)),
        "sub" => params(request).and_then(|p| handle_arith(registry, p, Arith::Sub)),
        "compare" => params(request).and_then(|p| handle_compare(registry, p)),
        "path" => params(request).and_then(|p| handle_path(registry, p)),
        "parse" => params(request).and_then(|p| handle_parse(registry, p)),
        "units" => Ok(json!(registry.units().collect::<Vec<_>>())),
        "rules" => serde_json::to_value(registry).map_err(ErrorReport::invalid_params),
        other => Err(ErrorReport::unknown_method(other)),
    };

    match result {
        Ok(r) => Response::ok(request.id.clone(), r),
        Err(e) => Response::err(request.id.clone(), e),
    }
}

fn params<T: for<'de> Deserialize<'de>>(request: &Request) -> Result<T, ErrorReport> {
    let raw = request.params.clone().unwrap_or(JsonValue::Null);
    serde_json::from_value(raw).map_err(ErrorReport::invalid_params)
}

fn handle_convert(registry: &ConversionRegistry, p: ConvertParams) -> Result<JsonValue, ErrorReport> {
    let q = parse_quantity(&p.quantity, registry)?;
    let converted = q.convert_to(&p.to, registry)?;
    Ok(json!(converted.to_string()))
}

enum Arith {
    Add,
    Sub,
}

fn handle_arith(registry: &ConversionRegistry, p: PairParams, op: Arith) -> Result<JsonValue, ErrorReport> {
    let left = parse_quantity(&p.left, registry)?;
    let right = parse_quantity(&p.right, registry)?;
    let result = match op {
        Arith::Add => left.add(&right, registry)?,
        Arith::Sub => left.sub(&right, registry)?,
    };
    Ok(json!(result.to_string()))
}

fn handle_compare(registry: &ConversionRegistry, p: PairParams) -> Result<JsonValue, ErrorReport> {
    let left = parse_quantity(&p.left, registry)?;
    let right = parse_quantity(&p.right, registry)?;

    let answer = if left.approx_eq(&right, registry)? {
        "equal"
    } else {
        match left.compare(&right, registry)? {
            Ordering::Less => "less",
            Ordering::Greater => "greater",
            Ordering::Equal => "equal",
        }
    };
    Ok(json!(answer))
}

fn handle_path(registry: &ConversionRegistry, p: PathParams) -> Result<JsonValue, ErrorReport> {
    for unit in [&p.from, &p.to] {
        if !registry.has_unit(unit) {
            return Err(UnitError::unknown_unit(unit.as_str()).into());
        }
    }
    let path = find_path(registry, &p.from, &p.to)
        .ok_or_else(|| UnitError::no_path(p.from.as_str(), p.to.as_str()))?;
    Ok(json!(path))
}

fn handle_parse(registry: &ConversionRegistry, p: TextParams) -> Result<JsonValue, ErrorReport> {
    let quantities = parse_quantities(&p.text, registry)?;
    serde_json::to_value(quantities).map_err(ErrorReport::invalid_params)
}
