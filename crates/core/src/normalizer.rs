//! Response Normalizer
//!
//! Turns a raw reply into either an accepted payload or a tagged raw failure.
//! The service does not return a uniform shape across tools or versions, so a
//! reply is accepted when ANY of the following hold:
//!
//! 1. `success == true` and `results` is present
//! 2. `results` is present, whatever `success` says
//! 3. `trust_score` is a number and no `error` is present
//!
//! "Present" follows the service's own truthiness: `null`, `false`, `0` and
//! `""` count as absent.
//!
//! Check order: body must parse as a JSON object (this wins over everything),
//! then HTTP status, then the acceptance rule.

use serde_json::Value;

use crate::classifier::classify;
use crate::outcome::{Outcome, Payload, RawFailure, RawReply};

/// Acceptance predicate signature; adapters may supply their own.
pub type AcceptRule = fn(&Payload) -> bool;

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn error_message(body: &Payload) -> Option<String> {
    let value = body.get("error");
    if !is_present(value) {
        return None;
    }
    value.map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// The default acceptance rule.
pub fn accepts(body: &Payload) -> bool {
    let success = matches!(body.get("success"), Some(Value::Bool(true)));
    let has_results = is_present(body.get("results"));
    let has_score = body.get("trust_score").is_some_and(Value::is_number);
    let has_error = is_present(body.get("error"));

    (success && has_results) || has_results || (has_score && !has_error)
}

/// Parse the body as a JSON object.
pub fn parse_body(reply: &RawReply) -> Result<Payload, RawFailure> {
    match serde_json::from_str::<Value>(&reply.body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(RawFailure::Unparseable {
            body: reply.body.clone(),
        }),
    }
}

/// Normalize with the default acceptance rule.
pub fn normalize(reply: &RawReply) -> Result<Payload, RawFailure> {
    normalize_with(reply, accepts)
}

/// Normalize with a custom acceptance rule.
pub fn normalize_with(reply: &RawReply, accept: AcceptRule) -> Result<Payload, RawFailure> {
    let body = parse_body(reply)?;

    if !reply.is_success_status() {
        return Err(RawFailure::Http {
            status: reply.status,
            message: error_message(&body),
        });
    }

    if accept(&body) {
        Ok(body)
    } else {
        Err(RawFailure::Declared {
            message: error_message(&body),
        })
    }
}

/// Normalize and classify in one step.
pub fn normalize_outcome(reply: &RawReply) -> Outcome {
    outcome_from(normalize(reply))
}

/// Fold a normalization result into an `Outcome`.
pub fn outcome_from(result: Result<Payload, RawFailure>) -> Outcome {
    match result {
        Ok(payload) => Outcome::success(payload),
        Err(failure) => classify(&failure).into_outcome(),
    }
}
