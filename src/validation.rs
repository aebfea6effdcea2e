//! Request body validation.
//!
//! Bodies are first parsed as generic JSON and then checked field by field, so
//! a rejected request reports every violated field at once instead of stopping
//! at the first one.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::ApiError;
use crate::schemas::{ExpensePatch, NewExpense};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    StringType,
    FloatType,
    Null,
    DictType,
    JsonInvalid,
}

impl ViolationKind {
    fn message(self) -> &'static str {
        match self {
            ViolationKind::Missing => "Field required",
            ViolationKind::StringType => "Input should be a valid string",
            ViolationKind::FloatType => "Input should be a valid number",
            ViolationKind::Null => "Input should not be null",
            ViolationKind::DictType => "Input should be a valid dictionary",
            ViolationKind::JsonInvalid => "JSON decode error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldViolation {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: ViolationKind,
}

impl FieldViolation {
    pub fn field(name: &str, kind: ViolationKind) -> Self {
        FieldViolation {
            loc: vec!["body".to_string(), name.to_string()],
            msg: kind.message().to_string(),
            kind,
        }
    }

    pub fn body(kind: ViolationKind, msg: impl Into<String>) -> Self {
        FieldViolation {
            loc: vec!["body".to_string()],
            msg: msg.into(),
            kind,
        }
    }
}

/// Types that can be built from a JSON object after field-level checks.
pub trait FromJsonBody: Sized {
    fn from_json_body(body: &Map<String, Value>) -> Result<Self, Vec<FieldViolation>>;
}

struct Fields<'a> {
    body: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> Fields<'a> {
    fn new(body: &'a Map<String, Value>) -> Self {
        Fields {
            body,
            violations: Vec::new(),
        }
    }

    fn reject(&mut self, name: &str, kind: ViolationKind) {
        self.violations.push(FieldViolation::field(name, kind));
    }

    fn required_str(&mut self, name: &str) -> Option<String> {
        match self.body.get(name) {
            None => {
                self.reject(name, ViolationKind::Missing);
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.reject(name, ViolationKind::StringType);
                None
            }
        }
    }

    fn required_f64(&mut self, name: &str) -> Option<f64> {
        match self.body.get(name) {
            None => {
                self.reject(name, ViolationKind::Missing);
                None
            }
            Some(value) => self.number(name, value),
        }
    }

    /// Absent means untouched; an explicit `null` is rejected.
    fn optional_str(&mut self, name: &str) -> Option<String> {
        match self.body.get(name) {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) => {
                self.reject(name, ViolationKind::Null);
                None
            }
            Some(_) => {
                self.reject(name, ViolationKind::StringType);
                None
            }
        }
    }

    fn optional_f64(&mut self, name: &str) -> Option<f64> {
        match self.body.get(name) {
            None => None,
            Some(Value::Null) => {
                self.reject(name, ViolationKind::Null);
                None
            }
            Some(value) => self.number(name, value),
        }
    }

    /// Outer `None` when absent, `Some(None)` for an explicit `null`.
    fn nullable_str(&mut self, name: &str) -> Option<Option<String>> {
        match self.body.get(name) {
            None => None,
            Some(Value::Null) => Some(None),
            Some(Value::String(s)) => Some(Some(s.clone())),
            Some(_) => {
                self.reject(name, ViolationKind::StringType);
                None
            }
        }
    }

    fn number(&mut self, name: &str, value: &Value) -> Option<f64> {
        match value.as_f64() {
            Some(n) => Some(n),
            None => {
                self.reject(name, ViolationKind::FloatType);
                None
            }
        }
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, Vec<FieldViolation>> {
        match value {
            Some(value) if self.violations.is_empty() => Ok(value),
            _ => Err(self.violations),
        }
    }
}

impl FromJsonBody for NewExpense {
    fn from_json_body(body: &Map<String, Value>) -> Result<Self, Vec<FieldViolation>> {
        let mut fields = Fields::new(body);
        let group_id = fields.required_str("group_id");
        let description = fields.nullable_str("description");
        let amount = fields.required_f64("amount");
        let paid_by = fields.required_str("paid_by");

        let expense = match (group_id, amount, paid_by) {
            (Some(group_id), Some(amount), Some(paid_by)) => Some(NewExpense {
                group_id,
                description: description.flatten(),
                amount,
                paid_by,
            }),
            _ => None,
        };
        fields.finish(expense)
    }
}

impl FromJsonBody for ExpensePatch {
    fn from_json_body(body: &Map<String, Value>) -> Result<Self, Vec<FieldViolation>> {
        let mut fields = Fields::new(body);
        let patch = ExpensePatch {
            description: fields.nullable_str("description"),
            amount: fields.optional_f64("amount"),
            paid_by: fields.optional_str("paid_by"),
        };
        fields.finish(Some(patch))
    }
}

pub fn validate<T: FromJsonBody>(value: Value) -> Result<T, Vec<FieldViolation>> {
    match value {
        Value::Object(body) => T::from_json_body(&body),
        _ => Err(vec![FieldViolation::body(
            ViolationKind::DictType,
            ViolationKind::DictType.message(),
        )]),
    }
}

/// JSON body extractor that rejects with 422 and field-level detail.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: FromJsonBody + 'static> FromRequest for ValidatedJson<T> {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<Value>::from_request(req, payload);
        Box::pin(async move {
            let value = json
                .await
                .map_err(|err| ApiError::Validation(vec![body_violation(err)]))?
                .into_inner();
            validate(value).map(ValidatedJson).map_err(ApiError::Validation)
        })
    }
}

fn body_violation(err: actix_web::Error) -> FieldViolation {
    FieldViolation::body(ViolationKind::JsonInvalid, err.to_string())
}
