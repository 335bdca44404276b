use jsonschema::Validator;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ProcedureError;

/// The external procedure registry the pipeline dispatches against.
///
/// The core treats this as an opaque capability keyed by procedure name:
/// schemas, validation rules, and the actual business logic all live behind
/// this seam.
pub trait ProcedureRegistry: Send + Sync {
    /// Validate arguments against the procedure's parameter schema.
    fn validate_parameters(&self, name: &str, args: Value) -> Result<Value, ProcedureError>;

    /// Execute the named procedure with validated arguments.
    fn invoke(&self, name: &str, args: Value) -> Result<Value, ProcedureError>;

    /// Validate/clean the raw result against the procedure's return schema.
    fn validate_result(&self, name: &str, result: Value) -> Result<Value, ProcedureError>;
}

/// The executable part of a procedure descriptor.
pub type Invoker = Arc<dyn Fn(Value) -> Result<Value, ProcedureError> + Send + Sync>;

/// A typed invocation descriptor: compiled parameter schema, invoker, and an
/// optional compiled result schema.
struct ProcedureDescriptor {
    parameters: Validator,
    result: Option<Validator>,
    invoker: Invoker,
}

/// A [`ProcedureRegistry`] backed by a lookup table built once at startup.
///
/// Procedure names resolve through a plain map to descriptors whose JSON
/// Schemas are compiled at registration time, so per-request validation never
/// recompiles anything.
#[derive(Default)]
pub struct InMemoryRegistry {
    procedures: HashMap<String, ProcedureDescriptor>,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedure under `name`.
    ///
    /// `parameters` is the JSON Schema the mapped arguments must satisfy.
    /// `result` is the optional return schema; procedures without one pass
    /// their result through unvalidated. Schema compilation failures are
    /// startup configuration errors, not request-time failures.
    pub fn register<F>(
        &mut self,
        name: &str,
        parameters: &Value,
        result: Option<&Value>,
        invoker: F,
    ) -> anyhow::Result<()>
    where
        F: Fn(Value) -> Result<Value, ProcedureError> + Send + Sync + 'static,
    {
        let parameters = jsonschema::validator_for(parameters)
            .map_err(|e| anyhow::anyhow!("invalid parameter schema for procedure {name}: {e}"))?;
        let result = match result {
            Some(schema) => Some(jsonschema::validator_for(schema).map_err(|e| {
                anyhow::anyhow!("invalid result schema for procedure {name}: {e}")
            })?),
            None => None,
        };

        info!(procedure = %name, has_result_schema = result.is_some(), "Procedure registered");
        self.procedures.insert(
            name.to_string(),
            ProcedureDescriptor {
                parameters,
                result,
                invoker: Arc::new(invoker),
            },
        );
        Ok(())
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.procedures.contains_key(name)
    }

    fn descriptor(&self, name: &str) -> Result<&ProcedureDescriptor, ProcedureError> {
        self.procedures.get(name).ok_or_else(|| {
            ProcedureError::unknown(format!("no procedure registered under '{name}'"))
                .with_code("procedurenotfound")
        })
    }
}

impl ProcedureRegistry for InMemoryRegistry {
    fn validate_parameters(&self, name: &str, args: Value) -> Result<Value, ProcedureError> {
        let desc = self.descriptor(name)?;
        let violations: Vec<String> = desc
            .parameters
            .iter_errors(&args)
            .map(|e| e.to_string())
            .collect();
        if violations.is_empty() {
            Ok(args)
        } else {
            debug!(procedure = %name, violations = violations.len(), "Parameter schema violated");
            Err(ProcedureError::validation("invalid parameter value detected")
                .with_code("invalidparameter")
                .with_debug_info(violations.join("; ")))
        }
    }

    fn invoke(&self, name: &str, args: Value) -> Result<Value, ProcedureError> {
        let desc = self.descriptor(name)?;
        (desc.invoker)(args)
    }

    fn validate_result(&self, name: &str, result: Value) -> Result<Value, ProcedureError> {
        let desc = self.descriptor(name)?;
        let Some(schema) = &desc.result else {
            return Ok(result);
        };
        let violations: Vec<String> = schema.iter_errors(&result).map(|e| e.to_string()).collect();
        if violations.is_empty() {
            Ok(result)
        } else {
            debug!(procedure = %name, violations = violations.len(), "Result schema violated");
            Err(ProcedureError::validation("invalid response value detected")
                .with_code("invalidresponse")
                .with_debug_info(violations.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> InMemoryRegistry {
        let mut reg = InMemoryRegistry::new();
        reg.register(
            "echo",
            &json!({"type": "object"}),
            Some(&json!({"type": "object"})),
            Ok,
        )
        .unwrap();
        reg
    }

    #[test]
    fn test_unknown_procedure() {
        let reg = registry();
        let err = reg.invoke("nope", json!({})).unwrap_err();
        assert!(err.has_code("procedurenotfound"));
    }

    #[test]
    fn test_parameter_schema_enforced() {
        let reg = registry();
        assert!(reg.validate_parameters("echo", json!({"a": 1})).is_ok());
        let err = reg.validate_parameters("echo", json!([1, 2])).unwrap_err();
        assert!(err.has_code("invalidparameter"));
        assert!(err.debug_info.is_some());
    }

    #[test]
    fn test_missing_result_schema_passes_through() {
        let mut reg = InMemoryRegistry::new();
        reg.register("raw", &json!({"type": "object"}), None, Ok)
            .unwrap();
        let out = reg.validate_result("raw", json!("anything")).unwrap();
        assert_eq!(out, json!("anything"));
    }
}
