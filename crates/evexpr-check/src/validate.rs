//! Semantic validation of a parsed expression.
//!
//! A depth-first walk: the expected type is passed down into every visit
//! and the node's resolved type is returned. Problems are pushed into the
//! validator's diagnostics list and never stop the walk; a node whose type
//! cannot be worked out resolves to [`SemanticType::Unknown`].

use evexpr_common::diagnostic::{Diagnostic, DiagnosticCode};
use evexpr_common::span::Span;
use evexpr_metadata::{ExpressionMetadata, MetadataProvider, ObjectsScope, ParameterMetadata};
use evexpr_parser::ast::{Accessor, BinaryOp, Expr, ExprKind, FunctionCall, VariableAccessor};

use crate::ty::{ParameterFamily, SemanticType};

/// Resolved type of the root and everything found along the way.
#[derive(Debug, Clone)]
pub struct Validation {
    pub ty: SemanticType,
    pub diagnostics: Vec<Diagnostic>,
}

/// Validate `root` against the type its parent requires.
pub fn validate(
    root: &Expr,
    expected: SemanticType,
    provider: &dyn MetadataProvider,
    objects: &ObjectsScope,
) -> Validation {
    let mut validator = Validator {
        provider,
        objects,
        diagnostics: Vec::new(),
    };
    let ty = validator.visit(root, expected);
    Validation {
        ty,
        diagnostics: validator.diagnostics,
    }
}

struct Validator<'a> {
    provider: &'a dyn MetadataProvider,
    objects: &'a ObjectsScope,
    diagnostics: Vec<Diagnostic>,
}

/// State shared by the parameters of one call. Parameters that belong to
/// an object (`objectvar`, `behavior`) are written after that object.
#[derive(Debug, Default)]
struct ParameterScope<'e> {
    last_object: Option<&'e str>,
}

impl<'e> ParameterScope<'e> {
    fn for_call(call: &'e FunctionCall) -> Self {
        Self {
            last_object: call.object.as_ref().map(|o| o.text.as_str()),
        }
    }
}

impl<'a> Validator<'a> {
    fn error(&mut self, code: DiagnosticCode, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::error(code, message, span));
    }

    fn warning(&mut self, code: DiagnosticCode, message: impl Into<String>, span: Span) {
        self.diagnostics.push(Diagnostic::warning(code, message, span));
    }

    fn visit(&mut self, expr: &Expr, expected: SemanticType) -> SemanticType {
        match &expr.kind {
            ExprKind::Number { .. } => self.literal(SemanticType::Number, expr.span, expected),
            ExprKind::String { .. } => self.literal(SemanticType::String, expr.span, expected),
            ExprKind::Identifier { name } => self.identifier(name, expr.span, expected),
            ExprKind::Variable(variable) => self.variable(variable, expr.span, expected),
            ExprKind::Unary { operand, .. } => self.unary(operand, expr.span, expected),
            ExprKind::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs, expr.span, expected),
            ExprKind::Call(call) => self.call(call, expr.span, expected),
            ExprKind::Empty => {
                self.empty(expr.span, expected);
                SemanticType::Empty
            }
            // Already reported by the parser.
            ExprKind::Error(_) => SemanticType::Unknown,
        }
    }

    // ── Leaves ─────────────────────────────────────────────────────────

    fn literal(&mut self, found: SemanticType, span: Span, expected: SemanticType) -> SemanticType {
        if !found.is_compatible_with(expected) {
            let message = match (found, expected) {
                (SemanticType::Number, SemanticType::String) => {
                    "You entered a number, but a text was expected (in quotes).".to_string()
                }
                (SemanticType::String, SemanticType::Number) => {
                    "You entered a text, but a number was expected.".to_string()
                }
                (SemanticType::Number, _) => {
                    format!("You entered a number, but this type was expected: {expected}.")
                }
                _ => format!("You entered a text, but this type was expected: {expected}."),
            };
            self.error(DiagnosticCode::TypeError, message, span);
        }
        found
    }

    fn identifier(&mut self, name: &str, span: Span, expected: SemanticType) -> SemanticType {
        let message = match expected {
            SemanticType::Object => return SemanticType::Object,
            SemanticType::Variable => return SemanticType::Variable,
            SemanticType::Unknown => return SemanticType::Unknown,
            SemanticType::Number => format!(
                "You must enter a number or a valid expression call. `{name}` is neither a number nor a function."
            ),
            SemanticType::String => format!(
                "You must wrap your text inside double quotes (example: \"{name}\")."
            ),
            _ => format!("`{name}` cannot be used here ({expected} expected)."),
        };
        self.error(DiagnosticCode::UnexpectedIdentifier, message, span);
        SemanticType::Unknown
    }

    fn variable(
        &mut self,
        variable: &VariableAccessor,
        span: Span,
        expected: SemanticType,
    ) -> SemanticType {
        for accessor in &variable.accessors {
            if let Accessor::Index { index, .. } = accessor {
                self.visit(index, SemanticType::NumberOrString);
            }
        }
        match expected {
            SemanticType::Variable => SemanticType::Variable,
            SemanticType::Unknown => SemanticType::Unknown,
            _ => {
                self.error(
                    DiagnosticCode::TypeError,
                    format!(
                        "A variable cannot be used directly here ({expected} expected). Use an expression like `Variable` or `VariableString` to read its value."
                    ),
                    span,
                );
                SemanticType::Unknown
            }
        }
    }

    fn empty(&mut self, span: Span, expected: SemanticType) {
        let message = match expected {
            SemanticType::Number | SemanticType::String | SemanticType::NumberOrString => {
                "You must enter a number, a text or an expression here."
            }
            SemanticType::Object => "You must enter the name of an object here.",
            SemanticType::Variable => "You must enter the name of a variable here.",
            _ => return,
        };
        self.error(DiagnosticCode::EmptyExpression, message, span);
    }

    // ── Operators ──────────────────────────────────────────────────────

    fn unary(&mut self, operand: &Expr, span: Span, expected: SemanticType) -> SemanticType {
        match expected {
            SemanticType::Object | SemanticType::Variable | SemanticType::Empty => {
                self.error(
                    DiagnosticCode::InvalidOperator,
                    format!("Operators can't be used here ({expected} expected)."),
                    span,
                );
                self.visit(operand, SemanticType::Unknown);
                return SemanticType::Unknown;
            }
            SemanticType::String => self.error(
                DiagnosticCode::InvalidOperator,
                "You've used an operator that is not supported with texts. Only `+` can be used to concatenate texts.",
                span,
            ),
            _ if !SemanticType::Number.is_compatible_with(expected) => self.error(
                DiagnosticCode::TypeError,
                format!("This operation gives a number, but this type was expected: {expected}."),
                span,
            ),
            _ => {}
        }
        self.visit(operand, SemanticType::Number);
        SemanticType::Number
    }

    fn binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        span: Span,
        expected: SemanticType,
    ) -> SemanticType {
        if matches!(
            expected,
            SemanticType::Object | SemanticType::Variable | SemanticType::Empty
        ) {
            self.error(
                DiagnosticCode::InvalidOperator,
                format!("Operators can't be used here ({expected} expected)."),
                span,
            );
            self.visit(lhs, SemanticType::Unknown);
            self.visit(rhs, SemanticType::Unknown);
            return SemanticType::Unknown;
        }

        let left = self.visit(lhs, expected);
        // With a loose expectation, the left operand decides the operation.
        let operation = match expected {
            SemanticType::NumberOrString | SemanticType::Unknown if left.is_value() => left,
            _ => expected,
        };
        if operation == SemanticType::String && op != BinaryOp::Add {
            self.error(
                DiagnosticCode::InvalidOperator,
                format!("`{op}` can't be used with texts. Only `+` can be used to concatenate texts."),
                span,
            );
        }
        let right_expected = match expected {
            SemanticType::NumberOrString => operation,
            _ => expected,
        };
        self.visit(rhs, right_expected);
        operation
    }

    // ── Calls ──────────────────────────────────────────────────────────

    fn lookup(&self, call: &FunctionCall) -> (Option<&'a ExpressionMetadata>, &'a str) {
        let objects = self.objects;
        let provider = self.provider;
        match (&call.object, &call.behavior) {
            (Some(object), Some(behavior)) => {
                let behavior_type = objects
                    .behavior_type(&object.text, &behavior.text)
                    .unwrap_or_default();
                (
                    provider.behavior_function(behavior_type, &call.function.text),
                    objects.object_type(&object.text).unwrap_or_default(),
                )
            }
            (Some(object), None) => {
                let object_type = objects.object_type(&object.text).unwrap_or_default();
                (
                    provider.object_function(object_type, &call.function.text),
                    object_type,
                )
            }
            (None, _) => (provider.free_function(&call.function.text), ""),
        }
    }

    fn call(&mut self, call: &FunctionCall, span: Span, expected: SemanticType) -> SemanticType {
        let (metadata, object_type) = self.lookup(call);

        let Some(metadata) = metadata else {
            self.error(
                DiagnosticCode::InvalidFunctionName,
                format!(
                    "Cannot find an expression with this name: {}\nDouble check that you've not made any typo in the name.",
                    call.function.text
                ),
                span,
            );
            self.visit_unchecked_arguments(call);
            return SemanticType::Unknown;
        };
        let return_type = SemanticType::from_metadata_type(&metadata.return_type);

        if let (Some(object), Some(capability)) =
            (&call.object, &metadata.required_base_object_capability)
        {
            let unsupported = self
                .provider
                .object_metadata(object_type)
                .is_some_and(|o| o.is_unsupported_capability(capability));
            if unsupported {
                self.error(
                    DiagnosticCode::UnsupportedObjectCapability,
                    format!(
                        "This expression exists, but it can't be used on this object (objects of this type don't support `{capability}`)."
                    ),
                    object.span,
                );
                self.visit_unchecked_arguments(call);
                return return_type;
            }
        }

        if !self.check_return_type(return_type, expected, span) {
            self.visit_unchecked_arguments(call);
            return return_type;
        }

        let first_index = call.written_parameters_first_index();
        if !self.check_parameter_count(call, metadata, first_index, span) {
            self.visit_unchecked_arguments(call);
            return return_type;
        }

        let mut scope = ParameterScope::for_call(call);
        for (position, (argument, parameter)) in call
            .parameters
            .iter()
            .zip(metadata.written_parameters(first_index))
            .enumerate()
        {
            self.parameter(argument, parameter, position + 1, &mut scope);
        }

        return_type
    }

    /// Report a return type that does not fit the expectation. Returns
    /// whether the call can be checked further.
    fn check_return_type(
        &mut self,
        return_type: SemanticType,
        expected: SemanticType,
        span: Span,
    ) -> bool {
        use SemanticType::{Number, NumberOrString, Unknown};

        let message = match return_type {
            _ if expected == Unknown => return true,
            Number => match expected {
                SemanticType::String => "You tried to use an expression that returns a number, but a string is expected. Use `ToString` if you need to convert a number to a string.".to_string(),
                Number | NumberOrString => return true,
                other => format!("You tried to use an expression that returns a number, but another type is expected: {other}"),
            },
            SemanticType::String => match expected {
                Number => "You tried to use an expression that returns a string, but a number is expected. Use `ToNumber` if you need to convert a string to a number.".to_string(),
                SemanticType::String | NumberOrString => return true,
                other => format!("You tried to use an expression that returns a string, but another type is expected: {other}"),
            },
            other if other == expected => return true,
            other => format!(
                "You tried to use an expression with the wrong return type: {other} (but {expected} is expected)"
            ),
        };
        self.error(DiagnosticCode::TypeError, message, span);
        false
    }

    fn check_parameter_count(
        &mut self,
        call: &FunctionCall,
        metadata: &ExpressionMetadata,
        first_index: usize,
        span: Span,
    ) -> bool {
        let (min, max) = metadata.parameter_count_range(first_index);
        let written = call.parameters.len();
        let expected_count = if min == max {
            format!("The number of parameters must be exactly {min}")
        } else {
            format!("The number of parameters must be: {min}-{max}")
        };

        if written < min {
            self.error(
                DiagnosticCode::TooFewParameters,
                format!("You have not entered enough parameters for the expression. {expected_count}"),
                span,
            );
            return false;
        }
        if written > max {
            let extra = &call.parameters[max..];
            let extra_span = extra
                .iter()
                .map(|p| p.span)
                .reduce(Span::merge)
                .unwrap_or(span);
            self.error(
                DiagnosticCode::TooManyParameters,
                format!(
                    "This parameter was not expected by this expression. Remove it or verify that you've entered the proper expression name. {expected_count}"
                ),
                extra_span,
            );
            return false;
        }
        true
    }

    /// Visit the arguments of a call that failed its own checks, so
    /// problems nested inside them are still reported.
    fn visit_unchecked_arguments(&mut self, call: &FunctionCall) {
        for argument in &call.parameters {
            self.visit(argument, SemanticType::Unknown);
        }
    }

    // ── Parameters ─────────────────────────────────────────────────────

    fn parameter<'e>(
        &mut self,
        argument: &'e Expr,
        parameter: &ParameterMetadata,
        position: usize,
        scope: &mut ParameterScope<'e>,
    ) {
        let Some(family) = ParameterFamily::classify(&parameter.kind) else {
            self.error(
                DiagnosticCode::UnknownParameterType,
                format!(
                    "This function is improperly set up (parameter {position} has the unknown type `{}`). Reach out to the extension developer to fix this issue.",
                    parameter.kind
                ),
                argument.span,
            );
            self.visit(argument, SemanticType::Unknown);
            return;
        };

        let before = self.diagnostics.len();
        let resolved = match family {
            ParameterFamily::Number | ParameterFamily::String => {
                let resolved = self.visit(argument, family.expected_type());
                if self.attribute_to_parameter(before, argument, parameter, position) {
                    return;
                }
                resolved
            }
            ParameterFamily::Object => self.object_parameter(argument, scope),
            ParameterFamily::Variable => self.variable_parameter(argument, parameter, scope),
            ParameterFamily::Behavior => {
                self.behavior_parameter(argument, scope);
                return;
            }
        };

        let expected = family.expected_type();
        if self.diagnostics.len() == before && !resolved.is_compatible_with(expected) {
            self.error(
                DiagnosticCode::ParameterTypeMismatch,
                format!(
                    "Parameter {position} should be of type `{}` ({expected}), but {resolved} was given.",
                    parameter.kind
                ),
                argument.span,
            );
        }
    }

    /// Turn a type error raised by the argument itself into a parameter
    /// mismatch naming the parameter. Errors nested deeper in the argument
    /// are left as they are. Returns whether one was turned.
    fn attribute_to_parameter(
        &mut self,
        before: usize,
        argument: &Expr,
        parameter: &ParameterMetadata,
        position: usize,
    ) -> bool {
        let Some(diagnostic) = self.diagnostics[before..]
            .iter_mut()
            .find(|d| d.code == DiagnosticCode::TypeError && d.span == argument.span)
        else {
            return false;
        };
        diagnostic.code = DiagnosticCode::ParameterTypeMismatch;
        diagnostic.message = format!(
            "Parameter {position} should be of type `{}`. {}",
            parameter.kind, diagnostic.message
        );
        true
    }

    fn object_parameter<'e>(
        &mut self,
        argument: &'e Expr,
        scope: &mut ParameterScope<'e>,
    ) -> SemanticType {
        match argument.as_identifier() {
            Some(name) => {
                scope.last_object = Some(name);
                self.visit(argument, SemanticType::Object)
            }
            None => {
                self.error(
                    DiagnosticCode::MalformedObjectParameter,
                    "An object name was expected but something else was written. Enter just the name of the object for this parameter.",
                    argument.span,
                );
                self.visit(argument, SemanticType::Unknown);
                SemanticType::Object
            }
        }
    }

    fn variable_parameter(
        &mut self,
        argument: &Expr,
        parameter: &ParameterMetadata,
        scope: &ParameterScope<'_>,
    ) -> SemanticType {
        let name = match &argument.kind {
            ExprKind::Identifier { name } => name.as_str(),
            ExprKind::Variable(variable) => variable.name.text.as_str(),
            _ => {
                self.error(
                    DiagnosticCode::MalformedVariableParameter,
                    "A variable name was expected but something else was written. Enter just the name of the variable for this parameter.",
                    argument.span,
                );
                self.visit(argument, SemanticType::Unknown);
                return SemanticType::Variable;
            }
        };

        if parameter.kind == "objectvar" {
            match scope.last_object {
                None => self.error(
                    DiagnosticCode::MissingObjectContext,
                    "This object variable is not preceded by an object, so it can't be found. The object must be written before the variable.",
                    argument.span,
                ),
                Some(object) => {
                    let declared = self.objects.object_variables(object);
                    if declared.is_some_and(|vars| !vars.iter().any(|v| v == name)) {
                        self.warning(
                            DiagnosticCode::UndeclaredObjectVariable,
                            format!("`{name}` is not declared as a variable of {object}."),
                            argument.span,
                        );
                    }
                }
            }
        }

        self.visit(argument, SemanticType::Variable)
    }

    fn behavior_parameter(&mut self, argument: &Expr, scope: &ParameterScope<'_>) {
        let Some(name) = argument.as_identifier() else {
            self.error(
                DiagnosticCode::MalformedBehaviorParameter,
                "A behavior name was expected but something else was written. Enter just the name of the behavior for this parameter.",
                argument.span,
            );
            self.visit(argument, SemanticType::Unknown);
            return;
        };

        let Some(object) = scope.last_object else {
            self.error(
                DiagnosticCode::MissingObjectContext,
                "This behavior is not preceded by an object, so it can't be found. The object must be written before the behavior.",
                argument.span,
            );
            return;
        };

        if self.objects.behavior_type(object, name).is_none() {
            self.error(
                DiagnosticCode::InvalidBehaviorName,
                format!("{object} has no behavior called `{name}`."),
                argument.span,
            );
        }
    }
}
