//! Built-in extensions: math, text conversion, variables, time, base object,
//! sprite, text input and platformer behavior expressions.
//!
//! Object and behavior functions list their implicit `object` (and
//! `behavior`) parameters first, like any catalog entry.

use crate::metadata::{
    BehaviorMetadata, ExpressionMetadata, Extension, ObjectMetadata, ParameterMetadata,
};
use crate::BASE_OBJECT_TYPE;

pub const SPRITE_OBJECT_TYPE: &str = "Sprite";
pub const TEXT_INPUT_OBJECT_TYPE: &str = "TextInput::TextInputObject";
pub const PLATFORMER_BEHAVIOR_TYPE: &str = "PlatformBehavior::PlatformerObjectBehavior";

/// Capability gating effect expressions.
pub const EFFECT_CAPABILITY: &str = "effect";

/// Every built-in extension, in registration order.
pub fn extensions() -> Vec<Extension> {
    vec![
        mathematical_tools(),
        string_instructions(),
        variables(),
        time_and_scene(),
        base_object(),
        sprite(),
        text_input(),
        platformer(),
    ]
}

fn function(name: &str, return_type: &str, kinds: &[&str]) -> ExpressionMetadata {
    kinds.iter().fold(ExpressionMetadata::new(name, return_type), |e, kind| {
        e.with_parameter(ParameterMetadata::new(*kind))
    })
}

fn mathematical_tools() -> Extension {
    Extension::new("BuiltinMathematicalTools")
        .with_expression(function("abs", "number", &["expression"]))
        .with_expression(function("min", "number", &["expression", "expression"]))
        .with_expression(function("max", "number", &["expression", "expression"]))
        .with_expression(function("clamp", "number", &["expression", "expression", "expression"]))
        .with_expression(function("mod", "number", &["expression", "expression"]))
        .with_expression(function("sin", "number", &["expression"]))
        .with_expression(function("cos", "number", &["expression"]))
        .with_expression(function("sqrt", "number", &["expression"]))
        .with_expression(function("pow", "number", &["expression", "expression"]))
        .with_expression(
            function("round", "number", &["expression"]).with_parameter(
                ParameterMetadata::new("expression")
                    .optional()
                    .with_description("Number of decimal places"),
            ),
        )
        .with_expression(function("Random", "number", &["expression"]))
        .with_expression(function("RandomInRange", "number", &["expression", "expression"]))
}

fn string_instructions() -> Extension {
    Extension::new("BuiltinStringInstructions")
        .with_expression(function("ToString", "string", &["expression"]))
        .with_expression(function("ToNumber", "number", &["string"]))
        .with_expression(function("StrLength", "number", &["string"]))
        .with_expression(function("SubStr", "string", &["string", "expression", "expression"]))
        .with_expression(function("StrFind", "number", &["string", "string"]))
        .with_expression(function("UpperCase", "string", &["string"]))
        .with_expression(function("LowerCase", "string", &["string"]))
        .with_expression(function("NewLine", "string", &[]))
}

fn variables() -> Extension {
    Extension::new("BuiltinVariables")
        .with_expression(function("Variable", "number", &["scenevar"]))
        .with_expression(function("VariableString", "string", &["scenevar"]))
        .with_expression(function("VariableChildCount", "number", &["scenevar"]))
        .with_expression(function("GlobalVariable", "number", &["globalvar"]))
        .with_expression(function("GlobalVariableString", "string", &["globalvar"]))
        .with_expression(function("GlobalVariableChildCount", "number", &["globalvar"]))
}

fn scene_function(name: &str, return_type: &str) -> ExpressionMetadata {
    ExpressionMetadata::new(name, return_type)
        .with_parameter(ParameterMetadata::new("currentScene").code_only())
}

fn time_and_scene() -> Extension {
    Extension::new("BuiltinTime")
        .with_expression(
            scene_function("Time", "number").with_parameter(
                ParameterMetadata::new("string").with_description("hour, min, sec, year..."),
            ),
        )
        .with_expression(scene_function("TimeDelta", "number"))
        .with_expression(scene_function("TimeFromStart", "number"))
        .with_expression(scene_function("CurrentSceneName", "string"))
        .with_expression(
            scene_function("Count", "number").with_parameter(ParameterMetadata::new("objectList")),
        )
}

fn base_object() -> Extension {
    let object = ObjectMetadata::new(BASE_OBJECT_TYPE)
        .with_expression(function("X", "number", &["object"]))
        .with_expression(function("Y", "number", &["object"]))
        .with_expression(function("Width", "number", &["object"]))
        .with_expression(function("Height", "number", &["object"]))
        .with_expression(function("Angle", "number", &["object"]))
        .with_expression(function("ZOrder", "number", &["object"]))
        .with_expression(function("Layer", "string", &["object"]))
        .with_expression(function("ObjectName", "string", &["object"]))
        .with_expression(function("Variable", "number", &["object", "objectvar"]))
        .with_expression(function("VariableString", "string", &["object", "objectvar"]))
        .with_expression(function("VariableChildCount", "number", &["object", "objectvar"]))
        .with_expression(function("Distance", "number", &["object", "objectPtr"]))
        .with_expression(
            function("EffectDoubleParameter", "number", &["object", "objectEffectName", "string"])
                .requiring_capability(EFFECT_CAPABILITY),
        );
    Extension::new("BuiltinObject").with_object(object)
}

fn sprite() -> Extension {
    let object = ObjectMetadata::new(SPRITE_OBJECT_TYPE)
        .with_expression(function("Animation", "number", &["object"]))
        .with_expression(function("AnimationName", "string", &["object"]))
        .with_expression(function("Direction", "number", &["object"]))
        .with_expression(function("ScaleX", "number", &["object"]))
        .with_expression(function("ScaleY", "number", &["object"]))
        .with_expression(function("PointX", "number", &["object", "objectPointName"]))
        .with_expression(function("PointY", "number", &["object", "objectPointName"]));
    Extension::new("Sprite").with_object(object)
}

fn text_input() -> Extension {
    let object = ObjectMetadata::new(TEXT_INPUT_OBJECT_TYPE)
        .with_expression(function("Text", "string", &["object"]))
        .with_expression(function("PlaceholderText", "string", &["object"]))
        .without_capability(EFFECT_CAPABILITY);
    Extension::new("TextInput").with_object(object)
}

fn platformer() -> Extension {
    let behavior = BehaviorMetadata::new(PLATFORMER_BEHAVIOR_TYPE)
        .with_expression(function("CurrentSpeed", "number", &["object", "behavior"]))
        .with_expression(function("MaxSpeed", "number", &["object", "behavior"]))
        .with_expression(function("JumpSpeed", "number", &["object", "behavior"]))
        .with_expression(function("Gravity", "number", &["object", "behavior"]));
    Extension::new("PlatformBehavior").with_behavior(behavior)
}
