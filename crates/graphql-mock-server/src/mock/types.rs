//! Translation of schema definitions into dynamic GraphQL types

use std::sync::Arc;

use apollo_compiler::{
    Name, Node, Schema,
    ast::{self, DirectiveList, FieldDefinition, InputValueDefinition, Type},
    collections::HashMap,
    schema::{EnumType, Implementers, InputObjectType, InterfaceType, ObjectType, UnionType},
};
use async_graphql::{
    Name as ValueName, Number, Value,
    dynamic::{
        Enum, EnumItem, Field, FieldFuture, InputObject, InputValue, Interface, InterfaceField,
        Object, Scalar, TypeRef, Union,
    },
};

use super::strategy::{MockSettings, MockStrategy};

const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// Builds dynamic types whose fields resolve to mocked values
pub(crate) struct TypeBuilder<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) implementers: HashMap<Name, Implementers>,
    pub(crate) settings: Arc<MockSettings>,
}

impl TypeBuilder<'_> {
    pub(crate) fn object(&self, name: &Name, object: &ObjectType) -> Object {
        let mut dynamic = Object::new(name.as_str());
        if let Some(description) = &object.description {
            dynamic = dynamic.description(description.to_string());
        }
        for interface in &object.implements_interfaces {
            dynamic = dynamic.implement(interface.name.as_str());
        }
        object
            .fields
            .values()
            .fold(dynamic, |dynamic, field| dynamic.field(self.field(field)))
    }

    fn field(&self, definition: &FieldDefinition) -> Field {
        let strategy = MockStrategy::for_type(&definition.ty, self.schema, &self.implementers);
        let settings = self.settings.clone();

        let mut field = Field::new(
            definition.name.as_str(),
            type_ref(&definition.ty),
            move |_ctx| {
                let value = strategy.generate(&settings);
                FieldFuture::new(async move { Ok(Some(value)) })
            },
        );
        if let Some(description) = &definition.description {
            field = field.description(description.to_string());
        }
        if let Some(reason) = deprecation(&definition.directives) {
            field = field.deprecation(Some(reason.as_str()));
        }
        definition
            .arguments
            .iter()
            .fold(field, |field, argument| field.argument(input_value(argument)))
    }

    pub(crate) fn interface(&self, name: &Name, interface: &InterfaceType) -> Interface {
        let mut dynamic = Interface::new(name.as_str());
        if let Some(description) = &interface.description {
            dynamic = dynamic.description(description.to_string());
        }
        for implemented in &interface.implements_interfaces {
            dynamic = dynamic.implement(implemented.name.as_str());
        }
        interface.fields.values().fold(dynamic, |dynamic, definition| {
            let mut field =
                InterfaceField::new(definition.name.as_str(), type_ref(&definition.ty));
            if let Some(description) = &definition.description {
                field = field.description(description.to_string());
            }
            if let Some(reason) = deprecation(&definition.directives) {
                field = field.deprecation(Some(reason.as_str()));
            }
            let field = definition
                .arguments
                .iter()
                .fold(field, |field, argument| field.argument(input_value(argument)));
            dynamic.field(field)
        })
    }
}

pub(crate) fn union(name: &Name, union: &UnionType) -> Union {
    let mut dynamic = Union::new(name.as_str());
    if let Some(description) = &union.description {
        dynamic = dynamic.description(description.to_string());
    }
    union
        .members
        .iter()
        .fold(dynamic, |dynamic, member| dynamic.possible_type(member.name.as_str()))
}

pub(crate) fn r#enum(name: &Name, r#enum: &EnumType) -> Enum {
    let mut dynamic = Enum::new(name.as_str());
    if let Some(description) = &r#enum.description {
        dynamic = dynamic.description(description.to_string());
    }
    r#enum.values.values().fold(dynamic, |dynamic, value| {
        let mut item = EnumItem::new(value.value.as_str());
        if let Some(description) = &value.description {
            item = item.description(description.to_string());
        }
        if let Some(reason) = deprecation(&value.directives) {
            item = item.deprecation(Some(reason.as_str()));
        }
        dynamic.item(item)
    })
}

pub(crate) fn input_object(name: &Name, input: &InputObjectType) -> InputObject {
    let mut dynamic = InputObject::new(name.as_str());
    if let Some(description) = &input.description {
        dynamic = dynamic.description(description.to_string());
    }
    input
        .fields
        .values()
        .fold(dynamic, |dynamic, field| dynamic.field(input_value(field)))
}

pub(crate) fn scalar(name: &Name, description: Option<&Node<str>>) -> Scalar {
    let scalar = Scalar::new(name.as_str());
    match description {
        Some(description) => scalar.description(description.to_string()),
        None => scalar,
    }
}

fn input_value(definition: &InputValueDefinition) -> InputValue {
    let mut input = InputValue::new(definition.name.as_str(), type_ref(&definition.ty));
    if let Some(description) = &definition.description {
        input = input.description(description.to_string());
    }
    if let Some(default) = &definition.default_value {
        input = input.default_value(const_value(default));
    }
    input
}

/// Mirror a declared type, wrappers included
pub(crate) fn type_ref(r#type: &Type) -> TypeRef {
    match r#type {
        Type::Named(name) => TypeRef::named(name.as_str()),
        Type::NonNullNamed(name) => TypeRef::named_nn(name.as_str()),
        Type::List(inner) => TypeRef::List(Box::new(type_ref(inner))),
        Type::NonNullList(inner) => {
            TypeRef::NonNull(Box::new(TypeRef::List(Box::new(type_ref(inner)))))
        }
    }
}

/// Convert a default value literal; variables cannot appear in a schema
fn const_value(value: &ast::Value) -> Value {
    match value {
        ast::Value::Null | ast::Value::Variable(_) => Value::Null,
        ast::Value::Enum(name) => Value::Enum(ValueName::new(name.as_str())),
        ast::Value::String(string) => Value::String(string.clone()),
        ast::Value::Boolean(boolean) => Value::Boolean(*boolean),
        ast::Value::Int(int) => int
            .try_to_i32()
            .map(|int| Value::Number(Number::from(int)))
            .or_else(|_| int.try_to_f64().map(float))
            .unwrap_or(Value::Null),
        ast::Value::Float(float_value) => {
            float_value.try_to_f64().map(float).unwrap_or(Value::Null)
        }
        ast::Value::List(items) => {
            Value::List(items.iter().map(|item| const_value(item)).collect())
        }
        ast::Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, value)| (ValueName::new(name.as_str()), const_value(value)))
                .collect(),
        ),
    }
}

fn float(float: f64) -> Value {
    Number::from_f64(float).map(Value::Number).unwrap_or(Value::Null)
}

fn deprecation(directives: &DirectiveList) -> Option<String> {
    directives.get("deprecated").map(|deprecated| {
        deprecated
            .specified_argument_by_name("reason")
            .and_then(|reason| reason.as_str())
            .unwrap_or(DEFAULT_DEPRECATION_REASON)
            .to_string()
    })
}
