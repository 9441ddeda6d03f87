//! Getter and setter conversion

use crate::diagnostics::Diagnostic;
use crate::model::MethodInfo;
use crate::naming::{accessor_method_name, property_name};
use crate::types::TypeRef;
use crate::unit::Stmt;

use super::session::Session;

impl Session<'_, '_> {
    pub(super) fn add_getters(&mut self, getters: &[MethodInfo]) {
        for getter in getters {
            self.convert_getter(getter);
        }
    }

    pub(super) fn add_setters(&mut self, setters: &[MethodInfo]) {
        for setter in setters {
            self.convert_setter(setter);
        }
    }

    /// `get_X` -> `GetX()` returning the property, or its id.
    ///
    /// Accessors with index parameters read `target[keys]` instead, each key
    /// converted like an ordinary parameter.
    fn convert_getter(&mut self, getter: &MethodInfo) {
        let property = property_name(&getter.name);
        let name = accessor_method_name(&getter.name);
        self.check_return_shape(&name, &getter.return_type);

        let (mut cx, target) = self.begin_member(name, getter.return_type.clone());
        let read = if getter.params.is_empty() {
            target.property(property)
        } else {
            let keys = getter.params.iter().map(|p| cx.convert_value_param(p)).collect();
            target.index_by(keys)
        };
        cx.return_property(read, &getter.return_type);
        let method = cx.finish();
        self.push_method(method);
    }

    /// `set_X` -> `SetX(value)` assigning the property; the value is the
    /// accessor's last parameter, any before it are index keys
    fn convert_setter(&mut self, setter: &MethodInfo) {
        let Some((value_param, key_params)) = setter.params.split_last() else {
            self.diagnose(Diagnostic::warning(format!(
                "{}.{} has no value parameter; setter skipped",
                self.wrapped_type, setter.name
            )));
            return;
        };
        let property = property_name(&setter.name);

        let (mut cx, target) = self.begin_member(accessor_method_name(&setter.name), TypeRef::void());
        let slot = if key_params.is_empty() {
            target.property(property)
        } else {
            let keys = key_params.iter().map(|p| cx.convert_value_param(p)).collect();
            target.index_by(keys)
        };
        let value = cx.convert_value_param(value_param);
        cx.push(Stmt::Assign {
            target: slot,
            value,
        });
        let method = cx.finish();
        self.push_method(method);
    }
}
