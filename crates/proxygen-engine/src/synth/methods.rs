//! Ordinary method conversion

use crate::diagnostics::{Diagnostic, OUT_PARAM_DISCARDED, OUT_PARAM_REJECTED};
use crate::model::MethodInfo;

use super::session::Session;

impl Session<'_, '_> {
    pub(super) fn add_methods(&mut self, methods: &[MethodInfo], rejected: &[MethodInfo]) {
        for method in rejected {
            let params: Vec<&str> = method
                .params
                .iter()
                .filter(|p| p.is_out())
                .map(|p| p.name.as_str())
                .collect();
            let message = format!(
                "{}.{} skipped: output-only parameter(s) {} cannot cross the boundary",
                self.wrapped_type,
                method.name,
                params.join(", ")
            );
            self.diagnose(Diagnostic::warning(message).with_code(OUT_PARAM_REJECTED));
        }

        for method in methods {
            self.convert_method(method);
        }
    }

    /// Delegate to the wrapped object, substituting ids for registry members
    fn convert_method(&mut self, info: &MethodInfo) {
        self.check_return_shape(&info.name, &info.return_type);
        for param in info.params.iter().filter(|p| p.is_out()) {
            let message = format!(
                "{}.{}: output parameter '{}' is discarded",
                self.wrapped_type, info.name, param.name
            );
            self.diagnose(Diagnostic::note(message).with_code(OUT_PARAM_DISCARDED));
        }

        let (mut cx, target) = self.begin_member(info.name.clone(), info.return_type.clone());
        let args = info.params.iter().map(|p| cx.convert_param(p)).collect();
        cx.return_invoke(target.invoke(info.name.clone(), args), &info.return_type);
        let method = cx.finish();
        self.push_method(method);
    }
}
