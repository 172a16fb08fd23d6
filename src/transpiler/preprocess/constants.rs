use crate::script::document::{Constant, Document};
use crate::transpiler::defaults::ConstantNaming;
use crate::transpiler::diagnostics::Diagnostics;
use crate::transpiler::errors::Diagnostic;

/// Appends a `DEFAULT_<name>` constant for every variable that asks for one.
///
/// Names are compared the way they are emitted (upper-cased), and an existing
/// constant always wins, so running this twice adds nothing the second time.
/// Returns the number of constants added.
pub fn synthesize_constants(
    document: &mut Document,
    naming: &ConstantNaming,
    diagnostics: &mut Diagnostics,
) -> usize {
    let mut added = 0;

    for variable in &document.variables {
        if !variable.generate_default {
            continue;
        }
        // Nameless variables are reported when emitted.
        let Some(name) = variable.declared_name() else {
            continue;
        };
        let Some(value) = variable.declared_value() else {
            diagnostics.push(Diagnostic::MissingDefaultValue {
                variable: name.to_string(),
            });
            continue;
        };

        let synthesized = naming.synthesized_name(name);
        let emitted = synthesized.to_uppercase();
        let exists = document.constants.iter().any(|constant| {
            constant
                .declared_name()
                .is_some_and(|existing| existing.to_uppercase() == emitted)
        });
        if exists {
            continue;
        }

        document.constants.push(Constant::new(
            synthesized,
            variable.type_hint.clone(),
            Some(value.to_string()),
        ));
        added += 1;
    }

    added
}
