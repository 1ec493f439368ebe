//! Split modules by where their markup goes.
//!
//! Target precedence, highest first: the tag's own `inject_to`, the module's
//! `inject_to`, then the config default. A resolved target that is one of the
//! four location tokens is structural; anything else is a placeholder.

use super::globals::{self, GlobalsMap};
use crate::config::{ConfigWarning, ExternalModule, InjectTarget, Location, ModuleEntry};
use crate::log;

/// Module handed to the host's own tag insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralModule {
    pub module: ExternalModule,
    pub location: Location,
}

/// Module spliced into the document at a literal placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderModule {
    pub module: ExternalModule,
    pub placeholder: String,
}

/// Result of one pass over the declared modules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub globals: GlobalsMap,
    /// Declaration order.
    pub structural: Vec<StructuralModule>,
    /// Declaration order.
    pub placeholder: Vec<PlaceholderModule>,
    pub warnings: Vec<ConfigWarning>,
}

/// Effective target of a module, or `None` if it produces no markup.
pub fn resolve_target(module: &ExternalModule, default: &InjectTarget) -> Option<InjectTarget> {
    let tag_target = match module {
        ExternalModule::Tag { tag, .. } => tag.inject_to.clone().and_then(InjectTarget::non_empty),
        ExternalModule::Path { .. } => None,
        ExternalModule::GlobalsOnly { .. } => return None,
    };
    tag_target
        .or_else(|| module.inject_to().cloned())
        .or_else(|| Some(default.clone()))
}

/// Validate entries, build the globals table and partition by target.
///
/// Invalid entries are skipped with a logged warning; they never abort.
pub fn classify(entries: Vec<ModuleEntry>, default: &InjectTarget) -> Classification {
    let (modules, warnings): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let validated = entry.validate(index);
            (validated.module, validated.warning)
        })
        .unzip();
    let modules: Vec<ExternalModule> = modules.into_iter().flatten().collect();
    let warnings: Vec<ConfigWarning> = warnings.into_iter().flatten().collect();

    for warning in &warnings {
        log!("warn"; "{warning}");
    }

    let globals = globals::build(&modules);

    let mut structural = Vec::new();
    let mut placeholder = Vec::new();
    for module in modules {
        match resolve_target(&module, default) {
            Some(InjectTarget::Structural(location)) => {
                structural.push(StructuralModule { module, location });
            }
            Some(InjectTarget::Placeholder(text)) => {
                placeholder.push(PlaceholderModule {
                    module,
                    placeholder: text,
                });
            }
            None => {}
        }
    }

    Classification {
        globals,
        structural,
        placeholder,
        warnings,
    }
}

// ============================================================================
// Tests
// ============================================================================
