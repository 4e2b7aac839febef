//! Reconciliation of a catalog against the current source strings.
//!
//! One call handles one target language and runs in two passes:
//!
//! 1. every unit whose id is no longer a source key is removed;
//! 2. source lines are visited in source order, updating existing units and
//!    appending new ones.
//!
//! Retained units keep their catalog position; new units are appended, so the
//! catalog order is independent of the source order. A renamed key is
//! therefore one removal plus one insertion.
//!
//! The engine only assigns [`TranslationState::New`] and
//! [`TranslationState::NeedsReview`], and only ever moves a unit from the
//! former to the latter. Any other state is left alone until the unit's source
//! text changes.

use std::collections::HashSet;

use crate::{
    error::Error,
    translate::{TranslationBackend, translate_or_none},
    types::{Catalog, SourceLine, TranslationState, TranslationUnit, UnitNote},
};

/// Brings `catalog` in line with `lines`, translating through `backend` where needed.
///
/// Returns whether any unit was added, removed or changed state or text.
/// Translation failures are never errors; a duplicate source name is, and
/// leaves `catalog` untouched.
pub async fn reconcile(
    catalog: &mut Catalog,
    lines: &[SourceLine],
    backend: Option<&dyn TranslationBackend>,
) -> Result<bool, Error> {
    let mut keys = HashSet::with_capacity(lines.len());
    for line in lines {
        if !keys.insert(line.name.as_str()) {
            return Err(Error::DuplicateKey(line.name.clone()));
        }
    }

    let mut changed = false;

    let stale: Vec<String> = catalog
        .keys()
        .filter(|id| !keys.contains(id.as_str()))
        .collect();
    for id in stale {
        catalog.remove(&id);
        tracing::debug!(id = %id, "removed unit");
        changed = true;
    }

    for line in lines {
        let source = line.text();
        if catalog.contains_key(&line.name) {
            let unit = catalog.get_mut(&line.name)?;
            changed |= update_unit(unit, source, backend).await;
        } else {
            let unit = match translate_or_none(backend, Some(source)).await {
                Some(translated) => TranslationUnit::new(
                    &line.name,
                    source,
                    TranslationState::NeedsReview,
                    translated,
                ),
                None => TranslationUnit::new(&line.name, source, TranslationState::New, source),
            };
            tracing::debug!(id = %line.name, state = ?unit.target.state, "added unit");
            catalog.add(unit)?;
            changed = true;
        }
    }

    Ok(changed)
}

async fn update_unit(
    unit: &mut TranslationUnit,
    source: &str,
    backend: Option<&dyn TranslationBackend>,
) -> bool {
    let stored = unit.source.value.as_deref().unwrap_or_default();

    if stored != source {
        unit.source.value = Some(source.to_string());
        let translated = translate_or_none(backend, Some(source)).await;
        if unit.is_new() {
            match translated {
                Some(translated) => {
                    unit.target.value = translated;
                    unit.target.state = Some(TranslationState::NeedsReview);
                }
                // still untranslated: keep mirroring the source
                None => unit.target.value = source.to_string(),
            }
        } else {
            unit.target.state = Some(TranslationState::NeedsReview);
            unit.note = Some(UnitNote::source_updated());
            if let Some(translated) = translated {
                unit.target.value = translated;
            }
        }
        tracing::debug!(id = %unit.id, state = ?unit.target.state, "source text changed");
        return true;
    }

    if unit.source.value.is_none() {
        unit.source.value = Some(String::new());
    }

    if unit.is_new() {
        if let Some(translated) = translate_or_none(backend, Some(source)).await {
            unit.target.value = translated;
            unit.target.state = Some(TranslationState::NeedsReview);
            tracing::debug!(id = %unit.id, "translated pending unit");
            return true;
        }
    }

    false
}
