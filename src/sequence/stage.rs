//! Stage partitioning for the dictation-splitting sequence engine.
//!
//! An expansion's leaves are split, left to right, into maximal runs of
//! one classification (dictation or fixed-vocabulary). Runs are assembled
//! from the maximal subtrees whose leaves all belong to the run, so
//! composite structure such as alternations survives into the stage used
//! for matching.

use crate::{
    Error, Result,
    expansion::{Expansion, Kind},
};

pub(crate) struct Stage {
    pub(crate) expansion: Expansion,
    pub(crate) dictation_only: bool,
}

/// Splits `expansion` into matchable stages.
///
/// # Errors
///
/// Returns [`Error::Grammar`] when the tree cannot be cleanly split: a
/// dictation leaf beneath an optional grouping, Kleene star, or
/// alternative set, or a non-sequence composite whose leaves mix
/// classifications.
pub(crate) fn partition_stages(expansion: &Expansion) -> Result<Vec<Stage>> {
    for leaf in expansion.leaves() {
        if leaf.is_dictation() && (leaf.is_optional() || leaf.is_alternative()) {
            return Err(Error::Grammar(
                "dictation cannot be optional or an alternative".to_owned(),
            ));
        }
    }

    let mut units = Vec::new();
    collect_units(expansion, &mut units)?;

    let mut stages: Vec<Stage> = Vec::new();
    let mut run: Vec<Expansion> = Vec::new();
    let mut run_dictation = false;
    for (unit, dictation) in units {
        if !run.is_empty() && dictation != run_dictation {
            stages.push(build_stage(&run, run_dictation));
            run.clear();
        }
        run_dictation = dictation;
        run.push(unit);
    }
    if !run.is_empty() {
        stages.push(build_stage(&run, run_dictation));
    }
    if stages.is_empty() {
        // An expansion with no leaves still forms one trivial stage.
        stages.push(build_stage(std::slice::from_ref(expansion), false));
    }
    Ok(stages)
}

/// Pushes the maximal subtrees of `expansion` whose leaves share one
/// classification, with that classification, in left-to-right order.
fn collect_units(expansion: &Expansion, out: &mut Vec<(Expansion, bool)>) -> Result<()> {
    let leaves = expansion.leaves();
    let any_dictation = leaves.iter().any(Expansion::is_dictation);
    let all_dictation = !leaves.is_empty() && leaves.iter().all(Expansion::is_dictation);
    if !any_dictation || all_dictation {
        out.push((expansion.clone(), any_dictation));
        return Ok(());
    }
    match expansion.kind() {
        Kind::Sequence | Kind::RequiredGrouping => {
            for child in expansion.children() {
                collect_units(&child, out)?;
            }
            Ok(())
        }
        kind => Err(Error::Grammar(format!(
            "{} cannot mix dictation and fixed-vocabulary content",
            kind.name()
        ))),
    }
}

fn build_stage(run: &[Expansion], dictation_only: bool) -> Stage {
    let expansion = match run {
        [unit] => unit.deep_copy(),
        units => Expansion::sequence(units.iter().map(Expansion::deep_copy)),
    };
    Stage {
        expansion,
        dictation_only,
    }
}
