//! Night actions: guardian, werewolves, seer, witch.

use std::collections::BTreeMap;

use model::{EventKind, Phase};

use crate::{
    context::ParseContext,
    phrases::{all_captures, first_captures},
};

use super::{marker_window, section};

pub fn extract(ctx: &mut ParseContext, round: &str) {
    let phrases = ctx.phrases;
    let table = &phrases.table;
    let Some(night) = marker_window(
        round,
        &table.night,
        &[&table.morning, &table.day, &table.voting],
    ) else {
        return;
    };

    ctx.emit(Phase::Night, EventKind::PhaseStart { phase: Phase::Night });

    let guardian = section(night, &table.guardian);
    if let Some(caps) = first_captures(&phrases.protects, guardian) {
        ctx.emit(
            Phase::Night,
            EventKind::GuardianAction {
                guardian: caps["actor"].to_string(),
                protected: caps["target"].to_string(),
            },
        );
    }

    let werewolves = section(night, &table.werewolves);
    let mut targets = BTreeMap::new();
    for caps in all_captures(&phrases.targets, werewolves) {
        targets
            .entry(caps["actor"].to_string())
            .or_insert_with(|| caps["target"].to_string());
    }
    if !targets.is_empty() {
        ctx.emit(Phase::Night, EventKind::WerewolfTarget { targets });
    }

    let seer = section(night, &table.seer);
    if let Some(caps) = first_captures(&phrases.checks, seer) {
        ctx.emit(
            Phase::Night,
            EventKind::SeerCheck {
                seer: caps["actor"].to_string(),
                target: caps["target"].to_string(),
            },
        );
    }
    if let Some(caps) = first_captures(&phrases.learned, seer) {
        ctx.emit(
            Phase::Night,
            EventKind::SeerResult {
                seer: caps["actor"].to_string(),
                target: caps["target"].to_string(),
                result: caps["result"].to_string(),
            },
        );
    }

    let witch = section(night, &table.witch);
    let save = first_captures(&phrases.declines_save, witch)
        .map(|caps| (caps, false))
        .or_else(|| first_captures(&phrases.saves, witch).map(|caps| (caps, true)));
    if let Some((caps, saved)) = save {
        ctx.emit(
            Phase::Night,
            EventKind::WitchSave {
                witch: caps["actor"].to_string(),
                target: caps["target"].to_string(),
                saved,
            },
        );
    }
    if let Some(caps) = first_captures(&phrases.declines_poison, witch) {
        ctx.emit(
            Phase::Night,
            EventKind::WitchPoison {
                witch: caps["actor"].to_string(),
                target: None,
                used: false,
            },
        );
    } else if let Some(caps) = first_captures(&phrases.poisons, witch) {
        ctx.emit(
            Phase::Night,
            EventKind::WitchPoison {
                witch: caps["actor"].to_string(),
                target: Some(caps["target"].to_string()),
                used: true,
            },
        );
    }
}
