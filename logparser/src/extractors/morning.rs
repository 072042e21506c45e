//! Morning announcement: the night's death or a safe night.

use lazy_static::lazy_static;
use model::{EventKind, Phase};
use regex::Regex;

use crate::{
    context::ParseContext,
    phrases::{first_captures, line_end},
};

use super::{marker_window, statement_after};

pub const NIGHT_DEATH: &str = "night_death";
pub const SAFE_NIGHT_MESSAGE: &str = "Everyone survived the night!";

lazy_static! {
    static ref REASON: Regex = Regex::new(r"\(([^()\n]+)\)").expect("Valid death reason regex");
}

pub fn extract(ctx: &mut ParseContext, round: &str) {
    let phrases = ctx.phrases;
    let table = &phrases.table;
    let Some(morning) = marker_window(round, &table.morning, &[&table.day, &table.voting]) else {
        return;
    };

    ctx.emit(Phase::Morning, EventKind::PhaseStart { phase: Phase::Morning });

    let Some(caps) = first_captures(&phrases.died, morning) else {
        ctx.emit(
            Phase::Morning,
            EventKind::SafeNight {
                message: SAFE_NIGHT_MESSAGE.to_string(),
            },
        );
        return;
    };

    let player = caps["player"].to_string();
    let match_end = caps.get(0).map_or(0, |m| m.end());
    let reason = match caps.name("reason") {
        Some(reason) => Some(reason.as_str().trim().to_string()),
        None => REASON
            .captures(&morning[match_end..line_end(morning, match_end)])
            .map(|reason| reason[1].trim().to_string()),
    };

    ctx.emit(
        Phase::Morning,
        EventKind::DeathAnnouncement {
            player: player.clone(),
            reason: reason.clone(),
        },
    );
    let round_num = ctx.round;
    ctx.model
        .mark_death(&player, round_num, reason.as_deref().unwrap_or(NIGHT_DEATH));

    last_words(ctx, &morning[match_end..], &player, Phase::Morning);
}

/// A `[LAST WORDS]` block for `player` somewhere in `text`.
pub(crate) fn last_words(ctx: &mut ParseContext, text: &str, player: &str, phase: Phase) {
    let phrases = ctx.phrases;
    let header = phrases.last_words.iter().find_map(|regex| {
        regex
            .captures_iter(text)
            .find(|caps| &caps["player"] == player)
            .and_then(|caps| caps.get(0).map(|m| m.end()))
    });
    let Some(header_end) = header else {
        return;
    };
    if let Some(statement) = statement_after(text, header_end, player) {
        ctx.emit(
            phase,
            EventKind::LastWords {
                player: player.to_string(),
                statement,
            },
        );
    }
}
