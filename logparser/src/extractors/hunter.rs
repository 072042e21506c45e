use model::{EventKind, Phase};

use crate::{
    context::ParseContext,
    phrases::{find_marker, first_captures, line_start},
};

pub const HUNTER_SHOT: &str = "hunter_shot";

pub fn extract(ctx: &mut ParseContext, round: &str) {
    let phrases = ctx.phrases;
    let Some((start, _)) = find_marker(round, &phrases.table.hunter) else {
        return;
    };
    let rest = &round[line_start(round, start)..];
    let Some(caps) = first_captures(&phrases.hunter_shot, rest) else {
        log::debug!("Round {}: hunter skill without a target", ctx.round);
        return;
    };

    let hunter = caps["actor"].to_string();
    let target = caps["target"].to_string();
    ctx.emit(
        Phase::Day,
        EventKind::HunterSkill {
            hunter,
            target: target.clone(),
        },
    );
    let round_num = ctx.round;
    ctx.model.mark_death(&target, round_num, HUNTER_SHOT);
}
